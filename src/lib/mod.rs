#![recursion_limit = "256"]

/*
 * Project::Caldera, a simple LSTM eruption forecaster on synthetic data
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use burn::module::AutodiffModule;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::info;

pub mod typedef;
pub use typedef::*;

pub mod data;
pub mod evaluate;
pub mod preprocess;
pub mod simulate;
pub mod train;

use evaluate::command::*;
use evaluate::typedef::{EvaluationReport, SamplePrediction};
use preprocess::command::*;
use preprocess::typedef::MinMaxScaler;
use simulate::command::*;
use simulate::typedef::SimulatedData;
use train::command::*;
use train::typedef::TrainingHistory;

pub type TrainBackend = Autodiff<NdArray>;
pub type InferenceBackend = NdArray;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
	pub simulated: SimulatedData,
	pub scaler: MinMaxScaler,
	pub window_count: usize,
	pub train_count: usize,
	pub test_count: usize,
	pub history: TrainingHistory,
	pub evaluation: EvaluationReport,
	pub predictions: Vec<SamplePrediction>,
	pub next_horizon: Option<f32>,
}

/// Simulates a series, windows it, fits the classifier on the leading
/// windows and scores it on the rest.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
	config.validate()?;

	let device = NdArrayDevice::Cpu;
	let mut rng = StdRng::seed_from_u64(config.seed);

	let simulated = generate_volcanic_data(&config.simulation, &mut rng)?;
	let (scaled_features, scaler) = scale_features(&simulated.series);

	let samples = create_sequences(
		&scaled_features,
		&simulated.series.eruption_flags(),
		config.look_back,
		config.forecast_horizon,
	)?;
	let window_count = samples.len();
	let positive_count = samples.iter().filter(|each| each.label == 1).count();
	info!(
		"Built {} windows of {} days, {} labelled positive",
		window_count, config.look_back, positive_count
	);

	let split = chronological_split(samples, config.train_fraction);
	if split.train.is_empty() {
		return Err(PipelineError::NotEnoughData(format!(
			"{} days give no training windows for a {}-day look-back and {}-day horizon",
			simulated.series.len(),
			config.look_back,
			config.forecast_horizon
		)));
	}

	let training = config.effective_training();
	let (trained_model, history) = train_model::<TrainBackend>(&split.train, &training, &device)?;
	let model = trained_model.valid();

	let evaluation = evaluate_model(&model, &split.test, config.decision_threshold, &device)?;
	let probabilities = predict_probabilities(&model, &split.test, &device)?;
	let predictions = sample_predictions(
		&split.test,
		&probabilities,
		&simulated.series,
		config.decision_threshold,
	);

	let next_horizon = forecast_next_horizon(&model, &scaled_features, config.look_back, &device)?;
	match next_horizon {
		Some(probability) => info!(
			"Eruption probability over the next {} days: {:.4}",
			config.forecast_horizon, probability
		),
		None => info!(
			"Skipping next-horizon forecast, need {} days but have {}",
			config.look_back,
			scaled_features.len()
		),
	}

	Ok(PipelineReport {
		window_count,
		train_count: split.train.len(),
		test_count: split.test.len(),
		simulated,
		scaler,
		history,
		evaluation,
		predictions,
		next_horizon,
	})
}
