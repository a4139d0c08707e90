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

//! End-to-end run on a short series with a small network.

use project_caldera_lib::simulate::typedef::SimulationConfig;
use project_caldera_lib::train::model::LstmNetworkConfig;
use project_caldera_lib::train::typedef::TrainingConfig;
use project_caldera_lib::{run_pipeline, PipelineConfig, PipelineError};

fn small_config() -> PipelineConfig {
	PipelineConfig::new()
		.with_simulation(
			SimulationConfig::new()
				.with_num_days(120)
				.with_eruption_days(Some(vec![60, 100])),
		)
		.with_look_back(10)
		.with_forecast_horizon(3)
		.with_training(
			TrainingConfig::new()
				.with_model(LstmNetworkConfig::new().with_hidden_size(4))
				.with_num_epochs(2)
				.with_batch_size(16),
		)
}

#[test]
fn small_run_scores_every_test_window() {
	let report = run_pipeline(&small_config()).unwrap();

	assert_eq!(report.window_count, 120 - 10 - 3 + 1);
	assert_eq!(report.train_count, 86);
	assert_eq!(report.test_count, 22);
	assert_eq!(report.predictions.len(), 22);
	assert_eq!(report.evaluation.sample_count, 22);
	assert_eq!(report.history.epochs.len(), 2);
	assert_eq!(report.simulated.eruption_days, vec![60, 100]);
	assert!(report.next_horizon.is_some());
	assert!(report
		.predictions
		.windows(2)
		.all(|pair| pair[0].start + 1 == pair[1].start));
}

#[test]
fn seeded_runs_simulate_the_same_series() {
	let first = run_pipeline(&small_config()).unwrap();
	let second = run_pipeline(&small_config()).unwrap();

	assert_eq!(first.simulated.series, second.simulated.series);
	assert_eq!(first.scaler, second.scaler);
}

#[test]
fn too_short_series_cannot_train() {
	let config = small_config().with_simulation(SimulationConfig::new().with_num_days(10));

	assert!(matches!(
		run_pipeline(&config),
		Err(PipelineError::NotEnoughData(_))
	));
}

#[test]
fn report_serialises_to_json() {
	let report = run_pipeline(&small_config()).unwrap();

	let json = serde_json::to_value(&report).unwrap();

	assert_eq!(json["windowCount"], 108);
	assert!(json["history"]["epochs"].is_array());
}
