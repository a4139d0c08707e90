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

use burn::{
	nn::loss::BinaryCrossEntropyLossConfig,
	tensor::{activation::sigmoid, backend::Backend, ElementConversion, Tensor, TensorData},
};
use tracing::{info, warn};

use super::helper::*;
use super::typedef::*;
use crate::preprocess::typedef::SequenceSample;
use crate::train::helper::{labels_to_tensor, samples_to_tensor, tensor_to_vec};
use crate::train::model::LstmNetwork;
use crate::typedef::{PipelineError, VolcanicSeries};

// Bounds the tensor size of a single forward pass
const PREDICT_CHUNK: usize = 256;

/// Loss and thresholded scores of the model over `samples`.
pub fn evaluate_model<B: Backend>(
	model: &LstmNetwork<B>,
	samples: &[SequenceSample],
	decision_threshold: f32,
	device: &B::Device,
) -> Result<EvaluationReport, PipelineError> {
	if samples.is_empty() {
		warn!("Nothing to evaluate, the test set is empty");
		return Ok(Default::default());
	}

	let loss_fn = BinaryCrossEntropyLossConfig::new()
		.with_logits(true)
		.init::<B>(device);

	let mut loss_sum = 0f32;
	let mut probabilities = Vec::<f32>::with_capacity(samples.len());
	for chunk in samples.chunks(PREDICT_CHUNK) {
		let logits = model.forward(&samples_to_tensor::<B>(chunk, device));
		let loss = loss_fn.forward(logits.clone(), labels_to_tensor::<B>(chunk, device));

		loss_sum += loss.into_scalar().elem::<f32>() * chunk.len() as f32;
		probabilities.extend(tensor_to_vec(sigmoid(logits))?);
	}

	let labels = samples.iter().map(|each| each.label).collect::<Vec<_>>();
	let report = EvaluationReport {
		sample_count: samples.len(),
		loss: loss_sum / samples.len() as f32,
		accuracy: binary_accuracy(&probabilities, &labels, decision_threshold),
		metrics: classification_metrics(&probabilities, &labels, decision_threshold),
	};

	info!(
		"Evaluated {} windows: loss={:.4} accuracy={:.4} precision={:.3} recall={:.3}",
		report.sample_count,
		report.loss,
		report.accuracy,
		report.metrics.precision,
		report.metrics.recall
	);

	Ok(report)
}

/// Eruption probability of every window, in window order.
pub fn predict_probabilities<B: Backend>(
	model: &LstmNetwork<B>,
	samples: &[SequenceSample],
	device: &B::Device,
) -> Result<Vec<f32>, PipelineError> {
	let mut probabilities = Vec::<f32>::with_capacity(samples.len());
	for chunk in samples.chunks(PREDICT_CHUNK) {
		let tensor = samples_to_tensor::<B>(chunk, device);
		probabilities.extend(tensor_to_vec(model.forward_probability(&tensor))?);
	}

	Ok(probabilities)
}

pub fn sample_predictions(
	samples: &[SequenceSample],
	probabilities: &[f32],
	series: &VolcanicSeries,
	decision_threshold: f32,
) -> Vec<SamplePrediction> {
	samples
		.iter()
		.zip(probabilities.iter())
		.map(|(sample, probability)| SamplePrediction {
			start: sample.start,
			date: series.date_of(sample.start + sample.look_back()),
			probability: *probability,
			predicted: threshold(*probability, decision_threshold),
			actual: sample.label,
		})
		.collect::<Vec<_>>()
}

/// Probability of an eruption in the horizon right after the last
/// `look_back` rows. `None` when the series is shorter than one frame.
pub fn forecast_next_horizon<B: Backend>(
	model: &LstmNetwork<B>,
	scaled_features: &[Vec<f64>],
	look_back: usize,
	device: &B::Device,
) -> Result<Option<f32>, PipelineError> {
	if look_back == 0 || scaled_features.len() < look_back {
		return Ok(None);
	}

	let window = &scaled_features[scaled_features.len() - look_back..];
	let feature_count = window[0].len();
	let flatten = window
		.iter()
		.flatten()
		.map(|each| *each as f32)
		.collect::<Vec<_>>();

	let tensor = Tensor::<B, 3>::from_data(
		TensorData::new(flatten, [1, look_back, feature_count]),
		device,
	);

	let probability = tensor_to_vec(model.forward_probability(&tensor))?;
	Ok(probability.first().cloned())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::train::model::LstmNetworkConfig;
	use burn::backend::{ndarray::NdArrayDevice, NdArray};

	fn model(device: &NdArrayDevice) -> LstmNetwork<NdArray> {
		LstmNetworkConfig::new().with_hidden_size(6).init(device)
	}

	fn samples(count: usize) -> Vec<SequenceSample> {
		(0..count)
			.map(|start| SequenceSample {
				start,
				inputs: vec![vec![0.1, 0.2, 0.3]; 5],
				label: (start == 2) as u8,
			})
			.collect()
	}

	#[test]
	fn one_probability_per_window() {
		let device = NdArrayDevice::Cpu;

		let probabilities = predict_probabilities(&model(&device), &samples(7), &device).unwrap();

		assert_eq!(probabilities.len(), 7);
		assert!(probabilities.iter().all(|each| (0f32..=1f32).contains(each)));
	}

	#[test]
	fn evaluation_counts_every_window() {
		let device = NdArrayDevice::Cpu;

		let report = evaluate_model(&model(&device), &samples(6), 0.5, &device).unwrap();
		let metrics = report.metrics;

		assert_eq!(report.sample_count, 6);
		assert!(report.loss.is_finite() && report.loss > 0f32);
		assert_eq!(
			metrics.true_positive + metrics.false_positive + metrics.true_negative + metrics.false_negative,
			6
		);
	}

	#[test]
	fn empty_test_set_gives_blank_report() {
		let device = NdArrayDevice::Cpu;

		let report = evaluate_model(&model(&device), &[], 0.5, &device).unwrap();

		assert_eq!(report, EvaluationReport::default());
	}

	#[test]
	fn forecast_needs_a_full_frame() {
		let device = NdArrayDevice::Cpu;
		let features = vec![vec![0.5, 0.5, 0.5]; 10];

		assert_eq!(
			forecast_next_horizon(&model(&device), &features, 30, &device).unwrap(),
			None
		);

		let probability = forecast_next_horizon(&model(&device), &features, 10, &device)
			.unwrap()
			.unwrap();
		assert!((0f32..=1f32).contains(&probability));
	}

	#[test]
	fn predictions_are_dated_by_horizon_start() {
		use crate::typedef::DailyRecord;
		use chrono::NaiveDate;

		let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
		let series = VolcanicSeries {
			records: (0..12)
				.map(|day| DailyRecord {
					day,
					date: start + chrono::Days::new(day as u64),
					deformation: 0.5,
					seismic_activity: 60.0,
					gas_emission: 55.0,
					eruption: 0,
				})
				.collect(),
		};

		let predictions = sample_predictions(&samples(3), &[0.7, 0.2, 0.5], &series, 0.5);

		assert_eq!(predictions[0].date.unwrap().to_string(), "2023-01-06");
		assert_eq!(serde_json::to_value(&predictions[0]).unwrap()["date"], "2023-01-06");
		assert_eq!(predictions[0].predicted, 1);
		assert_eq!(predictions[2].predicted, 0);
		assert_eq!(predictions[2].actual, 1);
	}
}
