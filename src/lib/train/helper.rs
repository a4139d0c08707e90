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

use burn::tensor::{
	backend::{AutodiffBackend, Backend},
	Int, Tensor, TensorData,
};
use tracing::warn;

use super::typedef::*;
use crate::preprocess::typedef::SequenceSample;
use crate::typedef::PipelineError;

/// Stacks the windows into a `[samples, look_back, features]` tensor.
pub(crate) fn samples_to_tensor<B: Backend>(
	samples: &[SequenceSample],
	device: &B::Device,
) -> Tensor<B, 3> {
	let look_back = samples.first().map(|found| found.look_back()).unwrap_or_default();
	let feature_count = samples
		.first()
		.map(|found| found.feature_count())
		.unwrap_or_default();

	let flatten = samples
		.iter()
		.flat_map(|each| each.inputs.iter().flatten())
		.map(|each| *each as f32)
		.collect::<Vec<_>>();

	Tensor::from_data(
		TensorData::new(flatten, [samples.len(), look_back, feature_count]),
		device,
	)
}

pub(crate) fn labels_to_tensor<B: Backend>(
	samples: &[SequenceSample],
	device: &B::Device,
) -> Tensor<B, 2, Int> {
	let labels = samples
		.iter()
		.map(|each| each.label as i64)
		.collect::<Vec<_>>();

	Tensor::from_data(TensorData::new(labels, [samples.len(), 1]), device)
}

pub(crate) fn tensor_to_vec<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f32>, PipelineError> {
	tensor
		.into_data()
		.convert::<f32>()
		.to_vec::<f32>()
		.map_err(|err| PipelineError::TensorData(format!("{:?}", err)))
}

/// Uploads the windows, holding out the trailing `validation_fraction`
/// without shuffling.
pub(crate) fn send_batches_to_device<B: AutodiffBackend>(
	samples: &[SequenceSample],
	validation_fraction: f64,
	device: &B::Device,
) -> TrainInput<B> {
	let batch_count = samples.len();
	let slice_line = ((batch_count as f64) * (1f64 - validation_fraction)).floor() as usize;

	// Nothing would be left to train on, so skip validation instead
	let slice_line = if slice_line == 0 {
		warn!(
			"Only {} training windows, training without a validation slice",
			batch_count
		);
		batch_count
	} else {
		slice_line
	};

	let (train_samples, valid_samples) = samples.split_at(slice_line);

	let valid = if valid_samples.is_empty() {
		None
	} else {
		Some(ValidInput::<B::InnerBackend> {
			tensor: samples_to_tensor(valid_samples, device),
			target_tensor: labels_to_tensor(valid_samples, device),
			labels: valid_samples.iter().map(|each| each.label).collect(),
		})
	};

	TrainInput {
		train_tensor: samples_to_tensor(train_samples, device),
		train_target_tensor: labels_to_tensor(train_samples, device),
		train_labels: train_samples.iter().map(|each| each.label).collect(),
		valid,
	}
}

impl EarlyStopping {
	pub fn new(patience: u32, min_delta: f32) -> Self {
		Self {
			patience,
			min_delta,
			best_loss: f32::INFINITY,
			best_epoch: None,
			wait: 0,
		}
	}

	pub fn update(&mut self, epoch: u32, loss: f32) -> StopDecision {
		if loss < self.best_loss - self.min_delta {
			self.best_loss = loss;
			self.best_epoch = Some(epoch);
			self.wait = 0;
			return StopDecision::Improved;
		}

		self.wait += 1;
		if self.wait >= self.patience {
			StopDecision::Stop
		} else {
			StopDecision::Continue
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

	fn sample(start: usize, label: u8) -> SequenceSample {
		SequenceSample {
			start,
			inputs: (0..4).map(|row| vec![(start + row) as f64; 3]).collect(),
			label,
		}
	}

	#[test]
	fn early_stopping_waits_for_patience() {
		let mut stopping = EarlyStopping::new(2, 0.0);

		assert_eq!(stopping.update(1, 1.0), StopDecision::Improved);
		assert_eq!(stopping.update(2, 0.5), StopDecision::Improved);
		assert_eq!(stopping.update(3, 0.7), StopDecision::Continue);
		assert_eq!(stopping.update(4, 0.5), StopDecision::Stop);
		assert_eq!(stopping.best_epoch, Some(2));
	}

	#[test]
	fn improvement_must_beat_min_delta() {
		let mut stopping = EarlyStopping::new(3, 0.1);

		stopping.update(1, 1.0);
		assert_eq!(stopping.update(2, 0.95), StopDecision::Continue);
		assert_eq!(stopping.update(3, 0.85), StopDecision::Improved);
	}

	#[test]
	fn tensor_shape_follows_windows() {
		let device = NdArrayDevice::Cpu;
		let samples = (0..5).map(|each| sample(each, 0)).collect::<Vec<_>>();

		let tensor = samples_to_tensor::<NdArray>(&samples, &device);

		assert_eq!(tensor.dims(), [5, 4, 3]);
		assert_eq!(labels_to_tensor::<NdArray>(&samples, &device).dims(), [5, 1]);
	}

	#[test]
	fn validation_is_the_trailing_slice() {
		let device = NdArrayDevice::Cpu;
		let samples = (0..10)
			.map(|each| sample(each, (each >= 9) as u8))
			.collect::<Vec<_>>();

		let input = send_batches_to_device::<Autodiff<NdArray>>(&samples, 0.2, &device);

		assert_eq!(input.train_tensor.dims()[0], 8);
		assert_eq!(input.train_labels, vec![0; 8]);
		let valid = input.valid.unwrap();
		assert_eq!(valid.tensor.dims()[0], 2);
		assert_eq!(valid.labels, vec![0, 1]);
	}

	#[test]
	fn tiny_sets_skip_validation() {
		let device = NdArrayDevice::Cpu;
		let samples = vec![sample(0, 1)];

		let input = send_batches_to_device::<Autodiff<NdArray>>(&samples, 0.5, &device);

		assert_eq!(input.train_labels, vec![1]);
		assert!(input.valid.is_none());
	}
}
