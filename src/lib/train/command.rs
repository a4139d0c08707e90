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
	module::AutodiffModule,
	nn::loss::BinaryCrossEntropyLossConfig,
	optim::{GradientsParams, Optimizer},
	tensor::{backend::AutodiffBackend, ElementConversion, Int, Tensor, TensorData},
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use super::helper::*;
use super::model::*;
use super::typedef::*;
use crate::evaluate::helper::binary_accuracy;
use crate::preprocess::typedef::SequenceSample;
use crate::typedef::PipelineError;

/// Fits a fresh network on chronologically ordered windows, stopping once the
/// monitored loss stalls for `patience` epochs.
pub fn train_model<B: AutodiffBackend>(
	samples: &[SequenceSample],
	config: &TrainingConfig,
	device: &B::Device,
) -> Result<(LstmNetwork<B>, TrainingHistory), PipelineError> {
	config.validate()?;

	if samples.is_empty() {
		return Err(PipelineError::NotEnoughData(String::from(
			"no training windows",
		)));
	}

	let feature_count = samples[0].feature_count();
	if feature_count != config.model.input_size {
		return Err(PipelineError::InvalidConfig(format!(
			"windows carry {} features but the model expects {}",
			feature_count, config.model.input_size
		)));
	}

	B::seed(config.seed);
	let mut rng = StdRng::seed_from_u64(config.seed);

	let input = send_batches_to_device::<B>(samples, config.validation_fraction, device);
	let train_count = input.train_labels.len();

	info!(
		"Training on {} windows, validating on {}",
		train_count,
		input.valid.as_ref().map(|found| found.labels.len()).unwrap_or(0)
	);

	let mut model = config.model.init::<B>(device);
	let mut optim = config.optimizer.init::<B, LstmNetwork<B>>();
	let loss_fn = BinaryCrossEntropyLossConfig::new()
		.with_logits(true)
		.init::<B>(device);
	let valid_loss_fn = BinaryCrossEntropyLossConfig::new()
		.with_logits(true)
		.init::<B::InnerBackend>(device);

	let mut history = TrainingHistory::default();
	let mut stopping = EarlyStopping::new(config.patience, config.min_delta);
	let mut best_model: Option<LstmNetwork<B>> = None;

	let mut indices = (0..train_count).collect::<Vec<_>>();

	for epoch in 1u32..=config.num_epochs {
		indices.shuffle(&mut rng);

		// Training phase
		let mut loss_sum = 0f32;
		let mut correct = 0f32;
		for batch in indices.chunks(config.batch_size) {
			let batch_indices = Tensor::<B, 1, Int>::from_data(
				TensorData::new(
					batch.iter().map(|each| *each as i64).collect::<Vec<_>>(),
					[batch.len()],
				),
				device,
			);
			let batch_input = input.train_tensor.clone().select(0, batch_indices.clone());
			let batch_targets = input
				.train_target_tensor
				.clone()
				.select(0, batch_indices);

			let logits = model.forward(&batch_input);
			let loss = loss_fn.forward(logits.clone(), batch_targets);

			let batch_labels = batch
				.iter()
				.map(|each| input.train_labels[*each])
				.collect::<Vec<_>>();
			let probabilities = tensor_to_vec(burn::tensor::activation::sigmoid(logits))?;
			correct += binary_accuracy(&probabilities, &batch_labels, 0.5) * batch.len() as f32;
			loss_sum += loss.clone().into_scalar().elem::<f32>() * batch.len() as f32;

			// Gradients for the current backward pass
			let grads = loss.backward();
			// Gradients linked to each parameter of the model
			let grads = GradientsParams::from_grads(grads, &model);
			model = optim.step(config.lr, model, grads);
		}

		let mut metrics = EpochMetrics {
			epoch,
			train_loss: loss_sum / train_count as f32,
			train_accuracy: correct / train_count as f32,
			..Default::default()
		};

		// Validation phase
		if let Some(valid) = &input.valid {
			let valid_model = model.valid();
			let logits = valid_model.forward(&valid.tensor);
			let loss = valid_loss_fn.forward(logits.clone(), valid.target_tensor.clone());
			let probabilities = tensor_to_vec(burn::tensor::activation::sigmoid(logits))?;

			metrics.valid_loss = Some(loss.into_scalar().elem::<f32>());
			metrics.valid_accuracy = Some(binary_accuracy(&probabilities, &valid.labels, 0.5));
		}

		info!(
			"Epoch {}/{}: loss={:.4} accuracy={:.4} val_loss={} val_accuracy={}",
			epoch,
			config.num_epochs,
			metrics.train_loss,
			metrics.train_accuracy,
			metrics
				.valid_loss
				.map(|found| format!("{:.4}", found))
				.unwrap_or(String::from("-")),
			metrics
				.valid_accuracy
				.map(|found| format!("{:.4}", found))
				.unwrap_or(String::from("-")),
		);
		history.epochs.push(metrics);

		match stopping.update(epoch, metrics.monitored_loss()) {
			StopDecision::Improved => {
				debug!("New best loss {:.5} at epoch {}", stopping.best_loss, epoch);
				if config.restore_best_weights {
					best_model = Some(model.clone());
				}
			}
			StopDecision::Continue => {}
			StopDecision::Stop => {
				info!(
					"Early stopping at epoch {}, no improvement for {} epochs",
					epoch, config.patience
				);
				history.stopped_early = true;
				break;
			}
		}
	}

	history.best_epoch = stopping.best_epoch;

	let model = match best_model {
		Some(found) if history.best_epoch != history.epochs.last().map(|last| last.epoch) => {
			info!(
				"Restoring weights from epoch {}",
				history.best_epoch.unwrap_or_default()
			);
			history.restored_best = true;
			found
		}
		_ => model,
	};

	Ok((model, history))
}

#[cfg(test)]
mod tests {
	use super::*;
	use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

	type TestBackend = Autodiff<NdArray>;

	fn samples(count: usize) -> Vec<SequenceSample> {
		(0..count)
			.map(|start| {
				let label = (start % 4 == 0) as u8;
				SequenceSample {
					start,
					inputs: (0..6).map(|_| vec![label as f64, 0.5, 0.25]).collect(),
					label,
				}
			})
			.collect()
	}

	fn small_config() -> TrainingConfig {
		TrainingConfig::new()
			.with_model(LstmNetworkConfig::new().with_hidden_size(8))
			.with_num_epochs(4)
			.with_batch_size(8)
			.with_patience(10)
	}

	#[test]
	fn history_has_one_entry_per_epoch() {
		let device = NdArrayDevice::Cpu;

		let (_, history) = train_model::<TestBackend>(&samples(40), &small_config(), &device).unwrap();

		assert_eq!(history.epochs.len(), 4);
		assert!(!history.stopped_early);
		assert!(history.best_epoch.is_some());
		assert!(history
			.epochs
			.iter()
			.all(|each| each.valid_loss.is_some() && each.train_loss.is_finite()));
	}

	#[test]
	fn stall_restores_the_best_epoch_weights() {
		let device = NdArrayDevice::Cpu;
		// Nothing can beat the first epoch by this margin
		let config = small_config()
			.with_num_epochs(20)
			.with_patience(2)
			.with_min_delta(1e6);
		let windows = samples(40);

		let (model, history) = train_model::<TestBackend>(&windows, &config, &device).unwrap();

		assert!(history.stopped_early);
		assert!(history.restored_best);
		assert_eq!(history.best_epoch, Some(1));
		assert_eq!(history.epochs.len(), 3);

		let input = send_batches_to_device::<TestBackend>(&windows, config.validation_fraction, &device);
		let valid = input.valid.unwrap();
		let loss_fn = BinaryCrossEntropyLossConfig::new()
			.with_logits(true)
			.init::<NdArray>(&device);
		let logits = model.valid().forward(&valid.tensor);
		let rescored = loss_fn
			.forward(logits, valid.target_tensor)
			.into_scalar()
			.elem::<f32>();

		let best_loss = history.epochs[0].valid_loss.unwrap();
		assert!((rescored - best_loss).abs() < 1e-5);
	}

	#[test]
	fn empty_training_set_is_an_error() {
		let device = NdArrayDevice::Cpu;

		assert!(matches!(
			train_model::<TestBackend>(&[], &small_config(), &device),
			Err(PipelineError::NotEnoughData(_))
		));
	}

	#[test]
	fn feature_count_must_match_model() {
		let device = NdArrayDevice::Cpu;
		let config = small_config().with_model(LstmNetworkConfig::new().with_input_size(5));

		assert!(matches!(
			train_model::<TestBackend>(&samples(10), &config, &device),
			Err(PipelineError::InvalidConfig(_))
		));
	}
}
