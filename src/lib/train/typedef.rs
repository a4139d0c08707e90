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
	config::Config,
	grad_clipping::GradientClippingConfig,
	optim::AdamConfig,
	tensor::{
		backend::{AutodiffBackend, Backend},
		Int, Tensor,
	},
};
use serde::{Deserialize, Serialize};

use super::model::*;
use crate::typedef::PipelineError;

#[derive(Default, Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EpochMetrics {
	pub epoch: u32,
	pub train_loss: f32,
	pub train_accuracy: f32,
	pub valid_loss: Option<f32>,
	pub valid_accuracy: Option<f32>,
}

impl EpochMetrics {
	/// Validation loss when there is a validation slice, training loss otherwise.
	pub fn monitored_loss(&self) -> f32 {
		self.valid_loss.unwrap_or(self.train_loss)
	}
}

#[derive(Default, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrainingHistory {
	pub epochs: Vec<EpochMetrics>,
	pub best_epoch: Option<u32>,
	pub stopped_early: bool,
	pub restored_best: bool,
}

#[derive(Config)]
pub struct TrainingConfig {
	#[config(default = "LstmNetworkConfig::new()")]
	pub model: LstmNetworkConfig,

	#[config(
		default = "AdamConfig::new().with_grad_clipping(Some(GradientClippingConfig::Norm(1.0)))"
	)]
	pub optimizer: AdamConfig,

	#[config(default = 1e-3)]
	pub lr: f64,

	#[config(default = 50)]
	pub num_epochs: u32,

	#[config(default = 32)]
	pub batch_size: usize,

	/// Trailing share of the training windows held out for validation.
	#[config(default = 0.1)]
	pub validation_fraction: f64,

	#[config(default = 5)]
	pub patience: u32,

	#[config(default = 0.0)]
	pub min_delta: f32,

	#[config(default = true)]
	pub restore_best_weights: bool,

	/// Replaced by the pipeline seed when run through `run_pipeline`.
	#[config(default = 42)]
	pub seed: u64,
}

impl TrainingConfig {
	pub fn validate(&self) -> Result<(), PipelineError> {
		if self.batch_size == 0 {
			return Err(PipelineError::InvalidConfig(String::from(
				"batch size must be positive",
			)));
		}

		if !(0f64..1f64).contains(&self.validation_fraction) {
			return Err(PipelineError::InvalidConfig(format!(
				"validation fraction {} is outside [0, 1)",
				self.validation_fraction
			)));
		}

		if !self.lr.is_finite() || self.lr <= 0f64 {
			return Err(PipelineError::InvalidConfig(format!(
				"learning rate {} must be positive",
				self.lr
			)));
		}

		Ok(())
	}
}

/// Tracks the best monitored loss and how long it has not improved.
#[derive(Clone, Copy, Debug)]
pub struct EarlyStopping {
	pub patience: u32,
	pub min_delta: f32,
	pub best_loss: f32,
	pub best_epoch: Option<u32>,
	pub wait: u32,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StopDecision {
	Improved,
	Continue,
	Stop,
}

pub struct ValidInput<B: Backend> {
	pub tensor: Tensor<B, 3>,
	pub target_tensor: Tensor<B, 2, Int>,
	pub labels: Vec<u8>,
}

pub struct TrainInput<B: AutodiffBackend> {
	pub train_tensor: Tensor<B, 3>,
	pub train_target_tensor: Tensor<B, 2, Int>,
	pub train_labels: Vec<u8>,
	pub valid: Option<ValidInput<B::InnerBackend>>,
}
