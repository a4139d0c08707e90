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

use burn::config::Config;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::warn;

use crate::simulate::typedef::SimulationConfig;
use crate::train::typedef::TrainingConfig;

#[derive(Debug, Error)]
pub enum PipelineError {
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("cannot parse start date \"{input}\": {reason}")]
	StartDate { input: String, reason: String },

	#[error("{features} feature rows but {flags} eruption flags")]
	LengthMismatch { features: usize, flags: usize },

	#[error("not enough data: {0}")]
	NotEnoughData(String),

	#[error("cannot read tensor data: {0}")]
	TensorData(String),

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// The continuous monitoring channels, in feature-column order.
#[derive(
	EnumIter, EnumCount, Display, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Channel {
	Deformation,
	SeismicActivity,
	GasEmission,
}

/// One simulated day of monitoring.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct DailyRecord {
	pub day: usize,
	pub date: NaiveDate,
	pub deformation: f64,
	pub seismic_activity: f64,
	pub gas_emission: f64,
	pub eruption: u8,
}

impl DailyRecord {
	pub fn value(&self, channel: Channel) -> f64 {
		match channel {
			Channel::Deformation => self.deformation,
			Channel::SeismicActivity => self.seismic_activity,
			Channel::GasEmission => self.gas_emission,
		}
	}
}

impl std::fmt::Display for DailyRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{:>5}  {}  {:>8.4}  {:>9.2}  {:>8.2}  {}",
			self.day,
			self.date,
			self.deformation,
			self.seismic_activity,
			self.gas_emission,
			self.eruption
		)
	}
}

/// Contiguous daily table, row `i` is day offset `i`.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct VolcanicSeries {
	pub records: Vec<DailyRecord>,
}

impl VolcanicSeries {
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn head(&self, count: usize) -> &[DailyRecord] {
		&self.records[..count.min(self.records.len())]
	}

	pub fn tail(&self, count: usize) -> &[DailyRecord] {
		let start = self.records.len().saturating_sub(count);
		&self.records[start..]
	}

	pub fn channel(&self, channel: Channel) -> Vec<f64> {
		self.records
			.iter()
			.map(|each| each.value(channel))
			.collect::<Vec<_>>()
	}

	/// Feature matrix, one row per day, columns in [`Channel`] order.
	pub fn feature_rows(&self) -> Vec<Vec<f64>> {
		self.records
			.iter()
			.map(|each| Channel::iter().map(|channel| each.value(channel)).collect())
			.collect::<Vec<_>>()
	}

	pub fn eruption_flags(&self) -> Vec<u8> {
		self.records.iter().map(|each| each.eruption).collect()
	}

	pub fn flagged_days(&self) -> Vec<usize> {
		self.records
			.iter()
			.filter(|each| each.eruption == 1)
			.map(|each| each.day)
			.collect()
	}

	pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
		self.records.get(day).map(|found| found.date)
	}
}

#[derive(Config)]
pub struct PipelineConfig {
	#[config(default = "SimulationConfig::new().with_eruption_days(Some(vec![200, 500]))")]
	pub simulation: SimulationConfig,

	#[config(default = "TrainingConfig::new()")]
	pub training: TrainingConfig,

	#[config(default = 30)]
	pub look_back: usize,

	#[config(default = 7)]
	pub forecast_horizon: usize,

	/// Leading share of the chronological windows used for training.
	#[config(default = 0.8)]
	pub train_fraction: f64,

	#[config(default = 0.5)]
	pub decision_threshold: f32,

	/// Seeds the simulation, the backend and the batch shuffler. Takes
	/// precedence over `training.seed`.
	#[config(default = 42)]
	pub seed: u64,
}

impl PipelineConfig {
	/// Training settings with the pipeline seed applied.
	pub fn effective_training(&self) -> TrainingConfig {
		if self.training.seed != self.seed {
			warn!(
				"Training seed {} is overridden by pipeline seed {}",
				self.training.seed, self.seed
			);
		}

		self.training.clone().with_seed(self.seed)
	}

	pub fn validate(&self) -> Result<(), PipelineError> {
		self.simulation.validate()?;

		if self.look_back == 0 || self.forecast_horizon == 0 {
			return Err(PipelineError::InvalidConfig(format!(
				"look-back ({}) and forecast horizon ({}) must be positive",
				self.look_back, self.forecast_horizon
			)));
		}

		if !(0f64..=1f64).contains(&self.train_fraction) {
			return Err(PipelineError::InvalidConfig(format!(
				"train fraction {} is outside [0, 1]",
				self.train_fraction
			)));
		}

		if !(0f32..=1f32).contains(&self.decision_threshold) {
			return Err(PipelineError::InvalidConfig(format!(
				"decision threshold {} is outside [0, 1]",
				self.decision_threshold
			)));
		}

		if self.training.model.input_size != <Channel as strum::EnumCount>::COUNT {
			return Err(PipelineError::InvalidConfig(format!(
				"model expects {} features but the series has {}",
				self.training.model.input_size,
				<Channel as strum::EnumCount>::COUNT
			)));
		}

		self.training.validate()
	}
}
