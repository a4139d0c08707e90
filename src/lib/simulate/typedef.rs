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
use serde::Serialize;

use crate::typedef::{PipelineError, VolcanicSeries};

/// Uniform background levels of each channel before any precursor.
#[derive(Config, Debug)]
pub struct BackgroundConfig {
	#[config(default = 0.5)]
	pub deformation_low: f64,
	#[config(default = 0.6)]
	pub deformation_high: f64,

	/// Seismic counts are integers drawn from `[low, high)`.
	#[config(default = 50)]
	pub seismic_low: u32,
	#[config(default = 100)]
	pub seismic_high: u32,

	#[config(default = 50.0)]
	pub gas_low: f64,
	#[config(default = 60.0)]
	pub gas_high: f64,
}

/// A linear ramp that ends the day before an eruption.
#[derive(Config, Debug)]
pub struct PrecursorConfig {
	/// Days of ramp before the eruption day.
	pub window: usize,
	/// Amount added on the last ramp day.
	pub magnitude: f64,
	/// Upper bound of the uniform jitter added on every ramp day.
	pub jitter: f64,
	/// Floor both ramp and jitter, for count channels.
	#[config(default = false)]
	pub integral: bool,
}

#[derive(Config, Debug)]
pub struct SimulationConfig {
	#[config(default = 730)]
	pub num_days: usize,

	/// Explicit eruption day offsets. `None` picks them at random.
	#[config(default = "None")]
	pub eruption_days: Option<Vec<usize>>,

	/// Random eruptions never land before this offset.
	#[config(default = 30)]
	pub min_eruption_offset: usize,
	#[config(default = 1)]
	pub min_random_eruptions: usize,
	#[config(default = 2)]
	pub max_random_eruptions: usize,

	#[config(default = 0.1)]
	pub noise_level: f64,
	#[config(default = 10.0)]
	pub seismic_noise_scale: f64,
	#[config(default = 5.0)]
	pub gas_noise_scale: f64,

	#[config(default = "String::from(\"2023-01-01\")")]
	pub start_date: String,

	#[config(default = "BackgroundConfig::new()")]
	pub background: BackgroundConfig,

	#[config(default = "PrecursorConfig::new(30, 0.5, 0.05)")]
	pub deformation_precursor: PrecursorConfig,
	#[config(default = "PrecursorConfig::new(20, 200.0, 20.0).with_integral(true)")]
	pub seismic_precursor: PrecursorConfig,
	#[config(default = "PrecursorConfig::new(15, 30.0, 5.0)")]
	pub gas_precursor: PrecursorConfig,
}

impl SimulationConfig {
	pub fn validate(&self) -> Result<(), PipelineError> {
		let background = &self.background;

		if background.deformation_low > background.deformation_high
			|| background.gas_low > background.gas_high
		{
			return Err(PipelineError::InvalidConfig(String::from(
				"background lower bounds must not exceed upper bounds",
			)));
		}

		if background.seismic_low >= background.seismic_high {
			return Err(PipelineError::InvalidConfig(format!(
				"seismic background range [{}, {}) is empty",
				background.seismic_low, background.seismic_high
			)));
		}

		if self.min_random_eruptions > self.max_random_eruptions {
			return Err(PipelineError::InvalidConfig(format!(
				"random eruption count range [{}, {}] is empty",
				self.min_random_eruptions, self.max_random_eruptions
			)));
		}

		let scales = [
			self.noise_level,
			self.seismic_noise_scale,
			self.gas_noise_scale,
			self.deformation_precursor.jitter,
			self.seismic_precursor.jitter,
			self.gas_precursor.jitter,
		];
		if scales.iter().any(|each| !each.is_finite() || *each < 0f64) {
			return Err(PipelineError::InvalidConfig(String::from(
				"noise scales and jitters must be finite and non-negative",
			)));
		}

		Ok(())
	}
}

/// The generated table and the eruption days actually simulated.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedData {
	pub series: VolcanicSeries,
	pub eruption_days: Vec<usize>,
}
