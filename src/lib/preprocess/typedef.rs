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

use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct ScaleParam {
	pub min: f64,
	pub max: f64,
}

impl ScaleParam {
	/// Constant columns map to 0 instead of dividing by zero.
	pub fn scale(&self, value: f64) -> f64 {
		let range = self.max - self.min;
		if range == 0f64 {
			0f64
		} else {
			(value - self.min) / range
		}
	}

	pub fn unscale(&self, value: f64) -> f64 {
		value * (self.max - self.min) + self.min
	}
}

/// Per-column min-max normalisation to `[0, 1]`.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MinMaxScaler {
	pub params: Vec<ScaleParam>,
}

/// One look-back block of scaled features and its horizon label.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SequenceSample {
	/// Row index of the first input day.
	pub start: usize,
	pub inputs: Vec<Vec<f64>>,
	pub label: u8,
}

impl SequenceSample {
	pub fn look_back(&self) -> usize {
		self.inputs.len()
	}

	pub fn feature_count(&self) -> usize {
		self.inputs.first().map(|found| found.len()).unwrap_or_default()
	}
}

#[derive(Default, Clone, Debug)]
pub struct SequenceSplit {
	pub train: Vec<SequenceSample>,
	pub test: Vec<SequenceSample>,
}
