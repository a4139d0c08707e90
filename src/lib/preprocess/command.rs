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

use strum::IntoEnumIterator;
use tracing::{debug, info};

use super::helper::*;
use super::typedef::*;
use crate::typedef::{Channel, PipelineError, VolcanicSeries};

impl MinMaxScaler {
	pub fn fit(rows: &[Vec<f64>]) -> Self {
		Self {
			params: column_params(rows),
		}
	}

	pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
		rows.iter()
			.map(|each_row| {
				each_row
					.iter()
					.zip(self.params.iter())
					.map(|(value, param)| param.scale(*value))
					.collect::<Vec<_>>()
			})
			.collect::<Vec<_>>()
	}

	pub fn inverse_transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
		rows.iter()
			.map(|each_row| {
				each_row
					.iter()
					.zip(self.params.iter())
					.map(|(value, param)| param.unscale(*value))
					.collect::<Vec<_>>()
			})
			.collect::<Vec<_>>()
	}
}

/// Fits the scaler on the whole series and rescales every channel.
///
/// Fitting on train and test rows alike leaks the test range into training.
/// The leak is kept so results stay comparable with earlier runs.
pub fn scale_features(series: &VolcanicSeries) -> (Vec<Vec<f64>>, MinMaxScaler) {
	let rows = series.feature_rows();
	let scaler = MinMaxScaler::fit(&rows);

	for (channel, param) in Channel::iter().zip(scaler.params.iter()) {
		debug!(
			"Scaling {} from [{:.3}, {:.3}] to [0, 1]",
			channel, param.min, param.max
		);
	}

	(scaler.transform(&rows), scaler)
}

/// Slides a `look_back` frame over the rows. Each sample is labelled 1 when
/// an eruption falls in the `forecast_horizon` days right after the frame.
/// Samples come out in chronological order, and a series shorter than one
/// frame plus horizon gives no samples.
pub fn create_sequences(
	features: &[Vec<f64>],
	flags: &[u8],
	look_back: usize,
	forecast_horizon: usize,
) -> Result<Vec<SequenceSample>, PipelineError> {
	if features.len() != flags.len() {
		return Err(PipelineError::LengthMismatch {
			features: features.len(),
			flags: flags.len(),
		});
	}

	if look_back == 0 || forecast_horizon == 0 {
		return Err(PipelineError::InvalidConfig(format!(
			"look-back ({}) and forecast horizon ({}) must be positive",
			look_back, forecast_horizon
		)));
	}

	let span = look_back + forecast_horizon;
	if features.len() < span {
		debug!(
			"{} rows cannot hold a {}-day frame plus a {}-day horizon",
			features.len(),
			look_back,
			forecast_horizon
		);
		return Ok(Vec::new());
	}

	let samples = (0..=features.len() - span)
		.map(|start| {
			let horizon_start = start + look_back;
			SequenceSample {
				start,
				inputs: features[start..horizon_start].to_vec(),
				label: horizon_label(flags, horizon_start, horizon_start + forecast_horizon),
			}
		})
		.collect::<Vec<_>>();

	Ok(samples)
}

/// Leading `train_fraction` of the samples for training, the rest for test.
/// Never shuffles.
pub fn chronological_split(samples: Vec<SequenceSample>, train_fraction: f64) -> SequenceSplit {
	let fraction = train_fraction.clamp(0f64, 1f64);
	let slice_line = ((samples.len() as f64) * fraction).floor() as usize;

	let mut train = samples;
	let test = train.split_off(slice_line.min(train.len()));

	info!(
		"Split {} windows into {} for training and {} for test",
		train.len() + test.len(),
		train.len(),
		test.len()
	);

	SequenceSplit { train, test }
}
