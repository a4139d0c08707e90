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

use chrono::NaiveDate;
use parse_datetime::parse_datetime;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use super::typedef::*;
use crate::typedef::PipelineError;

pub(crate) fn parse_start_date(input: &str) -> Result<NaiveDate, PipelineError> {
	match parse_datetime(input) {
		Ok(ok) => Ok(ok.date_naive()),
		Err(err) => Err(PipelineError::StartDate {
			input: input.to_string(),
			reason: err.to_string(),
		}),
	}
}

/// Draws the three background channels in feature order.
pub(crate) fn background_series<R: Rng + ?Sized>(
	num_days: usize,
	background: &BackgroundConfig,
	rng: &mut R,
) -> [Vec<f64>; 3] {
	let deformation_span = background.deformation_high - background.deformation_low;
	let deformation = (0..num_days)
		.map(|_| background.deformation_low + rng.random::<f64>() * deformation_span)
		.collect::<Vec<_>>();

	let seismic = (0..num_days)
		.map(|_| rng.random_range(background.seismic_low..background.seismic_high) as f64)
		.collect::<Vec<_>>();

	let gas_span = background.gas_high - background.gas_low;
	let gas = (0..num_days)
		.map(|_| background.gas_low + rng.random::<f64>() * gas_span)
		.collect::<Vec<_>>();

	[deformation, seismic, gas]
}

pub(crate) fn resolve_eruption_days<R: Rng + ?Sized>(
	config: &SimulationConfig,
	rng: &mut R,
) -> Vec<usize> {
	if let Some(days) = &config.eruption_days {
		let (in_range, dropped): (Vec<usize>, Vec<usize>) =
			days.iter().partition(|each| **each < config.num_days);
		if !dropped.is_empty() {
			warn!(
				"Dropping eruption days {:?}, the series only has {} days",
				dropped, config.num_days
			);
		}

		// Repeated days would stack their precursors
		let mut kept = Vec::<usize>::with_capacity(in_range.len());
		for day in in_range {
			if !kept.contains(&day) {
				kept.push(day);
			}
		}

		return kept;
	}

	let available = config.num_days.saturating_sub(config.min_eruption_offset);
	if available == 0 {
		warn!(
			"No room for random eruptions in {} days after offset {}",
			config.num_days, config.min_eruption_offset
		);
		return Vec::new();
	}

	let count = rng
		.random_range(config.min_random_eruptions..=config.max_random_eruptions)
		.min(available);

	let mut days = rand::seq::index::sample(rng, available, count)
		.into_iter()
		.map(|each| each + config.min_eruption_offset)
		.collect::<Vec<_>>();
	days.sort_unstable();
	days
}

/// Adds a ramp on `[day - window, day)`, clipped at day 0. Contributions
/// of overlapping eruptions accumulate.
pub(crate) fn inject_precursor<R: Rng + ?Sized>(
	channel: &mut [f64],
	day: usize,
	precursor: &PrecursorConfig,
	rng: &mut R,
) {
	let window = precursor.window;
	if window == 0 {
		return;
	}

	let start = day.saturating_sub(window);
	let end = day.min(channel.len());

	for index in start..end {
		// 0 on the first day of the full window, 1 on the day before eruption
		let days_before = day - index;
		let ramp = if window == 1 {
			1f64
		} else {
			(window - days_before) as f64 / (window - 1) as f64
		};

		let mut signal = ramp * precursor.magnitude;
		let mut jitter = rng.random::<f64>() * precursor.jitter;
		if precursor.integral {
			signal = signal.floor();
			jitter = jitter.floor();
		}

		channel[index] += signal + jitter;
	}
}

/// Adds zero-mean Gaussian noise then clamps at zero.
pub(crate) fn add_noise_and_clamp<R: Rng + ?Sized>(
	channel: &mut [f64],
	std_dev: f64,
	rng: &mut R,
) -> Result<(), PipelineError> {
	let normal = match Normal::new(0f64, std_dev) {
		Ok(ok) => ok,
		Err(err) => {
			return Err(PipelineError::InvalidConfig(format!(
				"noise standard deviation {}: {}",
				std_dev, err
			)))
		}
	};

	channel.iter_mut().for_each(|each| {
		*each = (*each + normal.sample(rng)).max(0f64);
	});

	Ok(())
}
