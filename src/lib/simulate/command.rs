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

use chrono::Days;
use rand::Rng;
use tracing::{debug, info};

use super::helper::*;
use super::typedef::*;
use crate::typedef::{DailyRecord, PipelineError, VolcanicSeries};

/// Generates a daily monitoring table with ramped precursors ahead of each
/// eruption day. Reproducible only through the injected `rng`.
pub fn generate_volcanic_data<R: Rng + ?Sized>(
	config: &SimulationConfig,
	rng: &mut R,
) -> Result<SimulatedData, PipelineError> {
	config.validate()?;

	let start_date = parse_start_date(&config.start_date)?;
	let num_days = config.num_days;

	let [mut deformation, mut seismic, mut gas] =
		background_series(num_days, &config.background, rng);

	let eruption_days = resolve_eruption_days(config, rng);

	for day in eruption_days.iter().cloned() {
		inject_precursor(&mut deformation, day, &config.deformation_precursor, rng);
		inject_precursor(&mut seismic, day, &config.seismic_precursor, rng);
		inject_precursor(&mut gas, day, &config.gas_precursor, rng);
		debug!("Injected precursors ahead of day {}", day);
	}

	let mut eruption = vec![0u8; num_days];
	for day in eruption_days.iter() {
		eruption[*day] = 1;
	}

	add_noise_and_clamp(&mut deformation, config.noise_level, rng)?;
	add_noise_and_clamp(
		&mut seismic,
		config.noise_level * config.seismic_noise_scale,
		rng,
	)?;
	add_noise_and_clamp(&mut gas, config.noise_level * config.gas_noise_scale, rng)?;

	let mut records = Vec::<DailyRecord>::with_capacity(num_days);
	for day in 0..num_days {
		let date = match start_date.checked_add_days(Days::new(day as u64)) {
			Some(found) => found,
			None => {
				return Err(PipelineError::InvalidConfig(format!(
					"day {} overflows the calendar from {}",
					day, start_date
				)))
			}
		};

		records.push(DailyRecord {
			day,
			date,
			deformation: deformation[day],
			seismic_activity: seismic[day],
			gas_emission: gas[day],
			eruption: eruption[day],
		});
	}

	info!(
		"Simulated {} days from {} with eruptions on {:?}",
		num_days, start_date, eruption_days
	);

	Ok(SimulatedData {
		series: VolcanicSeries { records },
		eruption_days,
	})
}
