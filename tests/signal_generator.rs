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

//! Properties of the simulated monitoring table.

use project_caldera_lib::simulate::command::generate_volcanic_data;
use project_caldera_lib::simulate::typedef::SimulationConfig;
use project_caldera_lib::Channel;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use strum::IntoEnumIterator;

#[test]
fn same_seed_gives_the_same_table() {
	let config = SimulationConfig::new();

	let first = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(2024)).unwrap();
	let second = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(2024)).unwrap();

	assert_eq!(first.series, second.series);
	assert_eq!(first.eruption_days, second.eruption_days);
}

#[test]
fn different_seeds_give_different_tables() {
	let config = SimulationConfig::new().with_eruption_days(Some(vec![200, 500]));

	let first = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(1)).unwrap();
	let second = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(2)).unwrap();

	assert_ne!(first.series, second.series);
}

#[test]
fn early_eruption_clips_its_precursors() {
	let config = SimulationConfig::new()
		.with_num_days(60)
		.with_eruption_days(Some(vec![5]));

	let data = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(3)).unwrap();

	assert_eq!(data.series.len(), 60);
	assert_eq!(data.series.flagged_days(), vec![5]);
}

#[test]
fn default_run_picks_one_or_two_eruptions() {
	for seed in 0..16 {
		let data =
			generate_volcanic_data(&SimulationConfig::new(), &mut StdRng::seed_from_u64(seed)).unwrap();

		assert!((1..=2).contains(&data.eruption_days.len()));
		assert!(data.eruption_days.iter().all(|each| (30..730).contains(each)));
		assert_eq!(data.series.flagged_days(), data.eruption_days);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(24))]

	#[test]
	fn channels_are_never_negative(
		seed in any::<u64>(),
		num_days in 0usize..400,
		noise_level in 0f64..20f64,
	) {
		let config = SimulationConfig::new()
			.with_num_days(num_days)
			.with_noise_level(noise_level);

		let data = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(seed)).unwrap();

		for channel in Channel::iter() {
			prop_assert!(data.series.channel(channel).iter().all(|each| *each >= 0f64));
		}
	}

	#[test]
	fn flags_sit_exactly_on_eruption_days(
		seed in any::<u64>(),
		days in proptest::collection::btree_set(30usize..300, 0..4),
	) {
		let days = days.into_iter().collect::<Vec<_>>();
		let config = SimulationConfig::new()
			.with_num_days(300)
			.with_eruption_days(Some(days.clone()));

		let data = generate_volcanic_data(&config, &mut StdRng::seed_from_u64(seed)).unwrap();

		prop_assert_eq!(data.series.flagged_days(), days);
	}
}
