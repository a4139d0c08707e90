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

use super::typedef::*;

pub(crate) fn column_params(rows: &[Vec<f64>]) -> Vec<ScaleParam> {
	let width = rows.first().map(|found| found.len()).unwrap_or_default();

	(0..width)
		.map(|column| {
			rows.iter().filter_map(|each| each.get(column)).fold(
				ScaleParam {
					min: f64::MAX,
					max: f64::MIN,
				},
				|last, value| ScaleParam {
					min: last.min.min(*value),
					max: last.max.max(*value),
				},
			)
		})
		.collect::<Vec<_>>()
}

/// 1 when any flag in `[start, end)` is set.
pub(crate) fn horizon_label(flags: &[u8], start: usize, end: usize) -> u8 {
	flags[start..end].iter().any(|each| *each != 0) as u8
}
