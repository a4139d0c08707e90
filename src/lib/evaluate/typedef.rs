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
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationMetrics {
	pub true_positive: u32,
	pub false_positive: u32,
	pub true_negative: u32,
	pub false_negative: u32,
	pub precision: f32,
	pub recall: f32,
	pub f1: f32,
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
	pub sample_count: usize,
	pub loss: f32,
	pub accuracy: f32,
	pub metrics: ClassificationMetrics,
}

/// A test window's prediction, dated by the first day of its horizon.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SamplePrediction {
	pub start: usize,
	pub date: Option<NaiveDate>,
	pub probability: f32,
	pub predicted: u8,
	pub actual: u8,
}
