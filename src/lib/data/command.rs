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

use std::path::Path;
use tracing::info;

use crate::evaluate::typedef::SamplePrediction;
use crate::typedef::{DailyRecord, PipelineError, VolcanicSeries};

pub fn write_series_csv(path: &Path, series: &VolcanicSeries) -> Result<(), PipelineError> {
	let mut writer = csv::Writer::from_path(path)?;

	for each in series.records.iter() {
		writer.serialize(each)?;
	}

	writer.flush()?;
	info!("Wrote {} days to {}", series.len(), path.display());

	Ok(())
}

pub fn read_series_csv(path: &Path) -> Result<VolcanicSeries, PipelineError> {
	let mut reader = csv::Reader::from_path(path)?;

	let records = reader
		.deserialize::<DailyRecord>()
		.collect::<Result<Vec<_>, _>>()?;

	Ok(VolcanicSeries { records })
}

pub fn write_predictions_csv(
	path: &Path,
	predictions: &[SamplePrediction],
) -> Result<(), PipelineError> {
	let mut writer = csv::Writer::from_path(path)?;

	writer.write_record([
		"Window Start",
		"Horizon Start",
		"Probability",
		"Predicted",
		"Actual",
	])?;

	for each in predictions {
		let horizon_start = each
			.date
			.map(|found| found.to_string())
			.unwrap_or_default();
		writer.write_record([
			each.start.to_string(),
			horizon_start,
			each.probability.to_string(),
			each.predicted.to_string(),
			each.actual.to_string(),
		])?;
	}

	writer.flush()?;
	info!("Wrote {} predictions to {}", predictions.len(), path.display());

	Ok(())
}
