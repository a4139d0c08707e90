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

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use burn::config::Config;
use clap::Parser;
use project_caldera_lib::{
	data::command::{write_predictions_csv, write_series_csv},
	run_pipeline, PipelineConfig, PipelineReport,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const PREVIEW_ROWS: usize = 5;

/// Simulate volcanic monitoring data and forecast eruptions with an LSTM
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// JSON pipeline configuration, defaults are used when omitted
	#[arg(long)]
	config: Option<PathBuf>,

	/// Overrides the configured random seed
	#[arg(long)]
	seed: Option<u64>,

	/// Directory receiving series.csv and predictions.csv
	#[arg(long)]
	export: Option<PathBuf>,

	/// Writes the whole run as JSON
	#[arg(long)]
	report: Option<PathBuf>,

	/// Writes the effective configuration as JSON
	#[arg(long)]
	save_config: Option<PathBuf>,

	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<()> {
	let args = Args::parse();

	let subscriber = FmtSubscriber::builder()
		.with_max_level(if args.verbose {
			Level::DEBUG
		} else {
			Level::INFO
		})
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let mut config = match &args.config {
		Some(path) => PipelineConfig::load(path)
			.map_err(|err| anyhow!("cannot load {}: {}", path.display(), err))?,
		None => PipelineConfig::new(),
	};
	if let Some(seed) = args.seed {
		config.seed = seed;
	}

	if let Some(path) = &args.save_config {
		config.save(path)?;
		info!("Saved configuration to {}", path.display());
	}

	let report = run_pipeline(&config)?;
	print_report(&report, config.forecast_horizon);

	if let Some(directory) = &args.export {
		std::fs::create_dir_all(directory)?;
		write_series_csv(&directory.join("series.csv"), &report.simulated.series)?;
		write_predictions_csv(&directory.join("predictions.csv"), &report.predictions)?;
	}

	if let Some(path) = &args.report {
		std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
		info!("Saved report to {}", path.display());
	}

	Ok(())
}

fn print_report(report: &PipelineReport, forecast_horizon: usize) {
	let series = &report.simulated.series;
	let header = "  day  date        deform.    seismic       gas  eruption";

	println!("First {} days:", PREVIEW_ROWS);
	println!("{}", header);
	series.head(PREVIEW_ROWS).iter().for_each(|each| println!("{}", each));

	println!("\nLast {} days:", PREVIEW_ROWS);
	println!("{}", header);
	series.tail(PREVIEW_ROWS).iter().for_each(|each| println!("{}", each));

	println!("\nEruption days: {:?}", report.simulated.eruption_days);
	println!(
		"Windows: {} total, {} train, {} test",
		report.window_count, report.train_count, report.test_count
	);

	if let Some(last) = report.history.epochs.last() {
		println!(
			"Trained {} epochs (best {:?}{}), last loss {:.4}",
			last.epoch,
			report.history.best_epoch,
			if report.history.stopped_early {
				", stopped early"
			} else {
				""
			},
			last.train_loss
		);
	}

	let evaluation = &report.evaluation;
	println!(
		"\nTest loss {:.4}, accuracy {:.4}, precision {:.3}, recall {:.3}, F1 {:.3}",
		evaluation.loss,
		evaluation.accuracy,
		evaluation.metrics.precision,
		evaluation.metrics.recall,
		evaluation.metrics.f1
	);

	println!("\nPredictions on the test windows:");
	for each in report.predictions.iter() {
		let horizon_start = each
			.date
			.map(|found| found.to_string())
			.unwrap_or_default();
		println!(
			"  {}  p={:.4}  predicted={}  actual={}",
			horizon_start, each.probability, each.predicted, each.actual
		);
	}

	match report.next_horizon {
		Some(probability) => println!(
			"\nEruption probability in the next {} days: {:.4}",
			forecast_horizon, probability
		),
		None => println!("\nNot enough data for a next-horizon forecast"),
	}
}
