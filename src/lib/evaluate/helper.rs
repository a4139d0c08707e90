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

pub(crate) fn threshold(probability: f32, decision_threshold: f32) -> u8 {
	(probability > decision_threshold) as u8
}

pub(crate) fn binary_accuracy(probabilities: &[f32], labels: &[u8], decision_threshold: f32) -> f32 {
	if labels.is_empty() {
		return 0f32;
	}

	let correct = probabilities
		.iter()
		.zip(labels.iter())
		.filter(|(probability, label)| threshold(**probability, decision_threshold) == **label)
		.count();

	correct as f32 / labels.len() as f32
}

pub(crate) fn classification_metrics(
	probabilities: &[f32],
	labels: &[u8],
	decision_threshold: f32,
) -> ClassificationMetrics {
	let mut metrics = ClassificationMetrics::default();

	for (probability, label) in probabilities.iter().zip(labels.iter()) {
		match (threshold(*probability, decision_threshold), *label) {
			(1, 1) => metrics.true_positive += 1,
			(1, _) => metrics.false_positive += 1,
			(_, 1) => metrics.false_negative += 1,
			_ => metrics.true_negative += 1,
		}
	}

	let tp = metrics.true_positive as f32;
	let fp = metrics.false_positive as f32;
	let fn_ = metrics.false_negative as f32;

	metrics.precision = if tp + fp > 0f32 { tp / (tp + fp) } else { 0f32 };
	metrics.recall = if tp + fn_ > 0f32 { tp / (tp + fn_) } else { 0f32 };
	metrics.f1 = if metrics.precision + metrics.recall > 0f32 {
		2f32 * metrics.precision * metrics.recall / (metrics.precision + metrics.recall)
	} else {
		0f32
	};

	metrics
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn accuracy_counts_thresholded_matches() {
		let probabilities = [0.9, 0.2, 0.6, 0.4];
		let labels = [1, 0, 0, 1];

		assert_relative_eq!(binary_accuracy(&probabilities, &labels, 0.5), 0.5);
		assert_eq!(binary_accuracy(&[], &[], 0.5), 0.0);
	}

	#[test]
	fn metrics_from_confusion_counts() {
		let probabilities = [0.9, 0.8, 0.7, 0.1, 0.2, 0.3];
		let labels = [1, 1, 0, 1, 0, 0];

		let metrics = classification_metrics(&probabilities, &labels, 0.5);

		assert_eq!(metrics.true_positive, 2);
		assert_eq!(metrics.false_positive, 1);
		assert_eq!(metrics.false_negative, 1);
		assert_eq!(metrics.true_negative, 2);
		assert_relative_eq!(metrics.precision, 2.0 / 3.0);
		assert_relative_eq!(metrics.recall, 2.0 / 3.0);
		assert_relative_eq!(metrics.f1, 2.0 / 3.0, epsilon = 1e-6);
	}

	#[test]
	fn no_positives_gives_zero_scores() {
		let metrics = classification_metrics(&[0.1, 0.2], &[0, 0], 0.5);

		assert_eq!(metrics.true_negative, 2);
		assert_eq!(metrics.precision, 0.0);
		assert_eq!(metrics.f1, 0.0);
	}
}
