// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Lookup of training configurations whose ROM curve resembles a target curve.

use crate::data::Table;
use crate::error::{Result, StageError};
use crate::features::{LOAD_CASE, MOMENT, Y_ROM};

use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

pub const CANDIDATE_SUFFIX: &str = "_candidate";
pub const TARGET_SUFFIX: &str = "_target";

/// A training configuration matched against a target curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatch {
	pub config_id: usize,
	/// `|mean(y_ROM_candidate - y_ROM_target)|` over the shared points where
	/// both values are present; NaN when there is no such point.
	pub distance: f64,
	/// First row of the join of the candidate with the target.
	pub row: Vec<(String, f64)>,
}

impl SampleMatch {
	pub fn get(
		&self,
		column: &str,
	) -> Option<f64> {
		self.row
			.iter()
			.find(|(name, _)| name == column)
			.map(|(_, value)| *value)
	}
}

/// The training configuration with the smallest ROM distance to `target`.
///
/// Candidates are visited in ascending id order and ties keep the earlier one.
/// Configurations sharing no `(LoadCase, Moment)` point with the target, or
/// whose distance is not finite, are skipped; `None` when none is left.
pub fn closest_train_sample(
	target: &Table,
	train: &Table,
) -> Result<Option<SampleMatch>> {
	let ids = train
		.unique_config_ids()
		.ok_or_else(|| StageError::MissingColumn(crate::data::CONFIG_ID.to_string()))?;

	let mut best: Option<SampleMatch> = None;
	for id in ids {
		let Some(candidate) = match_config(target, train, id)? else {
			continue;
		};
		if !candidate.distance.is_finite() {
			debug!(config_id = id, "no comparable ROM values, skipping");
			continue;
		}
		if best
			.as_ref()
			.map_or(true, |b| candidate.distance < b.distance)
		{
			best = Some(candidate);
		}
	}

	if let Some(found) = &best {
		debug!(
			config_id = found.config_id,
			distance = found.distance,
			"closest configuration"
		);
	}
	Ok(best)
}

/// Matches `target` against a configuration drawn uniformly from the rows
/// of `train`.
pub fn random_train_sample<R: Rng + ?Sized>(
	target: &Table,
	train: &Table,
	rng: &mut R,
) -> Result<Option<SampleMatch>> {
	let ids = train
		.config_ids()
		.ok_or_else(|| StageError::MissingColumn(crate::data::CONFIG_ID.to_string()))?;
	if ids.is_empty() {
		return Err(StageError::EmptyDataset);
	}
	let id = ids[rng.gen_range(0..ids.len())];

	let found = match_config(target, train, id)?;
	if let Some(found) = &found {
		debug!(
			config_id = found.config_id,
			distance = found.distance,
			"random configuration"
		);
	}
	Ok(found)
}

/// A single row of uniform `[0, 1)` values, one per column: a random point
/// of the normalized feature space.
pub fn random_features<R: Rng + ?Sized, S: AsRef<str>>(
	columns: &[S],
	rng: &mut R,
) -> Result<Table> {
	let mut table = Table::new(1);
	for column in columns {
		table.set_column(column.as_ref(), vec![rng.gen::<f64>()])?;
	}
	Ok(table)
}

fn match_config(
	target: &Table,
	train: &Table,
	config_id: usize,
) -> Result<Option<SampleMatch>> {
	let ids = train.config_ids().unwrap_or(&[]);
	let candidate = train.filter_rows(|r| ids[r] == config_id);
	let joined = join_on_case_moment(&candidate, target)?;
	if joined.is_empty() {
		return Ok(None);
	}

	let rom_candidate = joined.require(&format!("{}{}", Y_ROM, CANDIDATE_SUFFIX))?;
	let rom_target = joined.require(&format!("{}{}", Y_ROM, TARGET_SUFFIX))?;
	// missing values are left out of the mean
	let (sum, count) = rom_candidate
		.iter()
		.zip(rom_target)
		.map(|(c, t)| c - t)
		.filter(|d| d.is_finite())
		.fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));
	let mean = if count == 0 {
		f64::NAN
	} else {
		sum / count as f64
	};

	Ok(Some(SampleMatch {
		config_id,
		distance: mean.abs(),
		row: joined.row(0),
	}))
}

/// Inner join on `(LoadCase, Moment)`. Key columns appear once; other
/// columns present on both sides get the candidate/target suffixes.
fn join_on_case_moment(
	candidate: &Table,
	target: &Table,
) -> Result<Table> {
	let keys = [LOAD_CASE, MOMENT];
	for table in [candidate, target] {
		for key in keys.iter().copied().chain([Y_ROM]) {
			table.require(key)?;
		}
	}

	let key_of = |table: &Table, row: usize| -> Result<(u64, u64)> {
		Ok((
			table.require(LOAD_CASE)?[row].to_bits(),
			table.require(MOMENT)?[row].to_bits(),
		))
	};

	let mut target_index: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
	for row in 0..target.n_rows() {
		target_index.entry(key_of(target, row)?).or_default().push(row);
	}

	let mut left_rows = Vec::new();
	let mut right_rows = Vec::new();
	for row in 0..candidate.n_rows() {
		if let Some(matches) = target_index.get(&key_of(candidate, row)?) {
			for &t in matches {
				left_rows.push(row);
				right_rows.push(t);
			}
		}
	}

	let left = candidate.take_rows(&left_rows);
	let right = target.take_rows(&right_rows);
	let mut joined = Table::new(left_rows.len());
	for column in left.columns() {
		let name = if keys.contains(&column.name.as_str()) || !right.contains(&column.name) {
			column.name.clone()
		} else {
			format!("{}{}", column.name, CANDIDATE_SUFFIX)
		};
		joined.set_column(&name, column.values.clone())?;
	}
	for column in right.columns() {
		if keys.contains(&column.name.as_str()) {
			continue;
		}
		let name = if left.contains(&column.name) {
			format!("{}{}", column.name, TARGET_SUFFIX)
		} else {
			column.name.clone()
		};
		joined.set_column(&name, column.values.clone())?;
	}
	Ok(joined)
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn train() -> Table {
		// three configurations, two load cases, moments 1 and 2
		let mut ids = Vec::new();
		let mut cases = Vec::new();
		let mut moments = Vec::new();
		let mut rom = Vec::new();
		let mut kappa = Vec::new();
		for (id, offset) in [(0usize, 1.0), (1, 0.1), (2, -0.4)] {
			for case in [0.0, 1.0] {
				for moment in [1.0, 2.0] {
					ids.push(id);
					cases.push(case);
					moments.push(moment);
					rom.push(moment + offset);
					kappa.push(id as f64 / 10.0);
				}
			}
		}
		let mut table = Table::with_config_ids(ids);
		table.set_column(LOAD_CASE, cases).unwrap();
		table.set_column(MOMENT, moments).unwrap();
		table.set_column(Y_ROM, rom).unwrap();
		table.set_column("Kappa", kappa).unwrap();
		table
	}

	fn target() -> Table {
		let mut table = Table::new(2);
		table.set_column(LOAD_CASE, vec![0.0, 0.0]).unwrap();
		table.set_column(MOMENT, vec![1.0, 2.0]).unwrap();
		table.set_column(Y_ROM, vec![1.0, 2.0]).unwrap();
		table
	}

	#[test]
	fn test_closest() {
		let found = closest_train_sample(&target(), &train()).unwrap().unwrap();
		assert_eq!(found.config_id, 1);
		assert!((found.distance - 0.1).abs() < 1e-12);
		assert_eq!(found.get(LOAD_CASE), Some(0.0));
		assert_eq!(found.get(MOMENT), Some(1.0));
		assert_eq!(found.get("y_ROM_target"), Some(1.0));
		assert_eq!(found.get("Kappa"), Some(0.1));
		assert!(found.get(Y_ROM).is_none());
	}

	#[test]
	fn test_closest_skips_missing_rom() {
		let mut train = Table::with_config_ids(vec![0, 0, 1, 1, 2, 2]);
		train.set_column(LOAD_CASE, vec![0.0; 6]).unwrap();
		train
			.set_column(MOMENT, vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0])
			.unwrap();
		train
			.set_column(Y_ROM, vec![5.0, f64::NAN, f64::NAN, f64::NAN, 1.0, 2.0])
			.unwrap();

		let found = closest_train_sample(&target(), &train).unwrap().unwrap();
		assert_eq!(found.config_id, 2);
		assert_eq!(found.distance, 0.0);

		// config 0 alone: the NaN point is left out of the mean
		let partial = train.filter_rows(|r| r < 2);
		let found = closest_train_sample(&target(), &partial).unwrap().unwrap();
		assert_eq!(found.config_id, 0);
		assert_eq!(found.distance, 4.0);

		// config 1 alone has nothing to compare
		let missing = train.filter_rows(|r| r == 2 || r == 3);
		assert!(closest_train_sample(&target(), &missing).unwrap().is_none());
	}

	#[test]
	fn test_closest_without_overlap() {
		let mut far = target();
		far.set_column(MOMENT, vec![7.0, 8.0]).unwrap();
		assert!(closest_train_sample(&far, &train()).unwrap().is_none());
	}

	#[test]
	fn test_closest_requires_ids() {
		let anonymous = train().select(&[LOAD_CASE, MOMENT, Y_ROM], false);
		assert!(matches!(
			closest_train_sample(&target(), &anonymous),
			Err(StageError::MissingColumn(_))
		));
	}

	#[test]
	fn test_random_sample() {
		let mut rng = StdRng::seed_from_u64(7);
		let found = random_train_sample(&target(), &train(), &mut rng)
			.unwrap()
			.unwrap();
		assert!(found.config_id <= 2);
		let expected = [1.0, 0.1, 0.4][found.config_id];
		assert!((found.distance - expected).abs() < 1e-12);
	}

	#[test]
	fn test_random_features() {
		let mut rng = StdRng::seed_from_u64(1);
		let features = random_features(&["Kappa", "K1Rad"], &mut rng).unwrap();
		assert_eq!(features.n_rows(), 1);
		assert_eq!(features.column_names().collect::<Vec<_>>(), vec!["Kappa", "K1Rad"]);
		assert!(features
			.columns()
			.iter()
			.all(|c| (0.0..1.0).contains(&c.values[0])));
	}
}
