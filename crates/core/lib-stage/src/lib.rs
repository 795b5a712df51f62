// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::data::Table;
use crate::error::Result;
use crate::normalize::Normalizer;

use lib_store::{cfg::Config, get_active_config, BoundsRecord};
use std::path::Path;
use tracing::info;

pub mod assemble;
pub mod bounds;
pub mod data;
pub mod error;
pub mod features;
pub mod normalize;
pub mod reshape;
pub mod search;

pub fn stager() -> Result<()> {
	let cfg = get_active_config()?;
	let dataset = stage(&cfg)?;
	info!(
		rows = dataset.n_rows(),
		columns = dataset.n_cols(),
		output = %cfg.output.dataset.display(),
		"staging finished"
	);
	Ok(())
}

/// Runs the staging pipeline described by `cfg` and writes the normalized
/// dataset to `cfg.output.dataset`.
///
/// Training assembles the load cases, extends the supplied bounds and
/// persists them. Otherwise the persisted bounds are read back and applied;
/// without load cases the input configurations alone are normalized.
pub fn stage(cfg: &Config) -> Result<Table> {
	let delimiter = cfg.data.delimiter_byte()?;
	let normalizer = Normalizer::default();

	let normalized = if cfg.output.train {
		let dataset = assemble::load_dataset(&cfg.data)?;
		let supplied = BoundsRecord::read_csv(&cfg.bounds.supplied)?;
		let (normalized, bounds) = normalizer.fit_normalize(&dataset, &supplied)?;
		bounds.write_csv(&cfg.bounds.persisted)?;
		info!(path = %cfg.bounds.persisted.display(), "persisted bounds");
		normalized
	} else {
		let bounds = BoundsRecord::read_csv(&cfg.bounds.persisted)?;
		let dataset = if cfg.data.load_cases.is_empty() {
			Table::read_csv(&cfg.data.input, delimiter)?
		} else {
			assemble::load_dataset(&cfg.data)?
		};
		normalizer.normalize(&dataset, &bounds, false, cfg.output.keep_target)?
	};

	normalized.write_csv(&cfg.output.dataset, delimiter)?;
	Ok(normalized)
}

/// Maps a CSV of normalized values (typically model predictions) back to
/// physical units with previously persisted bounds.
pub fn denormalize_file<P: AsRef<Path>, Q: AsRef<Path>, B: AsRef<Path>>(
	input: P,
	output: Q,
	bounds: B,
	also_target: bool,
	delimiter: u8,
) -> Result<Table> {
	let bounds = BoundsRecord::read_csv(bounds)?;
	let table = Table::read_csv(&input, delimiter)?;
	let restored = Normalizer::default().denormalize(&table, &bounds, also_target)?;
	restored.write_csv(&output, delimiter)?;
	info!(
		rows = restored.n_rows(),
		input = %input.as_ref().display(),
		output = %output.as_ref().display(),
		"denormalized"
	);
	Ok(restored)
}
