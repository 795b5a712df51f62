// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Training-time derivation of the bounds for output-derived columns.

use crate::data::Table;
use crate::error::{Result, StageError};
use crate::features::{LOAD_CASE, MOMENT, Y_IDP, Y_ROM};

use lib_store::{Bounds, BoundsRecord};
use tracing::info;

/// IDP is a ratio that is already confined to this range.
pub const IDP_BOUNDS: Bounds = Bounds { min: -1.0, max: 1.0 };

/// Extends the caller-supplied feature bounds with `Moment`, `y_ROM`, `y_IDP`
/// and `LoadCase`, derived from `dataset`. Entries for those four columns in
/// `supplied` are overwritten; every other entry is carried through as is.
///
/// The returned record is the one that has to be persisted and reused for
/// every later normalization or denormalization.
pub fn compute_bounds(
	dataset: &Table,
	supplied: &BoundsRecord,
) -> Result<BoundsRecord> {
	if dataset.is_empty() {
		return Err(StageError::EmptyDataset);
	}

	let moments = dataset.require(MOMENT)?;
	let y_rom = dataset.require(Y_ROM)?;

	let mut bounds = supplied.clone();
	bounds.set(MOMENT, Bounds::new(min(moments), max(moments)));
	bounds.set(Y_ROM, Bounds::new(0.0, (max(y_rom) + 1.0).ceil()));
	bounds.set(Y_IDP, IDP_BOUNDS);

	let load_case_max = match dataset.column(LOAD_CASE) {
		Some(cases) => max(cases).ceil(),
		None => 0.0,
	};
	bounds.set(LOAD_CASE, Bounds::new(0.0, load_case_max));

	// all-NaN columns fold to an infinite bound
	if let Some((column, b)) = bounds.iter().find(|(_, b)| !b.is_finite()) {
		return Err(StageError::NonFiniteBounds {
			column: column.to_string(),
			min: b.min,
			max: b.max,
		});
	}

	info!(
		columns = bounds.len(),
		moment_min = min(moments),
		moment_max = max(moments),
		rom_max = (max(y_rom) + 1.0).ceil(),
		"computed bounds"
	);
	Ok(bounds)
}

fn min(values: &[f64]) -> f64 {
	values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
	values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
