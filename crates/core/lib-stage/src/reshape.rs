// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Wide-to-long conversion of a per-moment output table.

use crate::data::Table;
use crate::error::{Result, StageError};
use crate::features::{output_column, MOMENT};

use std::collections::HashSet;
use tracing::debug;

/// Turns a wide table (one row per configuration, one column per moment) into
/// a long table keyed by `(config_id, Moment)` with the observed value in
/// `y_<output_name>`.
///
/// Ids come from the table's `config_id` column when it has one, otherwise
/// from the 0-based row position. The zero-moment column is the undeformed
/// reference state and is dropped. Rows are emitted moment by moment, and
/// within a moment in source row order.
pub fn reshape(
	wide: &Table,
	output_name: &str,
) -> Result<Table> {
	let ids: Vec<usize> = match wide.config_ids() {
		Some(ids) => ids.to_vec(),
		None => (0..wide.n_rows()).collect(),
	};

	let mut seen = HashSet::new();
	let mut moments = Vec::with_capacity(wide.n_cols());
	for column in wide.columns() {
		let moment = parse_moment(&column.name)?;
		if moment == 0.0 {
			debug!(header = %column.name, output_name, "dropping zero-moment column");
			continue;
		}
		if !seen.insert(moment.to_bits()) {
			return Err(StageError::DuplicateMoment(moment));
		}
		moments.push((moment, &column.values));
	}

	let n_rows = moments.len() * ids.len();
	let mut config_ids = Vec::with_capacity(n_rows);
	let mut moment_values = Vec::with_capacity(n_rows);
	let mut outputs = Vec::with_capacity(n_rows);
	for (moment, values) in moments {
		config_ids.extend_from_slice(&ids);
		moment_values.extend(std::iter::repeat(moment).take(ids.len()));
		outputs.extend_from_slice(values);
	}

	let mut long = Table::with_config_ids(config_ids);
	long.set_column(MOMENT, moment_values)?;
	long.set_column(&output_column(output_name), outputs)?;
	Ok(long)
}

fn parse_moment(header: &str) -> Result<f64> {
	header
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|m| m.is_finite())
		.ok_or_else(|| StageError::InvalidMomentHeader(header.to_string()))
}
