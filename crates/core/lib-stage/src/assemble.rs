// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Joins the reshaped ROM/IDP tables of every load case with the input
//! configurations into one dataset.

use crate::data::Table;
use crate::error::{Result, StageError};
use crate::features::{LOAD_CASE, MOMENT, Y_IDP, Y_ROM};
use crate::reshape::reshape;

use lib_store::cfg::DataSection;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The wide ROM and IDP tables of one load case.
#[derive(Debug, Clone)]
pub struct LoadCaseTables {
	pub rom: Table,
	pub idp: Table,
}

impl LoadCaseTables {
	pub fn read(
		source: &lib_store::cfg::LoadCaseSource,
		delimiter: u8,
	) -> Result<Self> {
		Ok(Self {
			rom: Table::read_csv(&source.rom, delimiter)?,
			idp: Table::read_csv(&source.idp, delimiter)?,
		})
	}
}

/// Reads the input configurations and every load case named in `data`, then
/// assembles them.
pub fn load_dataset(data: &DataSection) -> Result<Table> {
	let delimiter = data.delimiter_byte()?;
	let input_config = Table::read_csv(&data.input, delimiter)?;
	let cases = data
		.load_cases
		.iter()
		.map(|source| LoadCaseTables::read(source, delimiter))
		.collect::<Result<Vec<_>>>()?;
	assemble(&input_config, &cases)
}

/// Builds the dataset: per load case, ROM and IDP are inner-joined on
/// `(config_id, Moment)`, the input features are attached by `config_id`,
/// `LoadCase` is stamped with the case index and rows with a zero response are
/// removed. Cases are stacked in input order.
///
/// Input rows are keyed by their explicit `config_id` column, or by row
/// position when the input has none. Output rows whose id has no input row
/// keep NaN features.
pub fn assemble(
	input_config: &Table,
	cases: &[LoadCaseTables],
) -> Result<Table> {
	let input_rows: HashMap<usize, usize> = match input_config.config_ids() {
		Some(ids) => ids.iter().enumerate().map(|(row, &id)| (id, row)).collect(),
		None => (0..input_config.n_rows()).map(|row| (row, row)).collect(),
	};

	let mut frames = Vec::with_capacity(cases.len());
	for (case_idx, case) in cases.iter().enumerate() {
		let frame = assemble_case(input_config, &input_rows, case, case_idx)?;
		frames.push(frame);
	}

	let dataset = Table::concat(&frames)?;
	info!(
		rows = dataset.n_rows(),
		load_cases = cases.len(),
		"assembled dataset"
	);
	Ok(dataset)
}

fn assemble_case(
	input_config: &Table,
	input_rows: &HashMap<usize, usize>,
	case: &LoadCaseTables,
	case_idx: usize,
) -> Result<Table> {
	let rom = reshape(&case.rom, "ROM")?;
	let idp = reshape(&case.idp, "IDP")?;

	let (rom_ids, rom_moments, rom_values) = long_columns(&rom, Y_ROM)?;
	let (idp_ids, idp_moments, idp_values) = long_columns(&idp, Y_IDP)?;

	let mut idp_index: HashMap<(usize, u64), usize> = HashMap::with_capacity(idp_ids.len());
	for (row, (&id, &moment)) in idp_ids.iter().zip(idp_moments).enumerate() {
		idp_index.entry((id, moment.to_bits())).or_insert(row);
	}

	// (rom row, idp row) pairs, in ROM order
	let pairs: Vec<(usize, usize)> = rom_ids
		.iter()
		.zip(rom_moments)
		.enumerate()
		.filter_map(|(row, (&id, &moment))| {
			idp_index
				.get(&(id, moment.to_bits()))
				.map(|&idp_row| (row, idp_row))
		})
		.collect();

	if pairs.is_empty() {
		warn!(
			load_case = case_idx,
			"ROM and IDP tables share no (config_id, Moment) pair, case contributes no rows"
		);
	}

	let ids: Vec<usize> = pairs.iter().map(|&(r, _)| rom_ids[r]).collect();
	let mut frame = Table::with_config_ids(ids.clone());
	frame.set_column(MOMENT, pairs.iter().map(|&(r, _)| rom_moments[r]).collect())?;
	frame.set_column(Y_ROM, pairs.iter().map(|&(r, _)| rom_values[r]).collect())?;
	frame.set_column(Y_IDP, pairs.iter().map(|&(_, i)| idp_values[i]).collect())?;

	let unmatched = ids.iter().filter(|id| !input_rows.contains_key(id)).count();
	if unmatched > 0 {
		warn!(
			load_case = case_idx,
			rows = unmatched,
			"config ids without an input configuration, features left missing"
		);
	}

	for column in input_config.columns() {
		if column.name == MOMENT || column.name == LOAD_CASE {
			continue;
		}
		let values = ids
			.iter()
			.map(|id| match input_rows.get(id) {
				Some(&row) => column.values[row],
				None => f64::NAN,
			})
			.collect();
		frame.set_column(&column.name, values)?;
	}
	frame.set_column(LOAD_CASE, vec![case_idx as f64; ids.len()])?;

	let y_rom = frame.require(Y_ROM)?.to_vec();
	let y_idp = frame.require(Y_IDP)?.to_vec();
	let frame = frame.filter_rows(|r| y_rom[r] != 0.0 && y_idp[r] != 0.0);

	debug!(
		load_case = case_idx,
		joined = pairs.len(),
		kept = frame.n_rows(),
		"assembled load case"
	);
	Ok(frame)
}

fn long_columns<'a>(
	long: &'a Table,
	value_column: &str,
) -> Result<(&'a [usize], &'a [f64], &'a [f64])> {
	let ids = long
		.config_ids()
		.ok_or_else(|| StageError::MissingColumn(crate::data::CONFIG_ID.to_string()))?;
	Ok((ids, long.require(MOMENT)?, long.require(value_column)?))
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::data::RawTable;
	use crate::features::FEATURES;
	use std::collections::HashSet;

	fn table(csv: &str) -> Table {
		RawTable::from_reader(csv.as_bytes(), b',')
			.unwrap()
			.convert_to_f64_table()
			.unwrap()
	}

	fn input_config(rows: usize) -> Table {
		let mut csv = FEATURES.join(",");
		csv.push('\n');
		for row in 0..rows {
			let cells: Vec<String> = (0..FEATURES.len())
				.map(|col| format!("{}", row * 100 + col))
				.collect();
			csv.push_str(&cells.join(","));
			csv.push('\n');
		}
		table(&csv)
	}

	fn keys(dataset: &Table) -> HashSet<(usize, u64, u64)> {
		let ids = dataset.config_ids().unwrap();
		let cases = dataset.column(LOAD_CASE).unwrap();
		let moments = dataset.column(MOMENT).unwrap();
		(0..dataset.n_rows())
			.map(|r| (ids[r], cases[r].to_bits(), moments[r].to_bits()))
			.collect()
	}

	#[test]
	fn test_assemble_two_cases() {
		let cases = vec![
			LoadCaseTables {
				rom: table("0,1,2\n0,1.5,2.5\n0,1.2,2.2\n"),
				idp: table("0,1,2\n0,0.3,0.4\n0,0.1,0.2\n"),
			},
			LoadCaseTables {
				rom: table("1,2\n3.0,4.0\n5.0,6.0\n"),
				idp: table("2,3\n0.5,0.6\n0.7,0.8\n"),
			},
		];
		let dataset = assemble(&input_config(2), &cases).unwrap();

		// case 0: 2 configs x 2 moments, case 1: only moment 2 is shared
		assert_eq!(dataset.n_rows(), 6);
		let load_cases = dataset.column(LOAD_CASE).unwrap();
		assert_eq!(load_cases, &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
		assert_eq!(keys(&dataset).len(), dataset.n_rows());

		// features follow the config id, the placeholders are overwritten
		let ids = dataset.config_ids().unwrap();
		let kappa = dataset.column("Kappa").unwrap();
		for r in 0..dataset.n_rows() {
			assert_eq!(kappa[r], (ids[r] * 100 + 7) as f64);
		}
		assert!(dataset.column(MOMENT).unwrap().iter().all(|&m| m != 0.0));

		let y_idp = dataset.column(Y_IDP).unwrap();
		let y_rom = dataset.column(Y_ROM).unwrap();
		let case1: Vec<(f64, f64)> = (4..6).map(|r| (y_rom[r], y_idp[r])).collect();
		assert!(case1.contains(&(4.0, 0.5)));
		assert!(case1.contains(&(6.0, 0.7)));
	}

	#[test]
	fn test_sentinel_zero_rows_removed() {
		let cases = vec![LoadCaseTables {
			rom: table("1,2\n0,2.0\n1.0,3.0\n"),
			idp: table("1,2\n0.1,0.2\n0.3,0\n"),
		}];
		let dataset = assemble(&input_config(2), &cases).unwrap();

		let expected: HashSet<(usize, u64, u64)> = [(1, 1.0f64), (0, 2.0)]
			.iter()
			.map(|&(id, m)| (id, 0.0f64.to_bits(), m.to_bits()))
			.collect();
		assert_eq!(keys(&dataset), expected);
		assert!(dataset.column(Y_ROM).unwrap().iter().all(|&v| v != 0.0));
		assert!(dataset.column(Y_IDP).unwrap().iter().all(|&v| v != 0.0));
	}

	#[test]
	fn test_disjoint_case_contributes_nothing() {
		let cases = vec![
			LoadCaseTables {
				rom: table("1\n0.5\n"),
				idp: table("2\n0.5\n"),
			},
			LoadCaseTables {
				rom: table("1\n0.5\n"),
				idp: table("1\n0.25\n"),
			},
		];
		let dataset = assemble(&input_config(1), &cases).unwrap();
		assert_eq!(dataset.n_rows(), 1);
		assert_eq!(dataset.column(LOAD_CASE).unwrap(), &[1.0]);
	}

	#[test]
	fn test_missing_input_row_keeps_nan() {
		let cases = vec![LoadCaseTables {
			rom: table("1\n0.5\n0.6\n"),
			idp: table("1\n0.1\n0.2\n"),
		}];
		let dataset = assemble(&input_config(1), &cases).unwrap();
		assert_eq!(dataset.n_rows(), 2);

		let ids = dataset.config_ids().unwrap();
		let kappa = dataset.column("Kappa").unwrap();
		for r in 0..2 {
			if ids[r] == 0 {
				assert_eq!(kappa[r], 7.0);
			} else {
				assert!(kappa[r].is_nan());
			}
		}
	}
}
