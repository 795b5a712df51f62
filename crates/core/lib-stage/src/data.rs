// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Tabular containers used across the staging pipeline.
//!
//! `RawTable` holds the cells of a CSV file as read; `Table` is the numeric,
//! column-oriented form every transformation works on. A `config_id` column is
//! never stored as a float column: it is lifted into the table's explicit id
//! field when the file is converted, and written back first when exported.

use crate::error::{Result, StageError};

use csv::{ReaderBuilder, WriterBuilder};
use ndarray::Array2;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const CONFIG_ID: &str = "config_id";

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable<T> {
	pub headers: Vec<String>,
	pub rows: Vec<Vec<T>>,
}

impl RawTable<String> {
	pub fn from_csv<P: AsRef<Path>>(
		path: P,
		delimiter: u8,
	) -> Result<Self> {
		let file = File::open(path.as_ref())?;
		Self::from_reader(file, delimiter)
	}

	pub fn from_reader<R: Read>(
		reader: R,
		delimiter: u8,
	) -> Result<Self> {
		let mut rdr = ReaderBuilder::new()
			.has_headers(true)
			.delimiter(delimiter)
			.from_reader(reader);

		let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
		if headers.is_empty() {
			return Err(StageError::NoHeader);
		}

		let mut rows = Vec::new();
		for record in rdr.records() {
			let record = record?;
			rows.push(record.iter().map(str::to_string).collect());
		}

		Ok(Self { headers, rows })
	}

	/// Parses every cell as `f64`. Empty cells become NaN (missing); anything
	/// else that does not parse is rejected.
	pub fn convert_to_f64_table(self) -> Result<Table> {
		let id_idx = self.headers.iter().position(|h| h == CONFIG_ID);
		let n_rows = self.rows.len();

		let config_ids = match id_idx {
			Some(idx) => {
				let mut ids = Vec::with_capacity(n_rows);
				for (row, cells) in self.rows.iter().enumerate() {
					let cell = cells[idx].trim();
					let id = parse_config_id(cell).ok_or_else(|| StageError::InvalidConfigId {
						row,
						value: cell.to_string(),
					})?;
					ids.push(id);
				}
				Some(ids)
			},
			None => None,
		};

		let mut columns = Vec::with_capacity(self.headers.len());
		for (col_idx, name) in self.headers.iter().enumerate() {
			if Some(col_idx) == id_idx {
				continue;
			}
			let mut values = Vec::with_capacity(n_rows);
			for (row, cells) in self.rows.iter().enumerate() {
				let cell = cells[col_idx].trim();
				let value = if cell.is_empty() {
					f64::NAN
				} else {
					cell.parse::<f64>().map_err(|_| StageError::InvalidNumber {
						column: name.clone(),
						row,
						value: cell.to_string(),
					})?
				};
				values.push(value);
			}
			columns.push(Column {
				name: name.clone(),
				values,
			});
		}

		Ok(Table {
			config_ids,
			columns,
			n_rows,
		})
	}
}

/// Accepts `3` as well as the `3.0` a float-typed writer may produce.
fn parse_config_id(cell: &str) -> Option<usize> {
	if let Ok(id) = cell.parse::<usize>() {
		return Some(id);
	}
	let value = cell.parse::<f64>().ok()?;
	(value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64).then_some(value as usize)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
	pub name: String,
	pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
	config_ids: Option<Vec<usize>>,
	columns: Vec<Column>,
	n_rows: usize,
}

impl Table {
	pub fn new(n_rows: usize) -> Self {
		Self {
			config_ids: None,
			columns: Vec::new(),
			n_rows,
		}
	}

	pub fn with_config_ids(config_ids: Vec<usize>) -> Self {
		Self {
			n_rows: config_ids.len(),
			config_ids: Some(config_ids),
			columns: Vec::new(),
		}
	}

	pub fn read_csv<P: AsRef<Path>>(
		path: P,
		delimiter: u8,
	) -> Result<Self> {
		RawTable::from_csv(path, delimiter)?.convert_to_f64_table()
	}

	pub fn n_rows(&self) -> usize {
		self.n_rows
	}

	pub fn n_cols(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.n_rows == 0
	}

	pub fn config_ids(&self) -> Option<&[usize]> {
		self.config_ids.as_deref()
	}

	pub fn column_names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|c| c.name.as_str())
	}

	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	pub fn contains(
		&self,
		name: &str,
	) -> bool {
		self.columns.iter().any(|c| c.name == name)
	}

	pub fn column(
		&self,
		name: &str,
	) -> Option<&[f64]> {
		self.columns
			.iter()
			.find(|c| c.name == name)
			.map(|c| c.values.as_slice())
	}

	pub fn require(
		&self,
		name: &str,
	) -> Result<&[f64]> {
		self.column(name)
			.ok_or_else(|| StageError::MissingColumn(name.to_string()))
	}

	/// Replaces the values of `name` in place, or appends it as the last column.
	pub fn set_column(
		&mut self,
		name: &str,
		values: Vec<f64>,
	) -> Result<()> {
		if values.len() != self.n_rows {
			return Err(StageError::LengthMismatch {
				column: name.to_string(),
				expected: self.n_rows,
				found: values.len(),
			});
		}
		match self.columns.iter_mut().find(|c| c.name == name) {
			Some(column) => column.values = values,
			None => self.columns.push(Column {
				name: name.to_string(),
				values,
			}),
		}
		Ok(())
	}

	pub fn map_column<F: Fn(f64) -> f64>(
		&mut self,
		name: &str,
		f: F,
	) -> Result<()> {
		let column = self
			.columns
			.iter_mut()
			.find(|c| c.name == name)
			.ok_or_else(|| StageError::MissingColumn(name.to_string()))?;
		column.values.iter_mut().for_each(|v| *v = f(*v));
		Ok(())
	}

	/// Columns of `names` that exist, in the order given; absent names are skipped.
	pub fn select<S: AsRef<str>>(
		&self,
		names: &[S],
		keep_ids: bool,
	) -> Table {
		let columns = names
			.iter()
			.filter_map(|name| self.columns.iter().find(|c| c.name == name.as_ref()))
			.cloned()
			.collect();
		Table {
			config_ids: if keep_ids { self.config_ids.clone() } else { None },
			columns,
			n_rows: self.n_rows,
		}
	}

	pub fn filter_rows<F: Fn(usize) -> bool>(
		&self,
		keep: F,
	) -> Table {
		let rows: Vec<usize> = (0..self.n_rows).filter(|&r| keep(r)).collect();
		self.take_rows(&rows)
	}

	pub fn take_rows(
		&self,
		rows: &[usize],
	) -> Table {
		Table {
			config_ids: self
				.config_ids
				.as_ref()
				.map(|ids| rows.iter().map(|&r| ids[r]).collect()),
			columns: self
				.columns
				.iter()
				.map(|c| Column {
					name: c.name.clone(),
					values: rows.iter().map(|&r| c.values[r]).collect(),
				})
				.collect(),
			n_rows: rows.len(),
		}
	}

	pub fn row(
		&self,
		idx: usize,
	) -> Vec<(String, f64)> {
		self.columns
			.iter()
			.map(|c| (c.name.clone(), c.values[idx]))
			.collect()
	}

	/// Stacks tables vertically. Columns are aligned by name in order of first
	/// appearance; a table lacking a column contributes NaN for it.
	pub fn concat(tables: &[Table]) -> Result<Table> {
		let with_ids = tables.iter().filter(|t| t.config_ids.is_some()).count();
		if with_ids != 0 && with_ids != tables.len() {
			return Err(StageError::ConfigIdMismatch);
		}

		let mut names: Vec<&str> = Vec::new();
		for table in tables {
			for name in table.column_names() {
				if !names.contains(&name) {
					names.push(name);
				}
			}
		}

		let n_rows = tables.iter().map(Table::n_rows).sum();
		let config_ids = (with_ids != 0).then(|| {
			tables
				.iter()
				.flat_map(|t| t.config_ids.iter().flatten().copied())
				.collect()
		});
		let columns = names
			.iter()
			.map(|&name| {
				let mut values = Vec::with_capacity(n_rows);
				for table in tables {
					match table.column(name) {
						Some(col) => values.extend_from_slice(col),
						None => values.extend(std::iter::repeat(f64::NAN).take(table.n_rows)),
					}
				}
				Column {
					name: name.to_string(),
					values,
				}
			})
			.collect();

		Ok(Table {
			config_ids,
			columns,
			n_rows,
		})
	}

	/// Row-major matrix of all float columns, in column order.
	pub fn to_array(&self) -> Result<Array2<f64>> {
		let mut data = Vec::with_capacity(self.n_rows * self.columns.len());
		for row in 0..self.n_rows {
			data.extend(self.columns.iter().map(|c| c.values[row]));
		}
		Ok(Array2::from_shape_vec(
			(self.n_rows, self.columns.len()),
			data,
		)?)
	}

	pub fn write_csv<P: AsRef<Path>>(
		&self,
		path: P,
		delimiter: u8,
	) -> Result<()> {
		let file = File::create(path.as_ref())?;
		self.to_writer(file, delimiter)
	}

	pub fn to_writer<W: Write>(
		&self,
		writer: W,
		delimiter: u8,
	) -> Result<()> {
		let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);

		let mut header: Vec<&str> = Vec::with_capacity(self.columns.len() + 1);
		if self.config_ids.is_some() {
			header.push(CONFIG_ID);
		}
		header.extend(self.column_names());
		wtr.write_record(&header)?;

		for row in 0..self.n_rows {
			let mut record: Vec<String> = Vec::with_capacity(header.len());
			if let Some(ids) = &self.config_ids {
				record.push(ids[row].to_string());
			}
			record.extend(self.columns.iter().map(|c| format_cell(c.values[row])));
			wtr.write_record(&record)?;
		}

		wtr.flush()?;
		Ok(())
	}

	/// Distinct config ids in ascending order.
	pub fn unique_config_ids(&self) -> Option<Vec<usize>> {
		self.config_ids
			.as_ref()
			.map(|ids| ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect())
	}
}

fn format_cell(value: f64) -> String {
	if value.is_nan() {
		String::new()
	} else {
		value.to_string()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_convert_lifts_config_id() {
		let csv = "Kappa,config_id,K1Rad\n0.1,7,2\n0.2,3.0,\n";
		let table = RawTable::from_reader(csv.as_bytes(), b',')
			.unwrap()
			.convert_to_f64_table()
			.unwrap();

		assert_eq!(table.config_ids(), Some(&[7, 3][..]));
		assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Kappa", "K1Rad"]);
		assert_eq!(table.column("Kappa").unwrap(), &[0.1, 0.2]);
		assert!(table.column("K1Rad").unwrap()[1].is_nan());
	}

	#[test]
	fn test_convert_rejects_text() {
		let csv = "Kappa\n0.1\nsoft\n";
		let err = RawTable::from_reader(csv.as_bytes(), b',')
			.unwrap()
			.convert_to_f64_table()
			.unwrap_err();
		assert!(matches!(err, StageError::InvalidNumber { row: 1, .. }));
	}

	#[test]
	fn test_bad_config_id() {
		let csv = "config_id,Kappa\n-1,0.1\n";
		let err = RawTable::from_reader(csv.as_bytes(), b',')
			.unwrap()
			.convert_to_f64_table()
			.unwrap_err();
		assert!(matches!(err, StageError::InvalidConfigId { row: 0, .. }));
	}

	#[test]
	fn test_select_and_filter() {
		let mut table = Table::with_config_ids(vec![0, 1, 2]);
		table.set_column("a", vec![1.0, 2.0, 3.0]).unwrap();
		table.set_column("b", vec![4.0, 5.0, 6.0]).unwrap();

		let selected = table.select(&["b", "missing", "a"], false);
		assert_eq!(selected.column_names().collect::<Vec<_>>(), vec!["b", "a"]);
		assert!(selected.config_ids().is_none());

		let filtered = table.filter_rows(|r| r != 1);
		assert_eq!(filtered.config_ids(), Some(&[0, 2][..]));
		assert_eq!(filtered.column("b").unwrap(), &[4.0, 6.0]);
	}

	#[test]
	fn test_set_column_length() {
		let mut table = Table::new(2);
		assert!(matches!(
			table.set_column("a", vec![1.0]),
			Err(StageError::LengthMismatch { .. })
		));
	}

	#[test]
	fn test_concat_aligns_columns() {
		let mut first = Table::with_config_ids(vec![0]);
		first.set_column("a", vec![1.0]).unwrap();
		let mut second = Table::with_config_ids(vec![5, 6]);
		second.set_column("b", vec![2.0, 3.0]).unwrap();
		second.set_column("a", vec![4.0, 5.0]).unwrap();

		let joined = Table::concat(&[first, second]).unwrap();
		assert_eq!(joined.n_rows(), 3);
		assert_eq!(joined.config_ids(), Some(&[0, 5, 6][..]));
		assert_eq!(joined.column("a").unwrap(), &[1.0, 4.0, 5.0]);
		assert!(joined.column("b").unwrap()[0].is_nan());
	}

	#[test]
	fn test_concat_rejects_mixed_ids() {
		let first = Table::with_config_ids(vec![0]);
		let second = Table::new(1);
		assert!(matches!(
			Table::concat(&[first, second]),
			Err(StageError::ConfigIdMismatch)
		));
	}

	#[test]
	fn test_csv_roundtrip() {
		let mut table = Table::with_config_ids(vec![4, 2]);
		table.set_column("Moment", vec![0.5, 7.25]).unwrap();
		table.set_column("y_ROM", vec![f64::NAN, 1.0 / 3.0]).unwrap();

		let mut buf = Vec::new();
		table.to_writer(&mut buf, b',').unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert!(text.starts_with("config_id,Moment,y_ROM\n4,0.5,\n"));

		let back = RawTable::from_reader(text.as_bytes(), b',')
			.unwrap()
			.convert_to_f64_table()
			.unwrap();
		assert_eq!(back.config_ids(), table.config_ids());
		assert_eq!(back.column("y_ROM").unwrap()[1], 1.0 / 3.0);
	}

	#[test]
	fn test_to_array() {
		let mut table = Table::new(2);
		table.set_column("a", vec![1.0, 2.0]).unwrap();
		table.set_column("b", vec![3.0, 4.0]).unwrap();
		let array = table.to_array().unwrap();
		assert_eq!(array.shape(), &[2, 2]);
		assert_eq!(array[[1, 0]], 2.0);
		assert_eq!(array[[0, 1]], 3.0);
	}
}
