// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Per-column `[min, max]` ranges and their on-disk form.
//!
//! The artifact is a small CSV: a header row with an empty first cell and one
//! column name per bounded column, then exactly two rows labelled `min` and
//! `max`. Values are written with the shortest representation that parses
//! back to the same `f64`, so a record survives a write/read cycle unchanged.

use crate::error::{Result, StoreError};

use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
	pub min: f64,
	pub max: f64,
}

impl Bounds {
	pub fn new(
		min: f64,
		max: f64,
	) -> Self {
		Self { min, max }
	}

	pub fn span(&self) -> f64 {
		self.max - self.min
	}

	pub fn is_degenerate(&self) -> bool {
		self.max == self.min
	}

	pub fn is_finite(&self) -> bool {
		self.min.is_finite() && self.max.is_finite()
	}
}

/// Ordered mapping from column name to its bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsRecord {
	entries: Vec<(String, Bounds)>,
}

impl BoundsRecord {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn get(
		&self,
		column: &str,
	) -> Option<Bounds> {
		self.entries
			.iter()
			.find(|(name, _)| name == column)
			.map(|(_, bounds)| *bounds)
	}

	pub fn contains(
		&self,
		column: &str,
	) -> bool {
		self.get(column).is_some()
	}

	/// Replaces the bounds of `column` in place, or appends a new entry.
	pub fn set(
		&mut self,
		column: &str,
		bounds: Bounds,
	) {
		match self.entries.iter_mut().find(|(name, _)| name == column) {
			Some(entry) => entry.1 = bounds,
			None => self.entries.push((column.to_string(), bounds)),
		}
	}

	pub fn with(
		mut self,
		column: &str,
		min: f64,
		max: f64,
	) -> Self {
		self.set(column, Bounds::new(min, max));
		self
	}

	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, Bounds)> {
		self.entries.iter().map(|(name, bounds)| (name.as_str(), *bounds))
	}

	pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
		let file = File::open(path.as_ref())?;
		Self::from_reader(file)
	}

	pub fn write_csv<P: AsRef<Path>>(
		&self,
		path: P,
	) -> Result<()> {
		let file = File::create(path.as_ref())?;
		self.to_writer(file)
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
		let headers = rdr.headers()?.clone();
		if headers.is_empty() {
			return Err(StoreError::MalformedBounds("no header row".to_string()));
		}
		let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

		let mut rows: Vec<(String, Vec<f64>)> = Vec::with_capacity(2);
		for (row_idx, record) in rdr.records().enumerate() {
			let record = record?;
			if record.len() != names.len() + 1 {
				return Err(StoreError::MalformedBounds(format!(
					"row {} has {} cells, expected {}",
					row_idx + 1,
					record.len(),
					names.len() + 1
				)));
			}
			let label = record.get(0).unwrap_or_default().trim().to_string();
			let mut values = Vec::with_capacity(names.len());
			for (name, cell) in names.iter().zip(record.iter().skip(1)) {
				let value: f64 = cell.trim().parse().map_err(|_| {
					StoreError::MalformedBounds(format!(
						"value '{}' of column '{}' in row '{}' is not a number",
						cell, name, label
					))
				})?;
				values.push(value);
			}
			rows.push((label, values));
		}

		if rows.len() != 2 {
			return Err(StoreError::MalformedBounds(format!(
				"expected exactly two rows (min, max), found {}",
				rows.len()
			)));
		}

		let (min_row, max_row) = match (rows[0].0.as_str(), rows[1].0.as_str()) {
			("max", "min") => (&rows[1].1, &rows[0].1),
			("min", "max") => (&rows[0].1, &rows[1].1),
			(first, second) => {
				debug!(
					first,
					second, "bounds rows are not labelled min/max, taking them positionally"
				);
				(&rows[0].1, &rows[1].1)
			},
		};

		let mut record = BoundsRecord::new();
		for (idx, name) in names.iter().enumerate() {
			record.set(name, Bounds::new(min_row[idx], max_row[idx]));
		}
		Ok(record)
	}

	pub fn to_writer<W: Write>(
		&self,
		writer: W,
	) -> Result<()> {
		let mut wtr = WriterBuilder::new().from_writer(writer);

		let mut header = vec![String::new()];
		header.extend(self.columns().map(str::to_string));
		wtr.write_record(&header)?;

		let mut min_row = vec!["min".to_string()];
		min_row.extend(self.entries.iter().map(|(_, b)| b.min.to_string()));
		wtr.write_record(&min_row)?;

		let mut max_row = vec!["max".to_string()];
		max_row.extend(self.entries.iter().map(|(_, b)| b.max.to_string()));
		wtr.write_record(&max_row)?;

		wtr.flush()?;
		Ok(())
	}
}
