// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use lib_store::error::StoreError;
use ndarray::ShapeError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, StageError>;

#[derive(Debug, Error)]
pub enum StageError {
	#[error("CSV Parse Error: {0}")]
	CsvError(#[from] csv::Error),
	#[error("IO Stage Error: {0}")]
	IOError(#[from] std::io::Error),
	#[error("No Header")]
	NoHeader,
	#[error("Invalid number '{value}' in column '{column}', row {row}")]
	InvalidNumber {
		column: String,
		row: usize,
		value: String,
	},
	#[error("Invalid config id '{value}' in row {row}")]
	InvalidConfigId { row: usize, value: String },
	#[error("Moment header is not a number: '{0}'")]
	InvalidMomentHeader(String),
	#[error("Moment {0} appears twice in the output table")]
	DuplicateMoment(f64),
	#[error("Column '{column}' has {found} values, table has {expected} rows")]
	LengthMismatch {
		column: String,
		expected: usize,
		found: usize,
	},
	#[error("Missing column: {0}")]
	MissingColumn(String),
	#[error("Column '{column}' has degenerate bounds [{min}, {max}]")]
	DegenerateBounds { column: String, min: f64, max: f64 },
	#[error("Column '{column}' has non-finite bounds [{min}, {max}]")]
	NonFiniteBounds { column: String, min: f64, max: f64 },
	#[error("No bounds for column: {0}")]
	MissingBounds(String),
	#[error("Dataset is empty")]
	EmptyDataset,
	#[error("Tables disagree on config ids")]
	ConfigIdMismatch,
	#[error("Array shaping Error")]
	ShapingError(#[from] ShapeError),
	#[error(transparent)]
	ConfigurationError(#[from] StoreError),
}
