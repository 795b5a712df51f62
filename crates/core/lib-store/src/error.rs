// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use serde_json::Error as SerdeError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error(transparent)]
	SerdeJsonError(#[from] SerdeError),
	#[error("IO Store Error: {0}")]
	IOError(#[from] std::io::Error),
	#[error("CSV Store Error: {0}")]
	CsvError(#[from] csv::Error),
	#[error("Config Version is wrong")]
	InvalidConfig,
	#[error("Invalid Delimiter: {0}")]
	InvalidDelimiter(String),
	#[error("MangoDB Error")]
	MangoDB(#[from] mongodb::error::Error),
	#[error(transparent)]
	BsonError(#[from] mongodb::bson::ser::Error),
	#[error("No Config active")]
	NoConfigActive,
	#[error("Config not found: {0}")]
	ConfigNotFound(String),
	#[error("Malformed bounds table: {0}")]
	MalformedBounds(String),
}
