// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::{Result, StoreError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
	pub input: PathBuf,
	#[serde(default)]
	pub load_cases: Vec<LoadCaseSource>,
	pub delimiter: Option<String>,
}

impl DataSection {
	pub fn delimiter_byte(&self) -> Result<u8> {
		match self.delimiter.as_deref() {
			None => Ok(b','),
			Some(d) if d.len() == 1 => Ok(d.as_bytes()[0]),
			Some(d) => Err(StoreError::InvalidDelimiter(d.to_string())),
		}
	}
}

/// The two wide output tables of one load case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCaseSource {
	pub rom: PathBuf,
	pub idp: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsSection {
	/// Physical ranges of the input features, provided by the caller.
	pub supplied: PathBuf,
	/// Bounds written by a training run and read back for inference.
	pub persisted: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
	pub dataset: PathBuf,
	#[serde(default = "default_train")]
	pub train: bool,
	#[serde(default)]
	pub keep_target: bool,
}

fn default_train() -> bool {
	true
}
