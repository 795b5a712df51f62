// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use thiserror::Error;

pub type Result<T> = core::result::Result<T, CalcError>;

#[derive(Debug, Error)]
pub enum CalcError {
	#[error("Invalid hyperparameters: {0}")]
	InvalidHyperparams(String),

	#[error("Shape mismatch: expected {expected:?}, found {found} elements")]
	ShapeMismatch { expected: Vec<usize>, found: usize },

	#[error("Input has {found} features, the model expects {expected}")]
	InputWidth { expected: usize, found: usize },

	#[error("Invalid bound: lower {lower} is above upper {upper}")]
	InvalidBound { lower: f64, upper: f64 },

	#[error(transparent)]
	ShapingError(#[from] ndarray::ShapeError),
}
