// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type")]
pub enum Models {
	RegressionNet {
		id: usize,
		hyperparams: HPRegressionNet,
		mode: Mode,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
	Train,
	Generate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HPRegressionNet {
	pub input_dim: usize,
	pub output_dim: usize,
	pub num_layers: usize,
	pub num_units: usize,
	pub dropout_p: f64,
	#[serde(default)]
	pub activation: Activation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
	#[default]
	Relu,
	Prelu,
}
