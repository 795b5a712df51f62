// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod calc;
pub mod stage;

pub use calc::*;
pub use stage::*;

use crate::error::{Result, StoreError};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub name: Option<String>,
	pub active: Option<bool>,
	pub version: String,
	pub data: DataSection,
	pub bounds: BoundsSection,
	#[serde(default)]
	pub models: Vec<Models>,
	pub output: OutputSection,
}

impl Config {
	pub fn cfg_version() -> String {
		"0.11_pre_alpha".to_string()
	}

	pub fn get_config<P: AsRef<Path>>(path: P) -> Result<Config> {
		let file = File::open(path.as_ref())?;
		let reader = BufReader::new(file);

		let config: Config = serde_json::from_reader(reader)?;
		config.validated()
	}

	pub fn from_json(json: &str) -> Result<Config> {
		let config: Config = serde_json::from_str(json)?;
		config.validated()
	}

	fn validated(self) -> Result<Config> {
		if self.version != Self::cfg_version() {
			return Err(StoreError::InvalidConfig);
		}
		self.data.delimiter_byte()?;
		Ok(self)
	}

	/// First regression network entry, if the config declares one.
	pub fn regression_net(&self) -> Option<&HPRegressionNet> {
		self.models.iter().find_map(|model| match model {
			Models::RegressionNet { hyperparams, .. } => Some(hyperparams),
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	const CONFIG: &str = r#"{
		"version": "0.11_pre_alpha",
		"data": {
			"input": "data/input.csv",
			"load_cases": [
				{ "rom": "data/flexion_rom.csv", "idp": "data/flexion_idp.csv" },
				{ "rom": "data/extension_rom.csv", "idp": "data/extension_idp.csv" }
			]
		},
		"bounds": {
			"supplied": "data/bounds.csv",
			"persisted": "out/bounds.csv"
		},
		"models": [
			{
				"model_type": "RegressionNet",
				"id": 0,
				"hyperparams": {
					"input_dim": 15,
					"output_dim": 2,
					"num_layers": 4,
					"num_units": 256,
					"dropout_p": 0.1
				},
				"mode": "Train"
			}
		],
		"output": { "dataset": "out/dataset.csv", "train": true }
	}"#;

	#[test]
	fn test_parse_config() {
		let cfg = Config::from_json(CONFIG).unwrap();
		assert_eq!(cfg.data.load_cases.len(), 2);
		assert_eq!(cfg.data.delimiter_byte().unwrap(), b',');
		assert!(cfg.output.train);
		assert!(!cfg.output.keep_target);

		let hp = cfg.regression_net().unwrap();
		assert_eq!(hp.num_layers, 4);
		assert_eq!(hp.activation, Activation::Relu);
	}

	#[test]
	fn test_wrong_version() {
		let json = CONFIG.replace("0.11_pre_alpha", "0.10");
		assert!(matches!(
			Config::from_json(&json),
			Err(StoreError::InvalidConfig)
		));
	}

	#[test]
	fn test_bad_delimiter() {
		let json = CONFIG.replace(
			r#""input": "data/input.csv","#,
			r#""input": "data/input.csv", "delimiter": ";;","#,
		);
		assert!(matches!(
			Config::from_json(&json),
			Err(StoreError::InvalidDelimiter(_))
		));
	}
}
