// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::Result;

use inquire::{Select, Text};
use lib_store::{activate_config, config_from_file, list_configs};
use tracing::info;

pub fn config_menu() -> Result<()> {
	loop {
		let cfg_menu = vec!["Import", "List", "Activate", "Back"];

		let selection = Select::new("Configurations:", cfg_menu)
			.with_help_message("Here you can import, list and activate configurations.")
			.prompt()?;

		match selection {
			"Import" => {
				let path = Text::new("Path to the JSON configuration:").prompt()?;
				let name = Text::new("Name:").prompt()?;
				config_from_file(path, name)?;
			},
			"List" => {
				let names = list_configs()?;
				if names.is_empty() {
					info!("no configurations stored");
				}
				for name in names {
					info!(name = %name, "configuration");
				}
			},
			"Activate" => {
				let names = list_configs()?;
				if names.is_empty() {
					info!("no configurations stored");
					continue;
				}
				let name = Select::new("Activate:", names).prompt()?;
				activate_config(name)?;
			},
			"Back" => {
				return Ok(());
			},
			_ => (),
		}
	}
}
