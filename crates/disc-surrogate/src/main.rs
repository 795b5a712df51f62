// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

mod config_menu;
mod error;
mod start_menu;

use config_menu::config_menu;
use error::Result;
use inquire::Select;
use start_menu::start_menu;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	loop {
		let main_menu = vec!["Configurations", "Executions", "Exit"];

		let selection = Select::new("disc-surrogate:", main_menu).prompt()?;

		let outcome = match selection {
			"Configurations" => config_menu(),
			"Executions" => start_menu(),
			"Exit" => return Ok(()),
			_ => Ok(()),
		};
		// a failed step is reported, the session goes on
		if let Err(err) = outcome {
			error!(error = %err, "step failed");
		}
	}
}
