// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::{Result, ToolError};

use inquire::{Confirm, Select, Text};
use lib_calculator::loss::{out_of_range_loss, Bound, Norm, Reduction};
use lib_calculator::{Model, RegressionNet, Tensor};
use lib_stage::features::FEATURES;
use lib_stage::search::random_features;
use lib_stage::{denormalize_file, stager};
use lib_store::get_active_config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

pub fn start_menu() -> Result<()> {
	loop {
		let st_menu = vec![
			"Init Transformation",
			"Denormalize Predictions",
			"Inspect Model",
			"Back",
		];

		let selection = Select::new("Executions:", st_menu)
			.with_help_message("Runs the steps of the active configuration.")
			.prompt()?;

		match selection {
			"Init Transformation" => {
				init_transform()?;
			},
			"Denormalize Predictions" => {
				denormalize_predictions()?;
			},
			"Inspect Model" => {
				inspect_model()?;
			},
			"Back" => {
				return Ok(());
			},
			_ => (),
		}
	}
}

fn init_transform() -> Result<()> {
	Ok(stager()?)
}

fn denormalize_predictions() -> Result<()> {
	let cfg = get_active_config()?;
	let input = Text::new("Normalized CSV:").prompt()?;
	let output = Text::new("Write to:").prompt()?;
	let also_target = Confirm::new("Also map y_ROM and its prediction columns back?")
		.with_default(true)
		.prompt()?;

	denormalize_file(
		&input,
		&output,
		&cfg.bounds.persisted,
		also_target,
		cfg.data.delimiter_byte()?,
	)?;
	Ok(())
}

fn inspect_model() -> Result<()> {
	let cfg = get_active_config()?;
	let hparams = cfg.regression_net().cloned().ok_or(ToolError::NoModel)?;

	let mut rng = StdRng::from_entropy();
	let net = RegressionNet::build(hparams, &mut rng)?;
	for (idx, layer) in net.hidden().iter().enumerate() {
		info!(
			layer = idx,
			input = layer.linear.input_dim(),
			output = layer.linear.output_dim(),
			activation = ?layer.activation,
			"hidden layer"
		);
	}
	info!(
		input = net.head().input_dim(),
		output = net.output_dim(),
		parameters = net.num_parameters(),
		"output layer"
	);

	if net.input_dim() != FEATURES.len() {
		warn!(
			input_dim = net.input_dim(),
			features = FEATURES.len(),
			"input width differs from the feature set, skipping sample prediction"
		);
		return Ok(());
	}

	let sample = random_features(&FEATURES, &mut rng)?;
	let prediction = net.execute(Tensor::from_array2(&sample.to_array()?))?;
	let penalty = out_of_range_loss(&prediction, Bound::default(), Norm::L1, Reduction::Mean)?;
	info!(
		prediction = ?prediction.data,
		out_of_range = penalty.item().unwrap_or(0.0),
		"untrained prediction on a random feature vector"
	);
	Ok(())
}
