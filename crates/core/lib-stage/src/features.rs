// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Column names shared by the staging steps.

pub const LOAD_CASE: &str = "LoadCase";
pub const MOMENT: &str = "Moment";
pub const Y_ROM: &str = "y_ROM";
pub const Y_IDP: &str = "y_IDP";

/// The input parameters of one simulated configuration, in canonical order.
pub const FEATURES: [&str; 15] = [
	LOAD_CASE,
	MOMENT,
	"C10Nucleus",
	"C01Nucleus",
	"C10Annulus",
	"K1Annulus",
	"K2Annulus",
	"Kappa",
	"K1Circ",
	"K2Circ",
	"K1Rad",
	"K2Rad",
	"FiberAngle",
	"FiberAngleCirc",
	"FiberAngleRad",
];

/// Response columns, in canonical order.
pub const TARGETS: [&str; 2] = [Y_ROM, Y_IDP];

/// Name of the long-format column holding one output modality.
pub fn output_column(output_name: &str) -> String {
	format!("y_{}", output_name)
}
