// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod regression;

use crate::error::Result;

use rand::Rng;

pub trait Model: Sized {
	type Input;
	type Output;
	type Ctx;

	fn build<R: Rng + ?Sized>(
		ctx: Self::Ctx,
		rng: &mut R,
	) -> Result<Self>;

	fn execute(
		&self,
		model_input: Self::Input,
	) -> Result<Self::Output>;
}
