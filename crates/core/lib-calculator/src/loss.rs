// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Penalty on predictions that leave the normalized range.

use crate::error::{CalcError, Result};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
	Both { lower: f64, upper: f64 },
	Upper(f64),
	Lower(f64),
}

impl Default for Bound {
	fn default() -> Self {
		Self::Both {
			lower: 0.0,
			upper: 1.0,
		}
	}
}

impl Bound {
	fn limits(&self) -> (Option<f64>, Option<f64>) {
		match *self {
			Self::Both { lower, upper } => (Some(lower), Some(upper)),
			Self::Upper(upper) => (None, Some(upper)),
			Self::Lower(lower) => (Some(lower), None),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Norm {
	#[default]
	L1,
	L2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reduction {
	#[default]
	Mean,
	Sum,
	None,
}

/// Distance of every element to the allowed interval, zero inside it.
///
/// `Mean` and `Sum` collapse to a scalar tensor; `None` keeps the input shape.
/// The mean of an empty tensor is 0.
pub fn out_of_range_loss(
	tensor: &Tensor,
	bound: Bound,
	norm: Norm,
	reduction: Reduction,
) -> Result<Tensor> {
	let (lower, upper) = bound.limits();
	if let (Some(lower), Some(upper)) = (lower, upper) {
		if lower > upper {
			return Err(CalcError::InvalidBound { lower, upper });
		}
	}

	let penalty = |excess: f64| match norm {
		Norm::L1 => excess.abs(),
		Norm::L2 => excess * excess,
	};
	let losses = tensor.map(|x| {
		let above = upper.map_or(0.0, |u| x.min(u) - x);
		let below = lower.map_or(0.0, |l| x.max(l) - x);
		penalty(above) + penalty(below)
	});

	Ok(match reduction {
		Reduction::None => losses,
		Reduction::Sum => Tensor::scalar(losses.data.iter().sum()),
		Reduction::Mean => {
			let mean = if losses.is_empty() {
				0.0
			} else {
				losses.data.iter().sum::<f64>() / losses.len() as f64
			};
			Tensor::scalar(mean)
		},
	})
}
