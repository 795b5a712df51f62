// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Fully connected regression network mapping normalized features to the
//! normalized responses.

use crate::error::{CalcError, Result};
use crate::model::Model;
use crate::tensor::Tensor;

use lib_store::cfg::{Activation, HPRegressionNet};
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PRELU_INIT: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
	/// `in x out`
	pub weights: Array2<f64>,
	pub bias: Array1<f64>,
}

impl Linear {
	/// Weights and bias drawn from `U(-1/sqrt(in), 1/sqrt(in))`.
	pub fn new<R: Rng + ?Sized>(
		input: usize,
		output: usize,
		rng: &mut R,
	) -> Self {
		let limit = 1.0 / (input as f64).sqrt();
		let dist = Uniform::new_inclusive(-limit, limit);
		Self {
			weights: Array2::random_using((input, output), dist, rng),
			bias: Array1::random_using(output, dist, rng),
		}
	}

	pub fn input_dim(&self) -> usize {
		self.weights.nrows()
	}

	pub fn output_dim(&self) -> usize {
		self.weights.ncols()
	}

	pub fn forward(
		&self,
		x: &Array2<f64>,
	) -> Array2<f64> {
		x.dot(&self.weights) + &self.bias
	}

	pub fn num_parameters(&self) -> usize {
		self.weights.len() + self.bias.len()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationLayer {
	Relu,
	/// Single learnable slope shared by all units.
	Prelu { slope: f64 },
}

impl ActivationLayer {
	fn from_config(activation: Activation) -> Self {
		match activation {
			Activation::Relu => Self::Relu,
			Activation::Prelu => Self::Prelu { slope: PRELU_INIT },
		}
	}

	pub fn apply(
		&self,
		v: f64,
	) -> f64 {
		match self {
			Self::Relu => v.max(0.0),
			Self::Prelu { slope } => {
				if v >= 0.0 {
					v
				} else {
					slope * v
				}
			},
		}
	}

	pub fn num_parameters(&self) -> usize {
		match self {
			Self::Relu => 0,
			Self::Prelu { .. } => 1,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenLayer {
	pub linear: Linear,
	pub activation: ActivationLayer,
}

/// `num_layers - 1` hidden blocks of Linear, activation and dropout whose width
/// halves from `num_units` on, then a Linear head to `output_dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionNet {
	hidden: Vec<HiddenLayer>,
	head: Linear,
	dropout_p: f64,
}

impl RegressionNet {
	pub fn new<R: Rng + ?Sized>(
		hparams: &HPRegressionNet,
		rng: &mut R,
	) -> Result<Self> {
		let widths = hidden_widths(hparams)?;
		if !(0.0..1.0).contains(&hparams.dropout_p) {
			return Err(CalcError::InvalidHyperparams(format!(
				"dropout_p must be in [0, 1), got {}",
				hparams.dropout_p
			)));
		}
		if hparams.input_dim == 0 || hparams.output_dim == 0 {
			return Err(CalcError::InvalidHyperparams(
				"input_dim and output_dim must be positive".to_string(),
			));
		}

		let mut hidden = Vec::with_capacity(widths.len());
		let mut fan_in = hparams.input_dim;
		for &width in &widths {
			hidden.push(HiddenLayer {
				linear: Linear::new(fan_in, width, rng),
				activation: ActivationLayer::from_config(hparams.activation),
			});
			fan_in = width;
		}
		let head = Linear::new(fan_in, hparams.output_dim, rng);

		let net = Self {
			hidden,
			head,
			dropout_p: hparams.dropout_p,
		};
		debug!(
			layers = widths.len() + 1,
			parameters = net.num_parameters(),
			"built regression network"
		);
		Ok(net)
	}

	pub fn hidden(&self) -> &[HiddenLayer] {
		&self.hidden
	}

	pub fn head(&self) -> &Linear {
		&self.head
	}

	pub fn input_dim(&self) -> usize {
		self.hidden
			.first()
			.map_or(self.head.input_dim(), |l| l.linear.input_dim())
	}

	pub fn output_dim(&self) -> usize {
		self.head.output_dim()
	}

	pub fn num_parameters(&self) -> usize {
		self.hidden
			.iter()
			.map(|l| l.linear.num_parameters() + l.activation.num_parameters())
			.sum::<usize>()
			+ self.head.num_parameters()
	}

	/// Evaluation pass, dropout inactive.
	pub fn forward(
		&self,
		x: &Tensor,
	) -> Result<Tensor> {
		let x = self.checked_input(x)?;
		let mut h = x;
		for layer in &self.hidden {
			h = layer.linear.forward(&h).mapv(|v| layer.activation.apply(v));
		}
		Ok(Tensor::from_array2(&self.head.forward(&h)))
	}

	/// Training pass with inverted dropout after every hidden block.
	pub fn forward_train<R: Rng + ?Sized>(
		&self,
		x: &Tensor,
		rng: &mut R,
	) -> Result<Tensor> {
		let x = self.checked_input(x)?;
		let mut h = x;
		for layer in &self.hidden {
			h = layer.linear.forward(&h).mapv(|v| layer.activation.apply(v));
			dropout(&mut h, self.dropout_p, rng);
		}
		Ok(Tensor::from_array2(&self.head.forward(&h)))
	}

	fn checked_input(
		&self,
		x: &Tensor,
	) -> Result<Array2<f64>> {
		let x = x.to_array2()?;
		if x.ncols() != self.input_dim() {
			return Err(CalcError::InputWidth {
				expected: self.input_dim(),
				found: x.ncols(),
			});
		}
		Ok(x)
	}
}

impl Model for RegressionNet {
	type Input = Tensor;
	type Output = Tensor;
	type Ctx = HPRegressionNet;

	fn build<R: Rng + ?Sized>(
		ctx: Self::Ctx,
		rng: &mut R,
	) -> Result<Self> {
		Self::new(&ctx, rng)
	}

	fn execute(
		&self,
		model_input: Self::Input,
	) -> Result<Self::Output> {
		self.forward(&model_input)
	}
}

/// Widths of the hidden blocks: `num_units / 2^i` for `i in 0..num_layers-1`.
pub fn hidden_widths(hparams: &HPRegressionNet) -> Result<Vec<usize>> {
	if hparams.num_layers < 2 {
		return Err(CalcError::InvalidHyperparams(format!(
			"num_layers must be at least 2, got {}",
			hparams.num_layers
		)));
	}
	let widths: Vec<usize> = (0..hparams.num_layers - 1)
		.map(|i| hparams.num_units.checked_shr(i as u32).unwrap_or(0))
		.collect();
	if let Some(i) = widths.iter().position(|&w| w == 0) {
		return Err(CalcError::InvalidHyperparams(format!(
			"hidden layer {} has zero width ({} units halved {} times)",
			i, hparams.num_units, i
		)));
	}
	Ok(widths)
}

fn dropout<R: Rng + ?Sized>(
	h: &mut Array2<f64>,
	p: f64,
	rng: &mut R,
) {
	if p <= 0.0 {
		return;
	}
	let scale = 1.0 / (1.0 - p);
	h.mapv_inplace(|v| if rng.gen::<f64>() < p { 0.0 } else { v * scale });
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn hparams() -> HPRegressionNet {
		HPRegressionNet {
			input_dim: 15,
			output_dim: 1,
			num_layers: 3,
			num_units: 64,
			dropout_p: 0.2,
			activation: Activation::Relu,
		}
	}

	fn batch(rows: usize) -> Tensor {
		let data = (0..rows * 15).map(|i| (i % 10) as f64 / 10.0).collect();
		Tensor::from_shape(data, &[rows, 15]).unwrap()
	}

	#[test]
	fn test_layer_widths() {
		let mut rng = StdRng::seed_from_u64(0);
		let net = RegressionNet::new(&hparams(), &mut rng).unwrap();

		let dims: Vec<(usize, usize)> = net
			.hidden()
			.iter()
			.map(|l| (l.linear.input_dim(), l.linear.output_dim()))
			.collect();
		assert_eq!(dims, vec![(15, 64), (64, 32)]);
		assert_eq!((net.head().input_dim(), net.head().output_dim()), (32, 1));
		assert_eq!(net.num_parameters(), 15 * 64 + 64 + 64 * 32 + 32 + 32 + 1);
	}

	#[test]
	fn test_prelu_slope_counted() {
		let mut rng = StdRng::seed_from_u64(0);
		let mut hp = hparams();
		hp.activation = Activation::Prelu;
		let net = RegressionNet::new(&hp, &mut rng).unwrap();
		assert_eq!(net.hidden()[0].activation, ActivationLayer::Prelu { slope: 0.25 });
		assert_eq!(net.num_parameters(), 15 * 64 + 64 + 64 * 32 + 32 + 32 + 1 + 2);
	}

	#[test]
	fn test_invalid_hyperparams() {
		let mut rng = StdRng::seed_from_u64(0);
		let mut hp = hparams();
		hp.num_layers = 1;
		assert!(matches!(
			RegressionNet::new(&hp, &mut rng),
			Err(CalcError::InvalidHyperparams(_))
		));

		let mut hp = hparams();
		hp.num_units = 2;
		hp.num_layers = 4;
		assert!(matches!(
			RegressionNet::new(&hp, &mut rng),
			Err(CalcError::InvalidHyperparams(_))
		));

		let mut hp = hparams();
		hp.dropout_p = 1.0;
		assert!(RegressionNet::new(&hp, &mut rng).is_err());
	}

	#[test]
	fn test_init_range() {
		let mut rng = StdRng::seed_from_u64(3);
		let net = RegressionNet::new(&hparams(), &mut rng).unwrap();
		for layer in net.hidden().iter().map(|l| &l.linear).chain([net.head()]) {
			let limit = 1.0 / (layer.input_dim() as f64).sqrt();
			assert!(layer.weights.iter().all(|w| w.abs() <= limit));
			assert!(layer.bias.iter().all(|b| b.abs() <= limit));
		}
	}

	#[test]
	fn test_forward() {
		let mut rng = StdRng::seed_from_u64(5);
		let net = RegressionNet::new(&hparams(), &mut rng).unwrap();

		let out = net.execute(batch(4)).unwrap();
		assert_eq!(out.shape(), &[4, 1]);
		assert!(out.data.iter().all(|v| v.is_finite()));
		// evaluation is deterministic
		assert_eq!(net.forward(&batch(4)).unwrap(), out);

		let narrow = Tensor::from_shape_zeros(&[2, 3]);
		assert!(matches!(
			net.forward(&narrow),
			Err(CalcError::InputWidth { expected: 15, found: 3 })
		));
	}

	#[test]
	fn test_forward_train_without_dropout_matches_eval() {
		let mut rng = StdRng::seed_from_u64(5);
		let mut hp = hparams();
		hp.dropout_p = 0.0;
		let net = RegressionNet::build(hp, &mut rng).unwrap();
		assert_eq!(
			net.forward_train(&batch(3), &mut rng).unwrap(),
			net.forward(&batch(3)).unwrap()
		);
	}

	#[test]
	fn test_inverted_dropout() {
		let mut rng = StdRng::seed_from_u64(11);
		let mut h = Array2::from_elem((20, 20), 1.0);
		dropout(&mut h, 0.5, &mut rng);
		assert!(h.iter().all(|&v| v == 0.0 || v == 2.0));
		assert!(h.iter().any(|&v| v == 0.0));
		assert!(h.iter().any(|&v| v == 2.0));
	}

	#[test]
	fn test_activation() {
		assert_eq!(ActivationLayer::Relu.apply(-2.0), 0.0);
		assert_eq!(ActivationLayer::Relu.apply(1.5), 1.5);
		let prelu = ActivationLayer::Prelu { slope: 0.25 };
		assert_eq!(prelu.apply(-2.0), -0.5);
		assert_eq!(prelu.apply(3.0), 3.0);
	}
}
