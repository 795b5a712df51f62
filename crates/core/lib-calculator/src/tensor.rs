// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::{CalcError, Result};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Dense row-major buffer of `f64` with its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
	pub data: Vec<f64>,
	pub metadata: MetaData,
}

impl Tensor {
	pub fn new(
		data: Vec<f64>,
		metadata: MetaData,
	) -> Result<Self> {
		if data.len() != metadata.total_elements() {
			return Err(CalcError::ShapeMismatch {
				expected: metadata.shape.to_vec(),
				found: data.len(),
			});
		}
		Ok(Self { data, metadata })
	}

	pub fn from_shape(
		data: Vec<f64>,
		shape: &[usize],
	) -> Result<Self> {
		let stride = MetaData::row_strides(shape);
		Self::new(data, MetaData::new(&stride, shape))
	}

	pub fn from_shape_value(
		shape: &[usize],
		value: f64,
	) -> Self {
		let total_elements = shape.iter().product();
		let stride = MetaData::row_strides(shape);
		Self {
			data: vec![value; total_elements],
			metadata: MetaData::new(&stride, shape),
		}
	}

	pub fn from_shape_zeros(shape: &[usize]) -> Self {
		Self::from_shape_value(shape, 0.0)
	}

	pub fn scalar(value: f64) -> Self {
		Self {
			data: vec![value],
			metadata: MetaData::scalar(),
		}
	}

	/// The single value of a one-element tensor.
	pub fn item(&self) -> Option<f64> {
		self.data
			.first()
			.copied()
			.filter(|_| self.metadata.is_scalar())
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn shape(&self) -> &[usize] {
		&self.metadata.shape
	}

	/// Element-wise map, shape preserved.
	pub fn map<F: Fn(f64) -> f64>(
		&self,
		f: F,
	) -> Self {
		Self {
			data: self.data.iter().map(|&v| f(v)).collect(),
			metadata: self.metadata.clone(),
		}
	}

	/// Views a matrix (or a vector, as one row) as an `Array2`.
	pub fn to_array2(&self) -> Result<Array2<f64>> {
		let (rows, cols) = if self.metadata.is_matrix() {
			(self.shape()[0], self.shape()[1])
		} else if self.metadata.is_vector() {
			(1, self.shape()[0])
		} else {
			return Err(CalcError::ShapeMismatch {
				expected: self.shape().to_vec(),
				found: self.len(),
			});
		};
		Ok(Array2::from_shape_vec((rows, cols), self.data.clone())?)
	}

	pub fn from_array2(array: &Array2<f64>) -> Self {
		let (rows, cols) = array.dim();
		Self {
			data: array.iter().copied().collect(),
			metadata: MetaData::matrix(rows, cols),
		}
	}
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
	pub stride: Box<[usize]>,
	pub shape: Box<[usize]>,
}

impl MetaData {
	pub fn new(
		stride: &[usize],
		shape: &[usize],
	) -> Self {
		Self {
			stride: stride.into(),
			shape: shape.into(),
		}
	}

	pub fn scalar() -> Self {
		Self {
			stride: Box::new([1]),
			shape: Box::new([1]),
		}
	}

	pub fn matrix(
		rows: usize,
		cols: usize,
	) -> Self {
		Self {
			stride: Box::new([cols, 1]),
			shape: Box::new([rows, cols]),
		}
	}

	pub fn row_strides(shape: &[usize]) -> Box<[usize]> {
		if shape.is_empty() {
			return Box::new([]);
		}

		let mut strides = vec![1; shape.len()];
		for i in (0..shape.len() - 1).rev() {
			strides[i] = strides[i + 1] * shape[i + 1];
		}
		strides.into_boxed_slice()
	}

	pub fn total_elements(&self) -> usize {
		self.shape.iter().product()
	}

	pub fn is_vector(&self) -> bool {
		self.shape.len() == 1
	}

	pub fn is_matrix(&self) -> bool {
		self.shape.len() == 2
	}

	pub fn is_scalar(&self) -> bool {
		self.total_elements() == 1
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use ndarray::array;

	#[test]
	fn test_metadata_scalar() {
		let md = MetaData::scalar();
		assert!(md.is_scalar());
		assert_eq!(md.total_elements(), 1);
		assert!(md.is_vector());
	}

	#[test]
	fn test_row_major_strides() {
		let strides = MetaData::row_strides(&[2, 3, 4]);
		assert_eq!(*strides, [12, 4, 1]);
	}

	#[test]
	fn test_tensor_shape_checked() {
		let tensor = Tensor::from_shape(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
		assert_eq!(tensor.shape(), &[2, 2]);
		assert!(tensor.metadata.is_matrix());

		assert!(matches!(
			Tensor::from_shape(vec![1.0, 2.0, 3.0], &[2, 2]),
			Err(CalcError::ShapeMismatch { found: 3, .. })
		));
	}

	#[test]
	fn test_array_conversion() {
		let array = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
		let tensor = Tensor::from_array2(&array);
		assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
		assert_eq!(tensor.to_array2().unwrap(), array);

		let row = Tensor::from_shape(vec![1.0, 2.0], &[2]).unwrap();
		assert_eq!(row.to_array2().unwrap().dim(), (1, 2));

		let cube = Tensor::from_shape_zeros(&[2, 2, 2]);
		assert!(cube.to_array2().is_err());
	}

	#[test]
	fn test_item() {
		assert_eq!(Tensor::scalar(0.5).item(), Some(0.5));
		assert_eq!(Tensor::from_shape_zeros(&[2]).item(), None);
	}
}
