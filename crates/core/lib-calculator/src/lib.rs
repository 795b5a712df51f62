// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod error;
pub mod loss;
pub mod model;
mod tensor;

pub use error::{CalcError, Result};
pub use model::regression::RegressionNet;
pub use model::Model;
pub use tensor::{MetaData, Tensor};
