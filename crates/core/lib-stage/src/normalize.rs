// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Min-max scaling against a `BoundsRecord`, its inverse, and the canonical
//! column layout of a normalized dataset.

use crate::bounds::compute_bounds;
use crate::data::Table;
use crate::error::{Result, StageError};
use crate::features::{FEATURES, TARGETS, Y_ROM};

use lib_store::BoundsRecord;
use tracing::{debug, warn};

/// Physical columns that carry the values of a logical target under another
/// name, e.g. model predictions written as `y_ROM_pred`.
///
/// A target either lists its columns explicitly or matches by name, in which
/// case every column whose name contains the target name is an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetAliases {
	entries: Vec<AliasEntry>,
}

#[derive(Debug, Clone, PartialEq)]
struct AliasEntry {
	target: String,
	columns: Vec<String>,
	by_name: bool,
}

impl Default for TargetAliases {
	fn default() -> Self {
		let mut aliases = Self::empty();
		aliases.register_matching(Y_ROM);
		aliases
	}
}

impl TargetAliases {
	pub fn empty() -> Self {
		Self {
			entries: Vec::new(),
		}
	}

	fn entry_mut(
		&mut self,
		target: &str,
	) -> &mut AliasEntry {
		let idx = match self.entries.iter().position(|e| e.target == target) {
			Some(idx) => idx,
			None => {
				self.entries.push(AliasEntry {
					target: target.to_string(),
					columns: Vec::new(),
					by_name: false,
				});
				self.entries.len() - 1
			},
		};
		&mut self.entries[idx]
	}

	pub fn register(
		&mut self,
		target: &str,
		column: &str,
	) {
		let entry = self.entry_mut(target);
		if !entry.columns.iter().any(|c| c == column) {
			entry.columns.push(column.to_string());
		}
	}

	/// Treats every column whose name contains `target` as an alias of it.
	pub fn register_matching(
		&mut self,
		target: &str,
	) {
		self.entry_mut(target).by_name = true;
	}

	pub fn targets(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|e| e.target.as_str())
	}

	/// Alias columns of `target` among `available`, in `available` order.
	/// The target column itself is never its own alias.
	pub fn resolve<'a>(
		&self,
		target: &str,
		available: impl IntoIterator<Item = &'a str>,
	) -> Vec<&'a str> {
		let Some(entry) = self.entries.iter().find(|e| e.target == target) else {
			return Vec::new();
		};
		available
			.into_iter()
			.filter(|&name| name != target)
			.filter(|&name| {
				(entry.by_name && name.contains(target)) || entry.columns.iter().any(|c| c == name)
			})
			.collect()
	}
}

/// Applies and reverses the scaling described by a `BoundsRecord`.
///
/// The feature list fixes both which columns survive normalization and their
/// order. Targets registered in `aliases` are prediction targets: they are
/// only denormalized on request, together with their alias columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
	features: Vec<String>,
	targets: Vec<String>,
	aliases: TargetAliases,
}

impl Default for Normalizer {
	fn default() -> Self {
		Self::new(FEATURES.iter().map(|f| f.to_string()).collect())
	}
}

impl Normalizer {
	pub fn new(features: Vec<String>) -> Self {
		Self {
			features,
			targets: TARGETS.iter().map(|t| t.to_string()).collect(),
			aliases: TargetAliases::default(),
		}
	}

	pub fn with_aliases(
		mut self,
		aliases: TargetAliases,
	) -> Self {
		self.aliases = aliases;
		self
	}

	pub fn features(&self) -> &[String] {
		&self.features
	}

	/// Features followed by the targets when `with_targets`, features only
	/// otherwise. `config_id` is not a column; `select` keeps it separately.
	pub fn canonical_columns(
		&self,
		with_targets: bool,
	) -> Vec<&str> {
		let mut columns: Vec<&str> = self.features.iter().map(String::as_str).collect();
		if with_targets {
			columns.extend(self.targets.iter().map(String::as_str));
		}
		columns
	}

	/// Scales every column that has bounds to `(v - min) / (max - min)` and
	/// lays the result out canonically.
	///
	/// With `train` or `keep_target` the output keeps `config_id` and the
	/// targets; otherwise it is the bare feature matrix a model consumes.
	/// Columns without bounds pass through unscaled. Degenerate or non-finite
	/// bounds on any scaled column are an error.
	pub fn normalize(
		&self,
		dataset: &Table,
		bounds: &BoundsRecord,
		train: bool,
		keep_target: bool,
	) -> Result<Table> {
		let mut scaled = dataset.clone();
		for name in dataset.column_names() {
			let Some(b) = bounds.get(name) else {
				continue;
			};
			if !b.is_finite() {
				return Err(StageError::NonFiniteBounds {
					column: name.to_string(),
					min: b.min,
					max: b.max,
				});
			}
			if b.is_degenerate() {
				return Err(StageError::DegenerateBounds {
					column: name.to_string(),
					min: b.min,
					max: b.max,
				});
			}
			let span = b.span();
			scaled.map_column(name, |v| (v - b.min) / span)?;
		}

		let with_targets = train || keep_target;
		let columns = self.canonical_columns(with_targets);
		for name in &columns {
			if dataset.contains(name) && !bounds.contains(name) {
				warn!(column = %name, "column has no bounds, passed through unscaled");
			}
		}

		let normalized = scaled.select(&columns, with_targets);
		debug!(
			rows = normalized.n_rows(),
			columns = normalized.n_cols(),
			train,
			keep_target,
			"normalized dataset"
		);
		Ok(normalized)
	}

	/// Training-mode normalization: derives the full bounds from `dataset` and
	/// `supplied`, then normalizes with them. The returned record must be
	/// persisted.
	pub fn fit_normalize(
		&self,
		dataset: &Table,
		supplied: &BoundsRecord,
	) -> Result<(Table, BoundsRecord)> {
		let bounds = compute_bounds(dataset, supplied)?;
		let normalized = self.normalize(dataset, &bounds, true, false)?;
		Ok((normalized, bounds))
	}

	/// Reverses the scaling, `v * (max - min) + min`, on every column with
	/// bounds. Registered targets are left as they are unless `also_target`;
	/// with it, their alias columns are mapped back with the target's bounds.
	/// Column set and order are preserved.
	pub fn denormalize(
		&self,
		dataset: &Table,
		bounds: &BoundsRecord,
		also_target: bool,
	) -> Result<Table> {
		let mut restored = dataset.clone();
		let shared: Vec<&str> = dataset
			.column_names()
			.filter(|name| bounds.contains(name))
			.filter(|name| also_target || !self.aliases.targets().any(|t| t == *name))
			.collect();

		for &name in &shared {
			if let Some(b) = bounds.get(name) {
				restored.map_column(name, |v| v * b.span() + b.min)?;
			}
		}

		if also_target {
			for target in self.aliases.targets() {
				let pending: Vec<&str> = self
					.aliases
					.resolve(target, dataset.column_names())
					.into_iter()
					.filter(|c| !shared.contains(c))
					.collect();
				if pending.is_empty() {
					continue;
				}
				let b = bounds
					.get(target)
					.ok_or_else(|| StageError::MissingBounds(target.to_string()))?;
				debug!(alias_of = target, columns = ?pending, "denormalizing alias columns");
				for column in pending {
					restored.map_column(column, |v| v * b.span() + b.min)?;
				}
			}
		}

		Ok(restored)
	}
}
