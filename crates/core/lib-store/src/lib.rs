// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod bounds;
pub mod cfg;
pub mod error;

pub use bounds::{Bounds, BoundsRecord};

use mongodb::bson::{doc, Document};
use mongodb::{
	bson,
	sync::{Client, Collection},
};
use tracing::info;

use crate::cfg::Config;
use crate::error::{Result, StoreError};

const DEFAULT_URI: &str = "mongodb://127.0.0.1:27017/";
const DATABASE: &str = "disc-surrogate";
const COLLECTION: &str = "configs";

pub fn config_from_file(
	path: String,
	name: String,
) -> Result<()> {
	let config = Config::get_config(&path)?;
	let collection: Collection<Document> = configs()?;
	let mut doc = bson::to_document(&config)?;
	doc.insert("name", name);
	doc.insert("active", false);

	let result = collection.insert_one(doc).run()?;
	info!(id = %result.inserted_id, path = %path, "stored configuration");
	Ok(())
}

pub fn list_configs() -> Result<Vec<String>> {
	let collection: Collection<Document> = configs()?;
	let cursor = collection.find(doc! {}).run()?;

	let list = cursor
		.into_iter()
		.filter_map(|doc_result| doc_result.ok())
		.filter_map(|doc| doc.get_str("name").ok().map(str::to_string))
		.collect::<Vec<String>>();

	Ok(list)
}

pub fn activate_config(name: String) -> Result<()> {
	let collection: Collection<Document> = configs()?;
	collection
		.update_many(
			doc! {},
			doc! { "$set": { "active": false } },
		)
		.run()?;

	let result = collection
		.update_one(
			doc! { "name": &name },
			doc! { "$set": { "active": true } },
		)
		.run()?;

	if result.matched_count == 0 {
		return Err(StoreError::ConfigNotFound(name));
	}
	info!(name = %name, "activated configuration");
	Ok(())
}

pub fn get_active_config() -> Result<Config> {
	let collection: Collection<Config> = configs()?;
	let cursor = collection.find_one(doc! { "active": true }).run()?;
	match cursor {
		Some(config) if config.version == Config::cfg_version() => Ok(config),
		Some(_) => Err(StoreError::InvalidConfig),
		None => Err(StoreError::NoConfigActive),
	}
}

/// Registry collection; the server is taken from `MONGODB_URI` when set.
fn configs<T: Send + Sync>() -> Result<Collection<T>> {
	let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_URI.to_string());
	let client = Client::with_uri_str(&uri)?;
	Ok(client.database(DATABASE).collection(COLLECTION))
}
