//! A typed document model layer over pluggable document stores.
//!
//! This crate is the core of the kennel project and provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining, identifying and serializing documents
//! - **Validation** ([`validate`]) - Field-level constraint checks run before every write
//! - **Filters** ([`query`]) - Typed filter expressions and queries
//! - **Update descriptors** ([`update`]) - Field replace, numeric increment and array append
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing different storage backends
//! - **Typed collections** ([`collection`]) - The model API: create, find, update and delete
//! - **Document store** ([`store`]) - Entry point binding a backend to typed collections
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use kennel::prelude::*;
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Cat {
//!     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     pub name: String,
//! }
//!
//! impl Document for Cat {
//!     fn id(&self) -> Option<&ObjectId> {
//!         self.id.as_ref()
//!     }
//!
//!     fn set_id(&mut self, id: ObjectId) {
//!         self.id = Some(id);
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "cats"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as kennel_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
pub mod update;
pub mod validate;
