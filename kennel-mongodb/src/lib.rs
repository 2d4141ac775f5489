//! MongoDB backend implementation for kennel.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Filters are translated into MongoDB query documents and run by the server, and
//! documents are stored as-is with their `_id`, so collections written by other
//! MongoDB clients can be read back directly.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! kennel = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kennel::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! let backend = MongoDbStore::builder("mongodb://localhost/dog-amazon", "dog-amazon")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as kennel_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
