//! Main kennel crate providing a typed document model over pluggable stores.
//!
//! This crate is the entry point for applications. It re-exports the core types
//! from `kennel-core` and the storage backends.
//!
//! # Features
//!
//! - **Typed documents** - Define models with Serde and declare their field constraints
//! - **Validation on every write** - Inserts, replaces and updates are checked before they reach the store
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//! - **Composable filters** - Comparisons, set membership and logical combinators
//!
//! # Quick Start
//!
//! ```ignore
//! use kennel::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let cats = store.typed_collection::<Cat>();
//!
//! let tom = cats.create(Cat { id: None, name: "Tom".into() }).await?;
//! let found = cats.find(Filter::eq("name", "Tom")).await?;
//!
//! cats.update_by_id(tom.id().unwrap(), Update::new().set("name", "Thomas")).await?;
//! cats.delete_by_id(tom.id().unwrap()).await?;
//!
//! store.shutdown().await?;
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is chosen at runtime, e.g. from a connection URL, convert the
//! store with [`into_dyn`](store::IntoDynDocumentStore::into_dyn). The resulting
//! [`DynDocumentStore`](store::DynDocumentStore) offers the same API:
//!
//! ```ignore
//! use kennel::{prelude::*, memory::InMemoryStore};
//!
//! let store: DynDocumentStore = DocumentStore::new(InMemoryStore::new()).into_dyn();
//! let cats = store.typed_collection::<Cat>();
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature, on by default)

pub mod prelude;

pub use kennel_core::{backend, collection, document, error, query, store, update, validate};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use kennel_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use kennel_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
