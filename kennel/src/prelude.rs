//! Convenient re-exports of commonly used types from kennel.
//!
//! ```ignore
//! use kennel::prelude::*;
//! ```
//!
//! [`DynStoreBackend`](crate::backend::DynStoreBackend) is not re-exported here. Its
//! methods share names with [`StoreBackend`], and having both in scope makes calls
//! on a boxed backend ambiguous.

pub use kennel_core::{
    collection::{TypedCollection, UpdateResult, DeleteResult},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
    document::{Document, DocumentExt, IntoDocumentId},
    backend::{StoreBackend, StoreBackendBuilder},
    query::{Query, QueryBuilder, Expr, FieldOp, Filter},
    update::{Update, UpdateOp},
    validate::{Validator, ValidationErrors, FieldError, Violation},
    error::{DocumentStoreError, DocumentStoreResult},
};
