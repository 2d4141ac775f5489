//! Errors returned by collections and backends.
//!
//! Every fallible operation returns [`DocumentStoreResult<T>`].

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// Everything that can go wrong between a typed collection and its store.
///
/// A single-result read that matches nothing is not an error; those operations
/// return `Ok(None)`.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// A document could not be converted to or from BSON or JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The backend could not be created, e.g. an unparsable connection string.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An insert reused a stored id. Holds the id, then the collection.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// A replace targeted an id that is not stored. Holds the id, then the collection.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The document violates one or more field constraints. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A textual id is not a 24-character hex object id.
    #[error("Invalid document id: {0}")]
    InvalidId(String),
    /// The update descriptor cannot be applied to the stored document.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    /// A stored value does not have the shape of a document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The store rejected the operation or could not be reached.
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl DocumentStoreError {
    /// Returns `true` for constraint violations.
    pub fn is_validation(&self) -> bool {
        matches!(self, DocumentStoreError::Validation(_))
    }
}

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
