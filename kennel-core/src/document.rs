//! Core traits and types for document representation and serialization.
//!
//! This module provides the trait that all stored documents implement,
//! conversions between documents and their stored formats (BSON, JSON),
//! and the [`IntoDocumentId`] conversion used by id-based operations.

use bson::{Bson, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, to_value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    validate::ValidationErrors,
};

/// Core trait that all documents stored in a document store must implement.
///
/// Identifiers are assigned by the store when a document is first written, so a
/// freshly constructed document has no id. Implementors serialize the id under
/// the `_id` key and skip it while it is unset.
///
/// # Example
///
/// ```ignore
/// use kennel::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub email: String,
/// }
///
/// impl Document for User {
///     fn id(&self) -> Option<&ObjectId> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: ObjectId) {
///         self.id = Some(id);
///     }
///
///     fn collection_name() -> &'static str {
///         "users"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's identifier, or `None` if it has never been stored.
    fn id(&self) -> Option<&ObjectId>;

    /// Records the identifier assigned by the store.
    fn set_id(&mut self, id: ObjectId);

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "users", "dogs").
    fn collection_name() -> &'static str;

    /// Checks every declared field constraint.
    ///
    /// Collections call this before each insert, replace and update. The default
    /// declares no constraints.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Extension trait providing serialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a stored BSON value.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;

    /// Converts this document to a JSON value for structured log fields.
    fn to_json(&self) -> DocumentStoreResult<Value>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }
}

/// Conversion into a document identifier.
///
/// Textual ids are parsed as 24-character hex object ids; anything else fails
/// with [`DocumentStoreError::InvalidId`] before the store is contacted.
pub trait IntoDocumentId {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId>;
}

impl IntoDocumentId for ObjectId {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId> {
        Ok(self)
    }
}

impl IntoDocumentId for &ObjectId {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId> {
        Ok(*self)
    }
}

impl IntoDocumentId for &str {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId> {
        ObjectId::parse_str(self)
            .map_err(|e| DocumentStoreError::InvalidId(format!("{self}: {e}")))
    }
}

impl IntoDocumentId for String {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId> {
        self.as_str().into_document_id()
    }
}

impl IntoDocumentId for &String {
    fn into_document_id(self) -> DocumentStoreResult<ObjectId> {
        self.as_str().into_document_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Bowl {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        size: i32,
    }

    impl Document for Bowl {
        fn id(&self) -> Option<&ObjectId> {
            self.id.as_ref()
        }

        fn set_id(&mut self, id: ObjectId) {
            self.id = Some(id);
        }

        fn collection_name() -> &'static str {
            "bowls"
        }
    }

    #[test]
    fn unsaved_documents_omit_the_id() {
        let bowl = Bowl { id: None, size: 2 };

        assert_eq!(bowl.to_bson().unwrap(), Bson::Document(bson::doc! { "size": 2 }));
        assert_eq!(bowl.to_json().unwrap(), serde_json::json!({ "size": 2 }));
        assert_eq!(Bowl::from_bson(bowl.to_bson().unwrap()).unwrap(), bowl);
    }

    #[test]
    fn hex_ids_parse() {
        let id = "5c5310238118fd8446555924"
            .into_document_id()
            .unwrap();

        assert_eq!(id.to_hex(), "5c5310238118fd8446555924");
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in ["", "koda", "5c5310238118fd844655592", "zz5310238118fd8446555924"] {
            assert!(matches!(
                raw.into_document_id(),
                Err(DocumentStoreError::InvalidId(_))
            ));
        }
    }
}
