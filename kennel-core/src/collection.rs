//! Typed collections: the model API over a storage backend.
//!
//! A [`TypedCollection`] binds one [`Document`] type to its collection and exposes
//! the create/read/update/delete operations. It is where validation happens:
//! every write validates the complete document before the backend sees it, and
//! filter-plus-update operations validate every matched document after applying
//! the changes. If any document is rejected, nothing from that call is written.
//!
//! # Example
//!
//! ```ignore
//! let dogs = store.typed_collection::<Dog>();
//!
//! let koda = dogs.create(Dog::builder("Koda").age(3).build()?).await?;
//! let found = dogs.find_by_id(koda.id().unwrap()).await?;
//! let result = dogs
//!     .update_many(Filter::eq("dogName", "Mojo"), Update::new().inc("age", 1))
//!     .await?;
//! ```

use bson::{Bson, oid::ObjectId};
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt, IntoDocumentId},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
    update::Update,
};

/// Outcome of an update operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents selected by the id or filter.
    pub matched_count: u64,
    /// Documents whose content actually changed.
    pub modified_count: u64,
}

/// Outcome of a filter-based delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// A collection bound to the document type `D`.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
/// * `D` - The document type stored in this collection
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates `document`, assigns an id if it has none, and encodes it.
    fn prepare_insert(mut document: D) -> DocumentStoreResult<(ObjectId, Bson, D)> {
        document.validate()?;

        let id = match document.id() {
            Some(id) => *id,
            None => {
                let id = ObjectId::new();
                document.set_id(id);
                id
            }
        };
        let bson = document.to_bson()?;

        Ok((id, bson, document))
    }

    /// Stores a new document and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// [`DocumentStoreError::Validation`] if any field constraint is violated,
    /// [`DocumentStoreError::DocumentAlreadyExists`] if the document carries an id
    /// that is already stored.
    pub async fn create(&self, document: D) -> DocumentStoreResult<D> {
        let (id, bson, document) = Self::prepare_insert(document)?;

        self.backend
            .insert_documents(vec![(id, bson)], &self.name)
            .await?;

        debug!(collection = %self.name, %id, "created document");

        Ok(document)
    }

    /// Stores several new documents in one backend call.
    ///
    /// All documents are validated first; a single violation rejects the whole batch.
    pub async fn insert_many(&self, documents: Vec<D>) -> DocumentStoreResult<Vec<D>> {
        let (rows, documents): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .map(Self::prepare_insert)
            .collect::<DocumentStoreResult<Vec<_>>>()?
            .into_iter()
            .map(|(id, bson, document)| ((id, bson), document))
            .unzip();

        self.backend
            .insert_documents(rows, &self.name)
            .await?;

        debug!(collection = %self.name, count = documents.len(), "inserted documents");

        Ok(documents)
    }

    /// Inserts `document` if it has never been stored, otherwise replaces the stored copy.
    pub async fn save(&self, document: D) -> DocumentStoreResult<D> {
        let Some(id) = document.id().copied() else {
            return self.create(document).await;
        };

        let stored = self.backend
            .get_documents(vec![id], &self.name)
            .await?;

        if stored.is_empty() {
            return self.create(document).await;
        }

        document.validate()?;

        self.backend
            .replace_documents(vec![(id, document.to_bson()?)], &self.name)
            .await?;

        debug!(collection = %self.name, %id, "replaced document");

        Ok(document)
    }

    /// Returns every document matching the filter or query. Order is unspecified.
    pub async fn find(&self, query: impl Into<Query>) -> DocumentStoreResult<Vec<D>> {
        let documents = self.backend
            .query_documents(query.into(), &self.name)
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<DocumentStoreResult<Vec<D>>>()?;

        debug!(collection = %self.name, count = documents.len(), "found documents");

        Ok(documents)
    }

    /// Returns every document in the collection.
    pub async fn find_all(&self) -> DocumentStoreResult<Vec<D>> {
        self.find(Query::new()).await
    }

    /// Returns one document matching `filter`, or `None`.
    pub async fn find_one(&self, filter: Expr) -> DocumentStoreResult<Option<D>> {
        self.backend
            .query_documents(Query::builder().filter(filter).limit(1).build(), &self.name)
            .await?
            .into_iter()
            .next()
            .map(D::from_bson)
            .transpose()
    }

    /// Returns the document with the given id, or `None`.
    ///
    /// # Errors
    ///
    /// [`DocumentStoreError::InvalidId`] if a textual id is not a well-formed object id.
    pub async fn find_by_id(&self, id: impl IntoDocumentId) -> DocumentStoreResult<Option<D>> {
        let id = id.into_document_id()?;

        self.backend
            .get_documents(vec![id], &self.name)
            .await?
            .into_iter()
            .next()
            .map(D::from_bson)
            .transpose()
    }

    /// Applies `update` to the document with the given id.
    ///
    /// A missing id yields a zero [`UpdateResult`].
    pub async fn update_by_id(
        &self,
        id: impl IntoDocumentId,
        update: Update,
    ) -> DocumentStoreResult<UpdateResult> {
        let id = id.into_document_id()?;
        let matched = self.backend
            .get_documents(vec![id], &self.name)
            .await?;

        let (result, _) = self.apply_update(matched, &update).await?;

        Ok(result)
    }

    /// Applies `update` to the document with the given id and returns the updated document.
    pub async fn find_by_id_and_update(
        &self,
        id: impl IntoDocumentId,
        update: Update,
    ) -> DocumentStoreResult<Option<D>> {
        let id = id.into_document_id()?;
        let matched = self.backend
            .get_documents(vec![id], &self.name)
            .await?;

        let (_, mut updated) = self.apply_update(matched, &update).await?;

        Ok(updated.pop())
    }

    /// Applies `update` to every document matching `filter`.
    pub async fn update_many(&self, filter: Expr, update: Update) -> DocumentStoreResult<UpdateResult> {
        let matched = self.backend
            .query_documents(Query::from(filter), &self.name)
            .await?;

        let (result, _) = self.apply_update(matched, &update).await?;

        Ok(result)
    }

    /// Applies `update` to each matched document, validates all of them, then writes
    /// the ones that changed.
    async fn apply_update(
        &self,
        matched: Vec<Bson>,
        update: &Update,
    ) -> DocumentStoreResult<(UpdateResult, Vec<D>)> {
        let mut replacements = Vec::new();
        let mut updated = Vec::with_capacity(matched.len());

        for stored in matched {
            let Bson::Document(mut raw) = stored else {
                return Err(DocumentStoreError::InvalidDocument(format!(
                    "collection {} returned a non-document value",
                    self.name
                )));
            };

            let changed = update.apply(&mut raw)?;
            let document = D::from_bson(Bson::Document(raw))?;
            document.validate()?;

            if changed {
                let id = document
                    .id()
                    .copied()
                    .ok_or_else(|| DocumentStoreError::InvalidDocument(format!(
                        "stored document in {} has no _id",
                        self.name
                    )))?;
                replacements.push((id, document.to_bson()?));
            }

            updated.push(document);
        }

        let result = UpdateResult {
            matched_count: updated.len() as u64,
            modified_count: replacements.len() as u64,
        };

        if !replacements.is_empty() {
            self.backend
                .replace_documents(replacements, &self.name)
                .await?;
        }

        debug!(
            collection = %self.name,
            matched = result.matched_count,
            modified = result.modified_count,
            "updated documents"
        );

        Ok((result, updated))
    }

    /// Removes the document with the given id and returns it, or `None` if it did not exist.
    pub async fn delete_by_id(&self, id: impl IntoDocumentId) -> DocumentStoreResult<Option<D>> {
        let Some(document) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let id = document
            .id()
            .copied()
            .ok_or_else(|| DocumentStoreError::InvalidDocument(format!(
                "stored document in {} has no _id",
                self.name
            )))?;

        let deleted = self.backend
            .delete_documents(vec![id], &self.name)
            .await?;

        debug!(collection = %self.name, %id, deleted, "deleted document");

        // Another writer may have removed it between the read and the delete.
        Ok((deleted > 0).then_some(document))
    }

    /// Removes every document matching `filter`.
    pub async fn delete_many(&self, filter: Expr) -> DocumentStoreResult<DeleteResult> {
        let ids = self.backend
            .query_documents(Query::from(filter), &self.name)
            .await?
            .iter()
            .filter_map(|stored| stored.as_document()?.get_object_id("_id").ok())
            .collect::<Vec<_>>();

        if ids.is_empty() {
            return Ok(DeleteResult::default());
        }

        let deleted_count = self.backend
            .delete_documents(ids, &self.name)
            .await?;

        debug!(collection = %self.name, deleted_count, "deleted documents");

        Ok(DeleteResult { deleted_count })
    }

    /// Drops the collection and every document in it.
    pub async fn drop(&self) -> DocumentStoreResult<()> {
        self.backend
            .drop_collection(&self.name)
            .await
    }
}
