//! In-memory storage implementation for document stores.
//!
//! Documents live as BSON values in per-collection ordered maps behind an
//! async-aware read-write lock. Nothing survives the process.

use std::{collections::{BTreeMap, HashMap, HashSet}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, oid::ObjectId};

use kennel_core::{
    query::Query,
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::DocumentEvaluator;

type CollectionMap = BTreeMap<ObjectId, Bson>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable; clones share the same underlying data. Queries
/// scan every document in the collection. Since object ids start with a timestamp,
/// scans come back roughly in insertion order.
///
/// # Example
///
/// ```ignore
/// use kennel_memory::InMemoryStore;
/// use kennel::backend::StoreBackend;
/// use bson::{Bson, doc, oid::ObjectId};
///
/// let store = InMemoryStore::new();
///
/// let id = ObjectId::new();
/// let doc = Bson::Document(doc! { "_id": id, "dogName": "Koda", "age": 3 });
/// store.insert_documents(vec![(id, doc)], "dogs").await?;
///
/// let docs = store.get_documents(vec![id], "dogs").await?;
/// assert_eq!(docs.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        // Reject the whole batch before touching the map.
        let mut batch = HashSet::with_capacity(documents.len());
        for (id, _) in &documents {
            if collection_map.contains_key(id) || !batch.insert(*id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id.to_hex(), collection.to_string()));
            }
        }

        collection_map.extend(documents);

        Ok(())
    }

    async fn replace_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let not_found = |id: &ObjectId| DocumentStoreError::DocumentNotFound(id.to_hex(), collection.to_string());

        let Some(collection_map) = store.get_mut(collection) else {
            return match documents.first() {
                Some((id, _)) => Err(not_found(id)),
                None => Ok(()),
            };
        };

        for (id, _) in &documents {
            if !collection_map.contains_key(id) {
                return Err(not_found(id));
            }
        }

        collection_map.extend(documents);

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(0);
        };

        Ok(
            ids
                .iter()
                .filter(|id| collection_map.remove(id).is_some())
                .count() as u64
        )
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        Ok(
            ids
                .iter()
                .filter_map(|id| collection_map.get(id).cloned())
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        let matched = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                collection_map.values(),
                filter,
            )?,
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        Ok(
            matched
                .into_iter()
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        )
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .remove(name);

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
