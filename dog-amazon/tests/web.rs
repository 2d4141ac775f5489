use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::to_bytes,
    extract::State,
    http::StatusCode,
    response::Response,
};
use bson::{Bson, oid::ObjectId};
use dog_amazon::{
    model::Dog,
    web::{AppState, home},
};
use kennel::{
    backend::StoreBackend,
    error::{DocumentStoreError, DocumentStoreResult},
    memory::InMemoryStore,
    query::Query,
    store::{DocumentStore, IntoDynDocumentStore},
};

/// A backend whose every call fails, as if the server were down.
#[derive(Debug)]
struct UnreachableStore;

fn unreachable<T>() -> DocumentStoreResult<T> {
    Err(DocumentStoreError::Backend("connection refused".to_string()))
}

#[async_trait]
impl StoreBackend for UnreachableStore {
    async fn insert_documents(&self, _: Vec<(ObjectId, Bson)>, _: &str) -> DocumentStoreResult<()> {
        unreachable()
    }

    async fn replace_documents(&self, _: Vec<(ObjectId, Bson)>, _: &str) -> DocumentStoreResult<()> {
        unreachable()
    }

    async fn delete_documents(&self, _: Vec<ObjectId>, _: &str) -> DocumentStoreResult<u64> {
        unreachable()
    }

    async fn get_documents(&self, _: Vec<ObjectId>, _: &str) -> DocumentStoreResult<Vec<Bson>> {
        unreachable()
    }

    async fn query_documents(&self, _: Query, _: &str) -> DocumentStoreResult<Vec<Bson>> {
        unreachable()
    }

    async fn drop_collection(&self, _: &str) -> DocumentStoreResult<()> {
        unreachable()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn home_lists_dogs_older_than_zero() {
    let store = DocumentStore::new(InMemoryStore::new()).into_dyn();
    store
        .typed_collection::<Dog>()
        .insert_many(vec![
            Dog::builder("Koda").age(3).build().unwrap(),
            Dog::builder("Pebble").age(0).build().unwrap(),
        ])
        .await
        .unwrap();

    let response = home(State(AppState::new(Arc::new(store)))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Koda"));
    assert!(!body.contains("Pebble"));
}

#[tokio::test]
async fn home_with_no_dogs_shows_the_empty_state() {
    let store = DocumentStore::new(InMemoryStore::new()).into_dyn();

    let response = home(State(AppState::new(Arc::new(store)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No dogs yet."));
}

#[tokio::test]
async fn home_renders_the_error_page_when_the_store_fails() {
    let store = DocumentStore::new(UnreachableStore).into_dyn();

    let response = home(State(AppState::new(Arc::new(store)))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response).await;
    assert!(body.contains("couldn't fetch the dogs"));
    assert!(!body.contains("connection refused"));
}
