//! HTTP routes. There is exactly one: the dog listing at `/`.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use kennel::{query::Filter, store::DynDocumentStore};
use tracing::{error, info};

use crate::{
    model::{Dog, fields},
    views,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<DynDocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<DynDocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynDocumentStore {
        &self.store
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .with_state(state)
}

/// Lists every dog older than zero, or renders the error page with a 500.
pub async fn home(State(state): State<AppState>) -> Response {
    let listing = state
        .store()
        .typed_collection::<Dog>()
        .find(Filter::gt(fields::AGE, 0))
        .await;

    match listing {
        Ok(dogs) => {
            info!(count = dogs.len(), "rendering home page");

            Html(views::index(&dogs)).into_response()
        }
        Err(error) => {
            error!(%error, "home page dog listing failed");

            (StatusCode::INTERNAL_SERVER_ERROR, Html(views::dog_error())).into_response()
        }
    }
}
