//! Command-line and environment configuration for both binaries.
//!
//! Every flag can also be given through a `DOG_AMAZON_*` environment variable.
//! The storage backend is picked from the scheme of the database URL.

use std::net::SocketAddr;

use clap::{Args, Parser};
use kennel::{
    backend::StoreBackendBuilder,
    error::DocumentStoreError,
    memory::InMemoryStore,
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};
use thiserror::Error;
use tracing::info;

use crate::crud::ScriptIds;

pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost/dog-amazon";
pub const DEFAULT_DATABASE_NAME: &str = "dog-amazon";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:5555";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("database url `{0}` has no scheme")]
    MissingScheme(String),
    #[error("unsupported database url scheme `{0}`; expected memory or mongodb")]
    UnsupportedScheme(String),
    #[error("mongodb support is not compiled in; rebuild with the `mongodb` feature")]
    MongoDbDisabled,
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

/// Storage backend selected by the database URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// `memory://`, a fresh empty store per process.
    Memory,
    /// `mongodb://` or `mongodb+srv://`.
    MongoDb,
}

impl BackendKind {
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let Some((scheme, _)) = url.split_once("://") else {
            return Err(ConfigError::MissingScheme(url.to_string()));
        };

        match scheme {
            "memory" => Ok(BackendKind::Memory),
            "mongodb" | "mongodb+srv" => Ok(BackendKind::MongoDb),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// Document store connection string (`mongodb://...` or `memory://`).
    #[arg(long, env = "DOG_AMAZON_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Database holding the `dogs` collection.
    #[arg(long, env = "DOG_AMAZON_DATABASE_NAME", default_value = DEFAULT_DATABASE_NAME)]
    pub database_name: String,
}

impl DatabaseConfig {
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        BackendKind::from_url(&self.database_url)
    }

    /// Builds the backend named by the URL and wraps it in a store.
    pub async fn connect(&self) -> Result<DynDocumentStore, ConfigError> {
        let kind = self.backend_kind()?;

        info!(?kind, database = %self.database_name, "connecting to document store");

        match kind {
            BackendKind::Memory => {
                let backend = InMemoryStore::builder().build().await?;

                Ok(DocumentStore::new(backend).into_dyn())
            }
            #[cfg(feature = "mongodb")]
            BackendKind::MongoDb => {
                let backend = kennel::mongodb::MongoDbStore::builder(&self.database_url, &self.database_name)
                    .build()
                    .await?;

                Ok(DocumentStore::new(backend).into_dyn())
            }
            #[cfg(not(feature = "mongodb"))]
            BackendKind::MongoDb => Err(ConfigError::MongoDbDisabled),
        }
    }
}

/// Serves the dog listing page.
#[derive(Debug, Clone, Parser)]
#[command(name = "dog-amazon-server", version, about)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[arg(long, env = "DOG_AMAZON_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    #[command(flatten)]
    pub database: DatabaseConfig,
}

/// Runs the create/read/update/delete walkthrough against the `dogs` collection.
#[derive(Debug, Clone, Parser)]
#[command(name = "dog-amazon-crud", version, about)]
pub struct CrudConfig {
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Dog looked up, renamed and given a toy by id.
    #[arg(long, env = "DOG_AMAZON_TARGET_ID", default_value = crate::crud::DEFAULT_TARGET_ID)]
    pub target_id: String,

    /// Dog deleted by id.
    #[arg(long, env = "DOG_AMAZON_DOOMED_ID", default_value = crate::crud::DEFAULT_DOOMED_ID)]
    pub doomed_id: String,

    /// Drop the `dogs` collection before running.
    #[arg(long)]
    pub reset: bool,
}

impl CrudConfig {
    pub fn script_ids(&self) -> ScriptIds {
        ScriptIds {
            target: self.target_id.clone(),
            doomed: self.doomed_id.clone(),
        }
    }
}
