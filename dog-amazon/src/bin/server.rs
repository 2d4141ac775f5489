use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dog_amazon::{
    config::ServerConfig,
    telemetry::setup_tracing,
    web::{AppState, router},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }

    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = ServerConfig::parse();
    let store = Arc::new(config.database.connect().await?);

    if let Err(error) = store.ping().await {
        warn!(%error, "document store is not reachable yet");
    }

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;

    info!(address = %config.listen, "dog server ready");

    axum::serve(listener, router(AppState::new(Arc::clone(&store))))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.shutdown().await?,
        Err(_) => warn!("document store still in use; skipping shutdown"),
    }

    info!("dog server stopped");

    Ok(())
}
