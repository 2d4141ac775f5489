use clap::Parser;
use dog_amazon::{
    config::CrudConfig,
    crud,
    telemetry::setup_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = CrudConfig::parse();
    let store = config.database.connect().await?;

    let reports = crud::run(&store, &config.script_ids(), config.reset).await;
    let failed = reports
        .iter()
        .filter(|report| report.outcome.is_failure())
        .count();

    info!(steps = reports.len(), failed, "crud walkthrough finished");

    store.shutdown().await?;

    Ok(())
}
