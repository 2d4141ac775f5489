use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Levels come from `RUST_LOG`; without it, the crates in this workspace log at
/// `info` and everything else at `warn`.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dog_amazon=info,kennel_core=info,kennel_mongodb=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
