use clap::Parser;
use dog_amazon::{
    config::{BackendKind, ConfigError, CrudConfig, ServerConfig},
    crud::{DEFAULT_DOOMED_ID, DEFAULT_TARGET_ID},
};

#[test]
fn backend_kind_follows_the_url_scheme() {
    assert_eq!(BackendKind::from_url("memory://").unwrap(), BackendKind::Memory);
    assert_eq!(BackendKind::from_url("mongodb://localhost/dog-amazon").unwrap(), BackendKind::MongoDb);
    assert_eq!(BackendKind::from_url("mongodb+srv://cluster.example.com").unwrap(), BackendKind::MongoDb);

    assert!(matches!(
        BackendKind::from_url("postgres://localhost"),
        Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "postgres"
    ));
    assert!(matches!(
        BackendKind::from_url("localhost/dog-amazon"),
        Err(ConfigError::MissingScheme(_))
    ));
}

#[test]
fn server_flags() {
    let config = ServerConfig::try_parse_from([
        "dog-amazon-server",
        "--listen",
        "0.0.0.0:8080",
        "--database-url",
        "memory://",
    ])
    .unwrap();

    assert_eq!(config.listen.port(), 8080);
    assert_eq!(config.database.backend_kind().unwrap(), BackendKind::Memory);
}

#[test]
fn server_rejects_a_bad_listen_address() {
    assert!(ServerConfig::try_parse_from(["dog-amazon-server", "--listen", "not-an-address"]).is_err());
}

#[test]
fn crud_flags() {
    let config = CrudConfig::try_parse_from([
        "dog-amazon-crud",
        "--database-url",
        "memory://",
        "--target-id",
        "5c5310238118fd8446555925",
        "--reset",
    ])
    .unwrap();

    let ids = config.script_ids();
    assert_eq!(ids.target, "5c5310238118fd8446555925");
    assert!(config.reset);

    // Unset unless the environment provides one.
    if std::env::var_os("DOG_AMAZON_DOOMED_ID").is_none() {
        assert_eq!(ids.doomed, DEFAULT_DOOMED_ID);
    }
    assert_ne!(ids.target, DEFAULT_TARGET_ID);
}

#[tokio::test]
async fn memory_url_connects_without_a_server() {
    let config = CrudConfig::try_parse_from(["dog-amazon-crud", "--database-url", "memory://"]).unwrap();
    let store = config.database.connect().await.unwrap();

    store.ping().await.unwrap();
    store.shutdown().await.unwrap();
}
