//! Dialect resolution from the configured driver name.

use oxide_sql_cockroach::{connect, registry, ConnectionConfig, Error, IdentityStrategy};
use oxide_sql_core::error::RegistryError;
use oxide_sql_core::schema::{big_increments, CreateTableOp};

#[test]
fn configured_driver_and_aliases_resolve() {
    let config = ConnectionConfig::default();
    let registry = registry(&config).unwrap();
    for name in [config.driver.as_str(), "cockroach", "CRDB"] {
        assert_eq!(registry.resolve(name).unwrap().name(), "cockroachdb");
    }
}

#[test]
fn resolved_set_follows_the_configuration() {
    let config = ConnectionConfig {
        identity: IdentityStrategy::UniqueRowId,
        ..ConnectionConfig::default()
    };
    let set = registry(&config).unwrap().resolve("crdb").unwrap();
    let ddl = set
        .schema_grammar
        .compile(&CreateTableOp::new("events").column(big_increments("id")).into())
        .unwrap();
    assert!(ddl[0].sql.contains("DEFAULT unique_rowid()"));
}

#[tokio::test]
async fn unknown_driver_fails_before_connecting() {
    // Nothing listens here; resolution must fail first.
    let config = ConnectionConfig {
        driver: String::from("oracle"),
        host: String::from("192.0.2.1"),
        ..ConnectionConfig::default()
    };
    let registry = registry(&ConnectionConfig::default()).unwrap();
    let err = connect(&registry, &config).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Registry(RegistryError::UnknownDialect(ref name)) if name == "oracle"
    ));
}
