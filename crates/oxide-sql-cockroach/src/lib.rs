//! # oxide-sql-cockroach
//!
//! CockroachDB support for oxide-sql: query and schema grammars, a result
//! processor, catalog introspection and connection bootstrapping.
//!
//! CockroachDB speaks the PostgreSQL wire protocol and most of its SQL, so
//! this crate only overrides where it differs:
//!
//! - Row locks: `FOR NO KEY UPDATE` and `FOR KEY SHARE` are emitted as
//!   `FOR UPDATE` and `FOR SHARE`; locks on DISTINCT / GROUP BY / HAVING
//!   queries are dropped.
//! - `UPSERT INTO` replaces rows by primary key.
//! - `TRUNCATE` cannot restart identities.
//! - Index names are table-scoped (`DROP INDEX "users"@"users_email_unique"`).
//! - Catalog queries skip the hidden `rowid` column, and defaults come back
//!   with their casts stripped.
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_cockroach::{registry, ConnectionConfig};
//! use oxide_sql_core::query::{col, Lock, LockStrength, Query};
//!
//! let registry = registry(&ConnectionConfig::default()).unwrap();
//! let set = registry.resolve("crdb").unwrap();
//!
//! let query = Query::table("accounts")
//!     .where_clause(col("id").eq(7))
//!     .lock(Lock::with_strength(LockStrength::NoKeyUpdate));
//! let compiled = set.query_grammar.compile(&query.into()).unwrap();
//! assert_eq!(compiled.sql, r#"SELECT * FROM "accounts" WHERE "id" = $1 FOR UPDATE"#);
//! ```

pub mod config;
pub mod connector;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod introspect;
pub mod processor;
pub mod row;

use std::sync::Arc;

use oxide_sql_core::error::RegistryError;
use oxide_sql_core::registry::{DialectRegistry, DialectSet};
use tracing::debug;

pub use config::{ConnectionConfig, IdentityStrategy, SslMode};
pub use connector::{CockroachConnection, CockroachConnector, CockroachSet, Connector};
pub use dialect::CockroachDialect;
pub use error::{Error, Result};
pub use grammar::{CockroachQueryGrammar, CockroachSchemaGrammar};
pub use introspect::CatalogIntrospector;
pub use processor::CockroachProcessor;
pub use row::CockroachRow;

/// Name the dialect is registered under.
pub const DIALECT_NAME: &str = "cockroachdb";

/// Aliases resolving to [`DIALECT_NAME`].
pub const ALIASES: &[&str] = &["cockroach", "crdb"];

/// Builds the CockroachDB components for `config`.
#[must_use]
pub fn dialect_set(config: &ConnectionConfig) -> CockroachSet {
    DialectSet {
        dialect: Arc::new(CockroachDialect::new()),
        query_grammar: Arc::new(CockroachQueryGrammar::new()),
        schema_grammar: Arc::new(CockroachSchemaGrammar::new().with_identity(config.identity)),
        processor: Arc::new(CockroachProcessor::new()),
        connector: Arc::new(CockroachConnector::new()),
    }
}

/// Registers CockroachDB as `cockroachdb`, with aliases `cockroach` and
/// `crdb`.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyRegistered`] when one of the names is
/// taken.
pub fn register(
    registry: &mut DialectRegistry<Arc<dyn Connector>>,
    config: &ConnectionConfig,
) -> std::result::Result<(), RegistryError> {
    registry.register(DIALECT_NAME, dialect_set(config))?;
    for alias in ALIASES {
        registry.alias(*alias, DIALECT_NAME)?;
    }
    Ok(())
}

/// Returns a registry holding CockroachDB under its name and aliases.
///
/// # Errors
///
/// Never fails for a fresh registry; the error is that of [`register`].
pub fn registry(config: &ConnectionConfig) -> Result<DialectRegistry<Arc<dyn Connector>>> {
    let mut registry = DialectRegistry::new();
    register(&mut registry, config)?;
    Ok(registry)
}

/// Resolves `config.driver` in `registry` and connects through the resolved
/// connector. The connection translates with the resolved components.
///
/// # Errors
///
/// Returns [`Error::Registry`] when the driver is not registered, before
/// any connection is attempted, or the connector's error otherwise.
pub async fn connect(
    registry: &DialectRegistry<Arc<dyn Connector>>,
    config: &ConnectionConfig,
) -> Result<CockroachConnection> {
    let set = registry.resolve(&config.driver)?;
    debug!(driver = %config.driver, dialect = set.name(), "Resolved dialect");
    let connector = Arc::clone(&set.connector);
    connector.connect(config, set).await
}
