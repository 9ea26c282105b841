//! Connection bootstrapping.
//!
//! Connections are opened through the connector of a resolved
//! [`CockroachSet`] (see [`crate::connect`]), which opens one connection and
//! initialises the session. Either the caller gets a fully initialised
//! [`CockroachConnection`] or an error; a connection whose session setup
//! failed is closed before the error is returned.

use std::sync::Arc;

use async_trait::async_trait;
use oxide_sql_core::grammar::CompiledStatement;
use oxide_sql_core::query::{Insert, Statement};
use oxide_sql_core::registry::DialectSet;
use oxide_sql_core::schema::Operation;
use oxide_sql_core::value::quote_literal;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::Connection;
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::introspect::CatalogIntrospector;
use crate::row::{bind_all, CockroachRow};

/// The components a CockroachDB connection works with.
pub type CockroachSet = DialectSet<Arc<dyn Connector>>;

/// Opens connections for one dialect.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens and initialises a connection that translates through `set`.
    async fn connect(
        &self,
        config: &ConnectionConfig,
        set: CockroachSet,
    ) -> Result<CockroachConnection>;
}

/// Connects to CockroachDB over the PostgreSQL wire protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachConnector;

impl CockroachConnector {
    /// Creates a new connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for CockroachConnector {
    async fn connect(
        &self,
        config: &ConnectionConfig,
        set: CockroachSet,
    ) -> Result<CockroachConnection> {
        // Invalid session settings are rejected before anything is opened.
        let session = session_statements(config)?;
        let options = config.connect_options()?;

        debug!(server = %config.redacted(), "Connecting");
        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| connection_error(config, "could not open connection", e))?;

        for sql in &session {
            debug!(sql = %sql, "Initialising session");
            if let Err(e) = sqlx::query(sql).execute(&mut conn).await {
                if let Err(close) = conn.close().await {
                    warn!(error = %close, "Failed to close connection after session error");
                }
                return Err(connection_error(
                    config,
                    &format!("session initialisation failed on '{sql}'"),
                    e,
                ));
            }
        }

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to CockroachDB"
        );
        Ok(CockroachConnection {
            conn,
            config: config.clone(),
            set,
        })
    }
}

fn connection_error(config: &ConnectionConfig, message: &str, source: sqlx::Error) -> Error {
    Error::Connection {
        host: config.host.clone(),
        port: config.port,
        message: String::from(message),
        source,
    }
}

/// Returns the statements run right after connecting: search path, time
/// zone, application name, then extra session variables in name order.
///
/// # Errors
///
/// Returns [`Error::Config`] for session variable names that are not plain
/// identifiers, or an empty search path entry.
pub fn session_statements(config: &ConnectionConfig) -> Result<Vec<String>> {
    let mut statements = vec![];

    let schemas: Vec<&str> = config.search_path.split(',').map(str::trim).collect();
    if schemas.iter().any(|s| s.is_empty()) {
        return Err(Error::Config(format!(
            "invalid search_path '{}'",
            config.search_path
        )));
    }
    let quoted: Vec<String> = schemas
        .iter()
        .map(|s| format!("\"{}\"", s.replace('"', "\"\"")))
        .collect();
    statements.push(format!("SET search_path TO {}", quoted.join(", ")));

    if let Some(timezone) = &config.timezone {
        statements.push(format!("SET TIME ZONE {}", quote_literal(timezone)));
    }
    if let Some(name) = &config.application_name {
        statements.push(format!("SET application_name = {}", quote_literal(name)));
    }
    for (name, value) in &config.session {
        if !is_variable_name(name) {
            return Err(Error::Config(format!(
                "invalid session variable name '{name}'"
            )));
        }
        statements.push(format!("SET {name} = {}", quote_literal(value)));
    }
    Ok(statements)
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// An open, initialised CockroachDB connection.
pub struct CockroachConnection {
    conn: PgConnection,
    config: ConnectionConfig,
    set: CockroachSet,
}

impl std::fmt::Debug for CockroachConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CockroachConnection")
            .field("server", &self.config.redacted())
            .finish_non_exhaustive()
    }
}

impl CockroachConnection {
    /// Returns the configuration this connection was opened with.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the dialect components.
    #[must_use]
    pub fn dialect_set(&self) -> &CockroachSet {
        &self.set
    }

    /// Executes a compiled statement and returns the affected row count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when the statement fails.
    pub async fn execute(&mut self, statement: &CompiledStatement) -> Result<u64> {
        debug!(sql = %statement.sql, "Executing SQL");
        let result = bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(&mut self.conn)
            .await
            .map_err(|e| Error::database(&statement.sql, e))?;
        Ok(result.rows_affected())
    }

    /// Executes a compiled statement and returns its rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when the statement fails.
    pub async fn fetch_all(&mut self, statement: &CompiledStatement) -> Result<Vec<CockroachRow>> {
        debug!(sql = %statement.sql, "Fetching rows");
        let rows: Vec<PgRow> = bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| Error::database(&statement.sql, e))?;
        Ok(rows.into_iter().map(CockroachRow::from).collect())
    }

    /// Compiles and applies a schema operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Translation`] when the operation cannot be compiled
    /// (nothing is executed then), or [`Error::Database`] when a statement
    /// fails.
    pub async fn run(&mut self, operation: &Operation) -> Result<()> {
        let statements = self.set.schema_grammar.compile(operation)?;
        for statement in &statements {
            self.execute(statement).await?;
        }
        Ok(())
    }

    /// Compiles and executes a statement, returning the affected row count.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn statement(&mut self, statement: &Statement) -> Result<u64> {
        let compiled = self.set.query_grammar.compile(statement)?;
        self.execute(&compiled).await
    }

    /// Compiles and executes a statement, returning its rows.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn query(&mut self, statement: &Statement) -> Result<Vec<CockroachRow>> {
        let compiled = self.set.query_grammar.compile(statement)?;
        self.fetch_all(&compiled).await
    }

    /// Inserts one row and returns the generated value of `column`.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn insert_get_id(&mut self, insert: Insert, column: &str) -> Result<Option<i64>> {
        let statement = Statement::from(insert.returning(&[column]));
        let rows = self.query(&statement).await?;
        Ok(self.set.processor.process_insert_get_id(&rows, column)?)
    }

    /// Returns a catalog introspector scoped to this connection's database
    /// and default schema.
    pub fn introspector(&mut self) -> CatalogIntrospector<'_> {
        CatalogIntrospector::new(self)
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when the server does not acknowledge.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| Error::database("<close>", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_setup_order() {
        let mut config = ConnectionConfig {
            search_path: String::from("app, public"),
            timezone: Some(String::from("UTC")),
            application_name: Some(String::from("api")),
            ..ConnectionConfig::default()
        };
        config
            .session
            .insert(String::from("statement_timeout"), String::from("5s"));
        assert_eq!(
            session_statements(&config).unwrap(),
            vec![
                r#"SET search_path TO "app", "public""#,
                "SET TIME ZONE 'UTC'",
                "SET application_name = 'api'",
                "SET statement_timeout = '5s'",
            ]
        );
    }

    #[test]
    fn session_variable_names_checked() {
        let mut config = ConnectionConfig::default();
        config
            .session
            .insert(String::from("x; DROP TABLE t"), String::from("1"));
        assert!(matches!(session_statements(&config), Err(Error::Config(_))));
    }

    #[test]
    fn values_are_quoted() {
        let config = ConnectionConfig {
            application_name: Some(String::from("it's")),
            ..ConnectionConfig::default()
        };
        assert!(session_statements(&config)
            .unwrap()
            .contains(&String::from("SET application_name = 'it''s'")));
    }
}
