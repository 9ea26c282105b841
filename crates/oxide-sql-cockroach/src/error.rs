//! Error types for CockroachDB connections and introspection.

use oxide_sql_core::error::{RegistryError, TranslationError};

/// Errors raised while connecting to or querying CockroachDB.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A statement or operation could not be translated.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The configured driver names no registered dialect.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The connection could not be established or initialised.
    #[error("Failed to connect to {host}:{port}: {message}")]
    Connection {
        /// Server host.
        host: String,
        /// Server port.
        port: u16,
        /// What was being attempted.
        message: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The database rejected a statement.
    #[error("Database error while executing '{sql}': {source}")]
    Database {
        /// The statement text.
        sql: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The connection configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Wraps a driver error raised by `sql`.
    pub fn database(sql: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Database {
            sql: sql.into(),
            source,
        }
    }
}

/// Result type for CockroachDB operations.
pub type Result<T> = std::result::Result<T, Error>;
