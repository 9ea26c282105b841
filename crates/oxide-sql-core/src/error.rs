//! Error types for translation and dialect resolution.

use thiserror::Error;

/// Errors raised while translating an abstract statement or schema operation
/// into dialect SQL.
///
/// A translation error is always raised before any SQL text is produced, so
/// callers never observe partially-correct statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// An identifier is empty or contains characters the grammar refuses to quote.
    #[error("invalid identifier '{name}' in {context}")]
    InvalidIdentifier {
        /// The offending identifier.
        name: String,
        /// Where the identifier appeared (e.g. "create table users").
        context: String,
    },

    /// A qualified column references a table or alias that is not in scope.
    #[error("column '{column}' references undefined table or alias '{table}'")]
    UnknownTable {
        /// The unresolved qualifier.
        table: String,
        /// The full column reference.
        column: String,
    },

    /// An INSERT row has a different number of values than declared columns.
    #[error("insert into '{table}': row {row} has {found} values, expected {expected}")]
    ArityMismatch {
        /// Target table.
        table: String,
        /// Zero-based row index.
        row: usize,
        /// Number of declared columns.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// An INSERT without any row.
    #[error("insert into '{table}' has no rows")]
    EmptyInsert {
        /// Target table.
        table: String,
    },

    /// The dialect has no equivalent for the requested feature.
    #[error("{dialect} does not support {feature}")]
    Unsupported {
        /// Short description of the feature.
        feature: String,
        /// Dialect name.
        dialect: &'static str,
    },

    /// A column definition is not valid for the operation.
    #[error("invalid column '{column}' on table '{table}': {reason}")]
    InvalidColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A schema operation or statement is malformed.
    #[error("invalid {operation} on '{table}': {reason}")]
    InvalidOperation {
        /// Operation kind (e.g. "add index").
        operation: &'static str,
        /// Table name.
        table: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A result row lacks an expected field, or the field has the wrong type.
    #[error("row {row} has no usable '{field}' field")]
    MalformedRow {
        /// Zero-based row index.
        row: usize,
        /// Expected field name.
        field: String,
    },
}

impl TranslationError {
    /// Shorthand for [`TranslationError::Unsupported`].
    #[must_use]
    pub fn unsupported(feature: impl Into<String>, dialect: &'static str) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            dialect,
        }
    }

    /// Shorthand for [`TranslationError::InvalidOperation`].
    #[must_use]
    pub fn invalid_operation(
        operation: &'static str,
        table: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperation {
            operation,
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the dialect registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No dialect is registered under this name.
    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),

    /// A dialect with this name is already registered.
    #[error("dialect '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslationError>;
