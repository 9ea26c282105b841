//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax and capabilities.
//! A [`Dialect`] answers the capability questions; the grammars in
//! [`crate::grammar`] consult it while emitting SQL. Callers can ask the same
//! questions before relying on behaviour that may be substituted or dropped,
//! such as row-level lock strengths.

mod generic;

pub use generic::GenericDialect;

use crate::query::{LockStrength, LockWait};

/// How a dialect honours a requested lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockSupport {
    /// The strength is emitted as requested.
    Native,
    /// The strength is replaced by a semantically close one.
    Substitute(LockStrength),
    /// The lock clause is dropped.
    Omit,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the placeholder for the parameter at `index` (1-based).
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        String::from("?")
    }

    /// Returns whether the dialect supports RETURNING clause.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Returns whether the dialect supports INSERT ... ON CONFLICT.
    fn supports_upsert(&self) -> bool {
        false
    }

    /// Returns whether the dialect has a dedicated `UPSERT` statement.
    fn supports_upsert_statement(&self) -> bool {
        false
    }

    /// Returns whether the dialect supports full-text search predicates.
    fn supports_full_text(&self) -> bool {
        false
    }

    /// Returns whether UPDATE and DELETE accept ORDER BY and LIMIT.
    fn supports_limited_mutations(&self) -> bool {
        false
    }

    /// Returns whether UPDATE and DELETE accept joined tables
    /// (`UPDATE .. FROM`, `DELETE .. USING`).
    fn supports_mutation_joins(&self) -> bool {
        false
    }

    /// Returns how a lock strength is honoured.
    fn lock_support(&self, strength: LockStrength) -> LockSupport {
        let _ = strength;
        LockSupport::Native
    }

    /// Returns whether a lock wait policy can be emitted.
    fn supports_lock_wait(&self, wait: LockWait) -> bool {
        matches!(wait, LockWait::Wait)
    }

    /// Quotes an identifier, doubling embedded quote characters.
    ///
    /// Dotted names are quoted segment by segment (`schema.table`), and a
    /// trailing `*` segment is left bare.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        name.split('.')
            .map(|part| {
                if part == "*" {
                    String::from("*")
                } else {
                    let escaped = part.replace(quote, &format!("{quote}{quote}"));
                    format!("{quote}{escaped}{quote}")
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}
