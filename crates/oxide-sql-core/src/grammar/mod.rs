//! Grammars turn query trees and schema operations into dialect SQL.
//!
//! Both grammar traits carry ANSI / PostgreSQL-flavoured default
//! implementations. A dialect crate overrides only the pieces where its
//! database differs.

mod query;
mod schema;

pub use query::{GenericGrammar, QueryGrammar};
pub use schema::SchemaGrammar;

use std::fmt;

use crate::dialect::Dialect;
use crate::error::{Result, TranslationError};
use crate::value::SqlValue;

/// SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    /// SQL text.
    pub sql: String,
    /// Parameters; `params[0]` binds to the first placeholder.
    pub params: Vec<SqlValue>,
}

impl CompiledStatement {
    /// A statement without parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// A statement with parameters.
    #[must_use]
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Accumulates SQL text and parameters for one statement.
pub struct SqlWriter<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    params: Vec<SqlValue>,
}

impl<'d> SqlWriter<'d> {
    /// Creates an empty writer.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: vec![],
        }
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Appends SQL text verbatim.
    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a quoted identifier (dotted names are quoted per segment).
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidIdentifier`] for empty names, empty
    /// segments and names containing NUL.
    pub fn push_identifier(&mut self, name: &str, context: &str) -> Result<()> {
        check_identifier(name, context)?;
        self.sql.push_str(&self.dialect.quote_identifier(name));
        Ok(())
    }

    /// Appends a comma-separated list of quoted identifiers.
    ///
    /// # Errors
    ///
    /// See [`push_identifier`](Self::push_identifier).
    pub fn push_identifier_list<S: AsRef<str>>(&mut self, names: &[S], context: &str) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_identifier(name.as_ref(), context)?;
        }
        Ok(())
    }

    /// Binds a parameter and appends its placeholder. `NULL` is written
    /// inline and never bound.
    pub fn push_param(&mut self, value: SqlValue) {
        if value.is_null() {
            self.sql.push_str("NULL");
            return;
        }
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }

    /// Appends a raw fragment, replacing each `?` outside quotes with the
    /// next placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidOperation`] when the number of
    /// markers and parameters differ.
    pub fn push_raw(&mut self, sql: &str, params: &[SqlValue]) -> Result<()> {
        let markers = count_markers(sql);
        if markers != params.len() {
            return Err(TranslationError::invalid_operation(
                "raw expression",
                sql,
                format!("{markers} markers but {} parameters", params.len()),
            ));
        }
        let mut values = params.iter();
        let mut in_single = false;
        let mut in_double = false;
        for ch in sql.chars() {
            match ch {
                '\'' if !in_double => {
                    in_single = !in_single;
                    self.sql.push(ch);
                }
                '"' if !in_single => {
                    in_double = !in_double;
                    self.sql.push(ch);
                }
                '?' if !in_single && !in_double => {
                    if let Some(value) = values.next() {
                        self.push_param(value.clone());
                    }
                }
                _ => self.sql.push(ch),
            }
        }
        Ok(())
    }

    /// Consumes the writer.
    #[must_use]
    pub fn finish(self) -> CompiledStatement {
        CompiledStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

fn count_markers(sql: &str) -> usize {
    let mut in_single = false;
    let mut in_double = false;
    let mut count = 0;
    for ch in sql.chars() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '?' if !in_single && !in_double => count += 1,
            _ => {}
        }
    }
    count
}

/// Checks that `name` can be quoted.
///
/// # Errors
///
/// Returns [`TranslationError::InvalidIdentifier`] for empty names, empty
/// dotted segments and names containing NUL.
pub fn check_identifier(name: &str, context: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') || name.split('.').any(str::is_empty) {
        return Err(TranslationError::InvalidIdentifier {
            name: String::from(name),
            context: String::from(context),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;

    #[test]
    fn raw_markers_become_placeholders() {
        let dialect = GenericDialect::new();
        let mut w = SqlWriter::new(&dialect);
        w.push_raw("a = ? AND b = '?'", &[SqlValue::Int(1)]).unwrap();
        let stmt = w.finish();
        assert_eq!(stmt.sql, "a = ? AND b = '?'");
        assert_eq!(stmt.params, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn null_is_written_inline() {
        let dialect = GenericDialect::new();
        let mut w = SqlWriter::new(&dialect);
        w.push_raw("coalesce(?, ?, ?)", &[SqlValue::Int(1), SqlValue::Null, SqlValue::Int(3)])
            .unwrap();
        let stmt = w.finish();
        assert_eq!(stmt.sql, "coalesce(?, NULL, ?)");
        assert_eq!(stmt.params, vec![SqlValue::Int(1), SqlValue::Int(3)]);
    }

    #[test]
    fn raw_marker_count_checked() {
        let dialect = GenericDialect::new();
        let mut w = SqlWriter::new(&dialect);
        assert!(w.push_raw("a = ? AND b = ?", &[SqlValue::Int(1)]).is_err());
    }

    #[test]
    fn identifiers_checked() {
        assert!(check_identifier("users", "test").is_ok());
        assert!(check_identifier("public.users", "test").is_ok());
        assert!(check_identifier("", "test").is_err());
        assert!(check_identifier("a..b", "test").is_err());
        assert!(check_identifier("bad\0name", "test").is_err());
    }

    #[test]
    fn display_is_sql() {
        let stmt = CompiledStatement::with_params("SELECT ?", vec![SqlValue::Int(1)]);
        assert_eq!(stmt.to_string(), "SELECT ?");
    }
}
