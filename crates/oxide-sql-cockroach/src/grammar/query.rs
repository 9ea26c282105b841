//! CockroachDB query grammar.

use oxide_sql_core::dialect::Dialect;
use oxide_sql_core::error::Result;
use oxide_sql_core::grammar::{QueryGrammar, SqlWriter};
use oxide_sql_core::query::{Column, Truncate};
use oxide_sql_core::value::SqlValue;

use crate::dialect::CockroachDialect;

/// Renders statements as CockroachDB SQL.
///
/// Most of the PostgreSQL-flavoured defaults apply unchanged. The
/// differences are TRUNCATE, which cannot restart identities, and JSON
/// containment, which uses `@>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachQueryGrammar {
    dialect: CockroachDialect,
}

impl CockroachQueryGrammar {
    /// Creates a new CockroachDB query grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: CockroachDialect::new(),
        }
    }
}

impl QueryGrammar for CockroachQueryGrammar {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn compile_truncate(&self, truncate: &Truncate, w: &mut SqlWriter<'_>) -> Result<()> {
        w.push("TRUNCATE TABLE ");
        w.push_identifier(&truncate.table, "truncate")?;
        if truncate.cascade {
            w.push(" CASCADE");
        }
        Ok(())
    }

    fn write_json_contains(
        &self,
        column: &Column,
        value: &SqlValue,
        w: &mut SqlWriter<'_>,
    ) -> Result<()> {
        self.write_column(column, w)?;
        w.push(" @> ");
        w.push_param(value.clone());
        Ok(())
    }
}
