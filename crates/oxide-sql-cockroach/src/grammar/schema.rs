//! CockroachDB schema grammar.
//!
//! How CockroachDB DDL differs from the PostgreSQL-flavoured defaults:
//!
//! - Index names are scoped to their table, so DROP and RENAME address them
//!   as `table@index`, and dropping a unique index needs `CASCADE`.
//! - JSON and spatial indexes are `INVERTED` indexes; hash indexes are
//!   hash-sharded (`USING HASH` after the column list).
//! - There is no full-text index.
//! - Auto-increment columns are identities by default, or `unique_rowid()`
//!   defaults when [`IdentityStrategy::UniqueRowId`] is selected.
//! - Catalog queries hide the implicit `rowid` column and report
//!   CockroachDB type names (`crdb_sql_type`).

use oxide_sql_core::dialect::Dialect;
use oxide_sql_core::error::{Result, TranslationError};
use oxide_sql_core::grammar::{CompiledStatement, SchemaGrammar, SqlWriter};
use oxide_sql_core::schema::{
    AddIndexOp, ColumnDefinition, ColumnType, DropIndexOp, IndexType, RenameIndexOp,
};
use oxide_sql_core::value::SqlValue;

use super::types;
use crate::config::IdentityStrategy;
use crate::dialect::CockroachDialect;

/// Renders schema operations as CockroachDB DDL.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachSchemaGrammar {
    dialect: CockroachDialect,
    identity: IdentityStrategy,
}

impl CockroachSchemaGrammar {
    /// Creates a grammar using sequence-backed identity columns.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: CockroachDialect::new(),
            identity: IdentityStrategy::Identity,
        }
    }

    /// Sets how auto-increment columns are generated.
    #[must_use]
    pub const fn with_identity(mut self, identity: IdentityStrategy) -> Self {
        self.identity = identity;
        self
    }

    /// Returns the identity strategy.
    #[must_use]
    pub const fn identity(&self) -> IdentityStrategy {
        self.identity
    }

    fn index_reference(&self, table: &str, index: &str, context: &str) -> Result<String> {
        Ok(format!(
            "{}@{}",
            self.quote(table, context)?,
            self.quote(index, context)?
        ))
    }
}

impl SchemaGrammar for CockroachSchemaGrammar {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn type_name(&self, column_type: &ColumnType) -> Result<String> {
        Ok(types::type_name(column_type))
    }

    fn identity_clause(&self, _column: &ColumnDefinition) -> String {
        match self.identity {
            IdentityStrategy::Identity => String::from("GENERATED BY DEFAULT AS IDENTITY"),
            IdentityStrategy::UniqueRowId => String::from("DEFAULT unique_rowid()"),
        }
    }

    fn compile_add_index(&self, op: &AddIndexOp) -> Result<Vec<CompiledStatement>> {
        let name = self.quote(&op.index_name(), "add index")?;
        let table = self.quote(&op.table, "add index")?;
        let columns = self.quote_list(&op.columns, "add index")?;
        let mut sql = match op.index_type {
            IndexType::FullText => {
                return Err(TranslationError::unsupported(
                    "full-text indexes",
                    self.dialect.name(),
                ))
            }
            IndexType::Inverted | IndexType::Spatial if op.unique => {
                return Err(TranslationError::unsupported(
                    "unique inverted indexes",
                    self.dialect.name(),
                ))
            }
            IndexType::Inverted | IndexType::Spatial => {
                format!("CREATE INVERTED INDEX {name} ON {table} ({columns})")
            }
            IndexType::BTree | IndexType::Hash => {
                let unique = if op.unique { "UNIQUE " } else { "" };
                let mut sql = format!("CREATE {unique}INDEX {name} ON {table} ({columns})");
                if op.index_type == IndexType::Hash {
                    sql.push_str(" USING HASH");
                }
                sql
            }
        };
        if let Some(condition) = &op.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        Ok(vec![CompiledStatement::new(sql)])
    }

    fn compile_drop_index(&self, op: &DropIndexOp) -> Result<Vec<CompiledStatement>> {
        let mut sql = String::from("DROP INDEX ");
        if op.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.index_reference(&op.table, &op.name, "drop index")?);
        // Unique indexes back constraints.
        if op.unique {
            sql.push_str(" CASCADE");
        }
        Ok(vec![CompiledStatement::new(sql)])
    }

    fn compile_rename_index(&self, op: &RenameIndexOp) -> Result<Vec<CompiledStatement>> {
        Ok(vec![CompiledStatement::new(format!(
            "ALTER INDEX {} RENAME TO {}",
            self.index_reference(&op.table, &op.old_name, "rename index")?,
            self.quote(&op.new_name, "rename index")?
        ))])
    }

    fn compile_column_listing(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(&self.dialect);
        w.push("SELECT column_name FROM information_schema.columns WHERE table_catalog = ");
        push_table_filter(&mut w, catalog, schema, table);
        w.push(" AND is_hidden = 'NO' ORDER BY ordinal_position");
        w.finish()
    }

    fn compile_columns(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(&self.dialect);
        w.push(
            "SELECT column_name, crdb_sql_type AS data_type, is_nullable, column_default, \
             ordinal_position FROM information_schema.columns WHERE table_catalog = ",
        );
        push_table_filter(&mut w, catalog, schema, table);
        w.push(" AND is_hidden = 'NO' ORDER BY ordinal_position");
        w.finish()
    }

    fn compile_indexes(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(&self.dialect);
        w.push(
            "SELECT s.index_name, s.column_name, s.non_unique, s.seq_in_index, \
             tc.constraint_name IS NOT NULL AS is_primary \
             FROM information_schema.statistics AS s \
             LEFT JOIN information_schema.table_constraints AS tc \
             ON tc.table_catalog = s.table_catalog \
             AND tc.table_schema = s.table_schema \
             AND tc.table_name = s.table_name \
             AND tc.constraint_name = s.index_name \
             AND tc.constraint_type = 'PRIMARY KEY' \
             WHERE s.table_catalog = ",
        );
        w.push_param(SqlValue::Text(String::from(catalog)));
        w.push(" AND s.table_schema = ");
        w.push_param(SqlValue::Text(String::from(schema)));
        w.push(" AND s.table_name = ");
        w.push_param(SqlValue::Text(String::from(table)));
        // Stored and implicit columns are not part of the key.
        w.push(" AND s.storing = 'NO' AND s.implicit = 'NO' ORDER BY s.index_name, s.seq_in_index");
        w.finish()
    }
}

fn push_table_filter(w: &mut SqlWriter<'_>, catalog: &str, schema: &str, table: &str) {
    w.push_param(SqlValue::Text(String::from(catalog)));
    w.push(" AND table_schema = ");
    w.push_param(SqlValue::Text(String::from(schema)));
    w.push(" AND table_name = ");
    w.push_param(SqlValue::Text(String::from(table)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_sql_core::schema::{big_increments, string, Operation};

    fn sql(grammar: &CockroachSchemaGrammar, op: impl Into<Operation>) -> Vec<String> {
        grammar
            .compile(&op.into())
            .unwrap()
            .into_iter()
            .map(|s| s.sql)
            .collect()
    }

    #[test]
    fn unique_rowid_identity() {
        let grammar = CockroachSchemaGrammar::new().with_identity(IdentityStrategy::UniqueRowId);
        assert_eq!(
            sql(&grammar, Operation::add_column("users", big_increments("id"))),
            vec![r#"ALTER TABLE "users" ADD COLUMN "id" INT8 DEFAULT unique_rowid() PRIMARY KEY"#]
        );
    }

    #[test]
    fn inverted_and_hash_indexes() {
        let grammar = CockroachSchemaGrammar::new();
        assert_eq!(
            sql(&grammar, AddIndexOp::new("docs", &["meta"]).using(IndexType::Inverted)),
            vec![r#"CREATE INVERTED INDEX "docs_meta_index" ON "docs" ("meta")"#]
        );
        assert_eq!(
            sql(&grammar, AddIndexOp::new("events", &["ts"]).using(IndexType::Hash)),
            vec![r#"CREATE INDEX "events_ts_index" ON "events" ("ts") USING HASH"#]
        );
    }

    #[test]
    fn unique_inverted_index_rejected() {
        let grammar = CockroachSchemaGrammar::new();
        let op = AddIndexOp::new("docs", &["meta"])
            .using(IndexType::Spatial)
            .unique();
        assert!(matches!(
            grammar.compile(&op.into()),
            Err(TranslationError::Unsupported { .. })
        ));
    }

    #[test]
    fn index_names_are_table_scoped() {
        let grammar = CockroachSchemaGrammar::new();
        assert_eq!(
            sql(&grammar, Operation::drop_unique("users", "users_email_unique")),
            vec![r#"DROP INDEX "users"@"users_email_unique" CASCADE"#]
        );
        assert_eq!(
            sql(&grammar, Operation::rename_index("users", "a", "b")),
            vec![r#"ALTER INDEX "users"@"a" RENAME TO "b""#]
        );
    }

    #[test]
    fn column_listing_hides_rowid() {
        let compiled = CockroachSchemaGrammar::new().compile_column_listing("db", "public", "users");
        assert_eq!(
            compiled.sql,
            "SELECT column_name FROM information_schema.columns WHERE table_catalog = $1 \
             AND table_schema = $2 AND table_name = $3 AND is_hidden = 'NO' \
             ORDER BY ordinal_position"
        );
        assert_eq!(compiled.params.len(), 3);
    }

    #[test]
    fn string_column() {
        let grammar = CockroachSchemaGrammar::new();
        assert_eq!(
            sql(&grammar, Operation::add_column("users", string("email", 255).unique())),
            vec![r#"ALTER TABLE "users" ADD COLUMN "email" VARCHAR(255) NOT NULL UNIQUE"#]
        );
    }
}
