//! Schema grammar: renders [`Operation`]s as DDL and builds catalog queries.
//!
//! Operations are validated first; an invalid operation never yields SQL.
//! Some operations need more than one statement (column comments, for
//! instance), so every compile method returns a list.

use crate::dialect::Dialect;
use crate::error::{Result, TranslationError};
use crate::schema::{
    AddColumnOp, AddForeignKeyOp, AddIndexOp, ChangeColumnOp, ColumnChange, ColumnDefinition,
    ColumnType, CreateTableOp, DefaultValue, DropIndexOp, DropTableOp, ForeignKeyDefinition,
    IndexType, Operation, RenameIndexOp,
};
use crate::value::{quote_literal, SqlValue};

use super::{check_identifier, CompiledStatement, SqlWriter};

/// Trait for dialect-specific DDL generation.
pub trait SchemaGrammar: Send + Sync {
    /// Returns the dialect this grammar targets.
    fn dialect(&self) -> &dyn Dialect;

    /// Maps an abstract column type to the dialect type name.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Unsupported`] when the dialect has no
    /// equivalent type.
    fn type_name(&self, column_type: &ColumnType) -> Result<String>;

    /// Compiles an operation into one or more statements.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslationError`] when the operation is malformed or
    /// uses a feature the dialect lacks.
    fn compile(&self, operation: &Operation) -> Result<Vec<CompiledStatement>> {
        operation.validate()?;
        match operation {
            Operation::CreateTable(op) => self.compile_create_table(op),
            Operation::DropTable(op) => self.compile_drop_table(op),
            Operation::RenameTable(op) => Ok(vec![CompiledStatement::new(format!(
                "ALTER TABLE {} RENAME TO {}",
                self.quote(&op.old_name, "rename table")?,
                self.quote(&op.new_name, "rename table")?
            ))]),
            Operation::AddColumn(op) => self.compile_add_column(op),
            Operation::DropColumn(op) => Ok(vec![CompiledStatement::new(format!(
                "ALTER TABLE {} DROP COLUMN {}",
                self.quote(&op.table, "drop column")?,
                self.quote(&op.column, "drop column")?
            ))]),
            Operation::RenameColumn(op) => Ok(vec![CompiledStatement::new(format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.quote(&op.table, "rename column")?,
                self.quote(&op.old_name, "rename column")?,
                self.quote(&op.new_name, "rename column")?
            ))]),
            Operation::ChangeColumn(op) => self.compile_change_column(op),
            Operation::AddIndex(op) => self.compile_add_index(op),
            Operation::DropIndex(op) => self.compile_drop_index(op),
            Operation::RenameIndex(op) => self.compile_rename_index(op),
            Operation::AddForeignKey(op) => self.compile_add_foreign_key(op),
            Operation::DropForeignKey(op) => Ok(vec![CompiledStatement::new(format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.quote(&op.table, "drop foreign key")?,
                self.quote(&op.name, "drop foreign key")?
            ))]),
            Operation::RawSql(sql) => Ok(vec![CompiledStatement::new(sql.clone())]),
        }
    }

    /// Generates CREATE TABLE plus any comment statements.
    fn compile_create_table(&self, op: &CreateTableOp) -> Result<Vec<CompiledStatement>> {
        let mut sql = String::from("CREATE TABLE ");
        if op.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote(&op.name, "create table")?);
        sql.push_str(" (\n");

        let composite = !op.primary_key.is_empty();
        let mut parts = Vec::with_capacity(op.columns.len());
        for column in &op.columns {
            let def = self.column_definition(column)?;
            if column.primary_key && !composite {
                parts.push(format!("    {def} PRIMARY KEY"));
            } else {
                parts.push(format!("    {def}"));
            }
        }
        if composite {
            parts.push(format!(
                "    PRIMARY KEY ({})",
                self.quote_list(&op.primary_key, "primary key")?
            ));
        }
        for fk in &op.foreign_keys {
            parts.push(format!("    {}", self.foreign_key_constraint(&op.name, fk)?));
        }
        sql.push_str(&parts.join(",\n"));
        sql.push_str("\n)");

        let mut statements = vec![CompiledStatement::new(sql)];
        if let Some(comment) = &op.comment {
            statements.push(CompiledStatement::new(format!(
                "COMMENT ON TABLE {} IS {}",
                self.quote(&op.name, "table comment")?,
                quote_literal(comment)
            )));
        }
        statements.extend(self.column_comments(&op.name, &op.columns)?);
        Ok(statements)
    }

    /// Generates DROP TABLE.
    fn compile_drop_table(&self, op: &DropTableOp) -> Result<Vec<CompiledStatement>> {
        let mut sql = String::from("DROP TABLE ");
        if op.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote(&op.name, "drop table")?);
        if op.cascade {
            sql.push_str(" CASCADE");
        }
        Ok(vec![CompiledStatement::new(sql)])
    }

    /// Generates ADD COLUMN plus its comment statement.
    fn compile_add_column(&self, op: &AddColumnOp) -> Result<Vec<CompiledStatement>> {
        let mut def = self.column_definition(&op.column)?;
        if op.column.primary_key {
            def.push_str(" PRIMARY KEY");
        }
        let mut statements = vec![CompiledStatement::new(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote(&op.table, "add column")?,
            def
        ))];
        statements.extend(self.column_comments(&op.table, std::slice::from_ref(&op.column))?);
        Ok(statements)
    }

    /// Generates ALTER COLUMN.
    fn compile_change_column(&self, op: &ChangeColumnOp) -> Result<Vec<CompiledStatement>> {
        let prefix = format!(
            "ALTER TABLE {} ALTER COLUMN {}",
            self.quote(&op.table, "change column")?,
            self.quote(&op.column, "change column")?
        );
        let sql = match &op.change {
            ColumnChange::SetType(column_type) => {
                format!("{prefix} TYPE {}", self.type_name(column_type)?)
            }
            ColumnChange::SetNullable(true) => format!("{prefix} DROP NOT NULL"),
            ColumnChange::SetNullable(false) => format!("{prefix} SET NOT NULL"),
            ColumnChange::SetDefault(default) => {
                format!("{prefix} SET DEFAULT {}", self.render_default(default))
            }
            ColumnChange::DropDefault => format!("{prefix} DROP DEFAULT"),
        };
        Ok(vec![CompiledStatement::new(sql)])
    }

    /// Generates CREATE INDEX.
    fn compile_add_index(&self, op: &AddIndexOp) -> Result<Vec<CompiledStatement>> {
        let method = self.index_method(op.index_type)?;
        let mut sql = String::from("CREATE ");
        if op.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote(&op.index_name(), "add index")?);
        sql.push_str(" ON ");
        sql.push_str(&self.quote(&op.table, "add index")?);
        if let Some(method) = method {
            sql.push_str(" USING ");
            sql.push_str(method);
        }
        sql.push_str(" (");
        sql.push_str(&self.quote_list(&op.columns, "add index")?);
        sql.push(')');
        if let Some(condition) = &op.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        Ok(vec![CompiledStatement::new(sql)])
    }

    /// Generates DROP INDEX.
    fn compile_drop_index(&self, op: &DropIndexOp) -> Result<Vec<CompiledStatement>> {
        let mut sql = String::from("DROP INDEX ");
        if op.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote(&op.name, "drop index")?);
        Ok(vec![CompiledStatement::new(sql)])
    }

    /// Generates ALTER INDEX .. RENAME.
    fn compile_rename_index(&self, op: &RenameIndexOp) -> Result<Vec<CompiledStatement>> {
        Ok(vec![CompiledStatement::new(format!(
            "ALTER INDEX {} RENAME TO {}",
            self.quote(&op.old_name, "rename index")?,
            self.quote(&op.new_name, "rename index")?
        ))])
    }

    /// Generates ADD CONSTRAINT .. FOREIGN KEY.
    fn compile_add_foreign_key(&self, op: &AddForeignKeyOp) -> Result<Vec<CompiledStatement>> {
        Ok(vec![CompiledStatement::new(format!(
            "ALTER TABLE {} ADD {}",
            self.quote(&op.table, "add foreign key")?,
            self.foreign_key_constraint(&op.table, &op.foreign_key)?
        ))])
    }

    /// Renders a column definition, without PRIMARY KEY.
    fn column_definition(&self, column: &ColumnDefinition) -> Result<String> {
        let name = self.quote(&column.name, "column definition")?;
        let mut sql = format!("{name} {}", self.type_name(&column.column_type)?);
        if let Some(collation) = &column.collation {
            sql.push_str(&format!(" COLLATE {}", self.quote(collation, "collation")?));
        }
        if column.autoincrement {
            sql.push(' ');
            sql.push_str(&self.identity_clause(column));
        }
        if !column.nullable && !column.primary_key {
            sql.push_str(" NOT NULL");
        }
        if column.unique && !column.primary_key {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        for check in self.column_checks(column, &name) {
            sql.push_str(&format!(" CHECK ({check})"));
        }
        Ok(sql)
    }

    /// Returns the clause that makes a column auto-increment.
    fn identity_clause(&self, column: &ColumnDefinition) -> String {
        let _ = column;
        String::from("GENERATED BY DEFAULT AS IDENTITY")
    }

    /// Returns the CHECK expressions for a column, given its quoted name:
    /// non-negativity for unsigned integers, membership for enumerations,
    /// then the user's own.
    fn column_checks(&self, column: &ColumnDefinition, name: &str) -> Vec<String> {
        let mut checks = vec![];
        if column.unsigned {
            checks.push(format!("{name} >= 0"));
        }
        if let ColumnType::Enum(values) = &column.column_type {
            let list: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
            checks.push(format!("{name} IN ({})", list.join(", ")));
        }
        if let Some(check) = &column.check {
            checks.push(check.clone());
        }
        checks
    }

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        default.to_sql()
    }

    /// Maps an index type to a `USING` method; `None` means the default.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Unsupported`] when the dialect cannot
    /// build this kind of index.
    fn index_method(&self, index_type: IndexType) -> Result<Option<&'static str>> {
        match index_type {
            IndexType::BTree => Ok(None),
            IndexType::Hash => Ok(Some("HASH")),
            IndexType::Inverted => Ok(Some("GIN")),
            IndexType::Spatial => Ok(Some("GIST")),
            IndexType::FullText => Err(TranslationError::unsupported(
                "full-text indexes",
                self.dialect().name(),
            )),
        }
    }

    /// Renders `CONSTRAINT .. FOREIGN KEY .. REFERENCES ..`.
    fn foreign_key_constraint(&self, table: &str, fk: &ForeignKeyDefinition) -> Result<String> {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote(&fk.constraint_name(table), "foreign key")?,
            self.quote_list(&fk.columns, "foreign key")?,
            self.quote(&fk.foreign_table, "foreign key")?,
            self.quote_list(&fk.foreign_columns, "foreign key")?
        );
        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        Ok(sql)
    }

    /// Returns `COMMENT ON COLUMN` statements for commented columns.
    fn column_comments(
        &self,
        table: &str,
        columns: &[ColumnDefinition],
    ) -> Result<Vec<CompiledStatement>> {
        columns
            .iter()
            .filter_map(|c| c.comment.as_ref().map(|comment| (c, comment)))
            .map(|(column, comment)| {
                Ok(CompiledStatement::new(format!(
                    "COMMENT ON COLUMN {}.{} IS {}",
                    self.quote(table, "column comment")?,
                    self.quote(&column.name, "column comment")?,
                    quote_literal(comment)
                )))
            })
            .collect()
    }

    /// Quotes an identifier after checking it.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidIdentifier`] for unusable names.
    fn quote(&self, name: &str, context: &str) -> Result<String> {
        check_identifier(name, context)?;
        Ok(self.dialect().quote_identifier(name))
    }

    /// Quotes a comma-separated identifier list.
    ///
    /// # Errors
    ///
    /// See [`quote`](Self::quote).
    fn quote_list(&self, names: &[String], context: &str) -> Result<String> {
        let quoted = names
            .iter()
            .map(|n| self.quote(n, context))
            .collect::<Result<Vec<_>>>()?;
        Ok(quoted.join(", "))
    }

    // -------------------------------------------------------------------------
    // Catalog queries
    // -------------------------------------------------------------------------

    /// Query listing the column names of a table, one row per column with a
    /// `column_name` field, in ordinal order.
    fn compile_column_listing(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(self.dialect());
        w.push("SELECT column_name FROM information_schema.columns WHERE table_catalog = ");
        push_catalog_filter(&mut w, catalog, schema, table);
        w.push(" ORDER BY ordinal_position");
        w.finish()
    }

    /// Query describing the columns of a table (`column_name`, `data_type`,
    /// `is_nullable`, `column_default`, `ordinal_position`).
    fn compile_columns(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(self.dialect());
        w.push(
            "SELECT column_name, data_type, is_nullable, column_default, ordinal_position \
             FROM information_schema.columns WHERE table_catalog = ",
        );
        push_catalog_filter(&mut w, catalog, schema, table);
        w.push(" ORDER BY ordinal_position");
        w.finish()
    }

    /// Query listing base tables (`table_name`, `table_schema`).
    fn compile_tables(&self, catalog: &str, schema: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(self.dialect());
        w.push(
            "SELECT table_name, table_schema FROM information_schema.tables \
             WHERE table_catalog = ",
        );
        w.push_param(SqlValue::Text(String::from(catalog)));
        w.push(" AND table_schema = ");
        w.push_param(SqlValue::Text(String::from(schema)));
        w.push(" AND table_type = 'BASE TABLE' ORDER BY table_name");
        w.finish()
    }

    /// Query listing views (`table_name`, `table_schema`, `view_definition`).
    fn compile_views(&self, catalog: &str, schema: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(self.dialect());
        w.push(
            "SELECT table_name, table_schema, view_definition FROM information_schema.views \
             WHERE table_catalog = ",
        );
        w.push_param(SqlValue::Text(String::from(catalog)));
        w.push(" AND table_schema = ");
        w.push_param(SqlValue::Text(String::from(schema)));
        w.push(" ORDER BY table_name");
        w.finish()
    }

    /// Query listing index columns of a table, one row per indexed column
    /// (`index_name`, `column_name`, `non_unique`, `seq_in_index`,
    /// `is_primary`).
    fn compile_indexes(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement;

    /// Query listing foreign key columns of a table, one row per column pair
    /// (`constraint_name`, `column_name`, `foreign_table`, `foreign_column`,
    /// `update_rule`, `delete_rule`), in key order.
    fn compile_foreign_keys(&self, catalog: &str, schema: &str, table: &str) -> CompiledStatement {
        let mut w = SqlWriter::new(self.dialect());
        w.push(
            "SELECT kcu.constraint_name, kcu.column_name, \
             fkcu.table_name AS foreign_table, fkcu.column_name AS foreign_column, \
             rc.update_rule, rc.delete_rule \
             FROM information_schema.key_column_usage AS kcu \
             INNER JOIN information_schema.referential_constraints AS rc \
             ON rc.constraint_catalog = kcu.constraint_catalog \
             AND rc.constraint_schema = kcu.constraint_schema \
             AND rc.constraint_name = kcu.constraint_name \
             INNER JOIN information_schema.key_column_usage AS fkcu \
             ON fkcu.constraint_catalog = rc.unique_constraint_catalog \
             AND fkcu.constraint_schema = rc.unique_constraint_schema \
             AND fkcu.constraint_name = rc.unique_constraint_name \
             AND fkcu.ordinal_position = kcu.position_in_unique_constraint \
             WHERE kcu.table_catalog = ",
        );
        w.push_param(SqlValue::Text(String::from(catalog)));
        w.push(" AND kcu.table_schema = ");
        w.push_param(SqlValue::Text(String::from(schema)));
        w.push(" AND kcu.table_name = ");
        w.push_param(SqlValue::Text(String::from(table)));
        w.push(" ORDER BY kcu.constraint_name, kcu.ordinal_position");
        w.finish()
    }
}

/// Pushes `$1 AND table_schema = $2 AND table_name = $3`.
fn push_catalog_filter(w: &mut SqlWriter<'_>, catalog: &str, schema: &str, table: &str) {
    w.push_param(SqlValue::Text(String::from(catalog)));
    w.push(" AND table_schema = ");
    w.push_param(SqlValue::Text(String::from(schema)));
    w.push(" AND table_name = ");
    w.push_param(SqlValue::Text(String::from(table)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;
    use crate::schema::{big_increments, enumeration, integer, string, ForeignKeyAction};

    struct AnsiGrammar(GenericDialect);

    impl SchemaGrammar for AnsiGrammar {
        fn dialect(&self) -> &dyn Dialect {
            &self.0
        }

        fn type_name(&self, column_type: &ColumnType) -> Result<String> {
            Ok(match column_type {
                ColumnType::Integer => String::from("INTEGER"),
                ColumnType::BigInteger => String::from("BIGINT"),
                ColumnType::String(n) => format!("VARCHAR({n})"),
                ColumnType::Enum(_) => String::from("VARCHAR(255)"),
                other => format!("{other:?}").to_uppercase(),
            })
        }

        fn compile_indexes(&self, _: &str, _: &str, _: &str) -> CompiledStatement {
            CompiledStatement::new("SELECT 1")
        }
    }

    fn grammar() -> AnsiGrammar {
        AnsiGrammar(GenericDialect::new())
    }

    fn sql(op: impl Into<Operation>) -> Vec<String> {
        grammar()
            .compile(&op.into())
            .unwrap()
            .into_iter()
            .map(|s| s.sql)
            .collect()
    }

    #[test]
    fn create_table_layout() {
        let op = CreateTableOp::new("users")
            .column(big_increments("id"))
            .column(string("email", 255).unique())
            .column(integer("age").unsigned().nullable().comment("years"));
        assert_eq!(
            sql(op),
            vec![
                "CREATE TABLE \"users\" (\n    \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,\n    \"email\" VARCHAR(255) NOT NULL UNIQUE,\n    \"age\" INTEGER CHECK (\"age\" >= 0)\n)",
                "COMMENT ON COLUMN \"users\".\"age\" IS 'years'",
            ]
        );
    }

    #[test]
    fn enumerations_get_membership_check() {
        let op = Operation::add_column("users", enumeration("role", &["admin", "guest"]));
        assert_eq!(
            sql(op),
            vec!["ALTER TABLE \"users\" ADD COLUMN \"role\" VARCHAR(255) NOT NULL CHECK (\"role\" IN ('admin', 'guest'))"]
        );
    }

    #[test]
    fn foreign_key_constraint_named() {
        let op = AddForeignKeyOp {
            table: String::from("posts"),
            foreign_key: ForeignKeyDefinition::new(&["user_id"], "users", &["id"])
                .on_delete(ForeignKeyAction::Cascade),
        };
        assert_eq!(
            sql(op),
            vec!["ALTER TABLE \"posts\" ADD CONSTRAINT \"posts_user_id_foreign\" FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\") ON DELETE CASCADE"]
        );
    }

    #[test]
    fn full_text_index_unsupported() {
        let op = AddIndexOp::new("posts", &["body"]).using(IndexType::FullText);
        assert!(matches!(
            grammar().compile(&op.into()),
            Err(TranslationError::Unsupported { .. })
        ));
    }

    #[test]
    fn catalog_queries_are_parameterised() {
        let stmt = grammar().compile_column_listing("db", "public", "users");
        assert_eq!(
            stmt.sql,
            "SELECT column_name FROM information_schema.columns WHERE table_catalog = ? \
             AND table_schema = ? AND table_name = ? ORDER BY ordinal_position"
        );
        assert_eq!(stmt.params.len(), 3);
    }
}
