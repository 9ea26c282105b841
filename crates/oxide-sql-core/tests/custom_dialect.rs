//! A dialect assembled from the public traits only.

use std::collections::BTreeMap;
use std::sync::Arc;

use oxide_sql_core::dialect::{Dialect, LockSupport};
use oxide_sql_core::error::Result;
use oxide_sql_core::grammar::{CompiledStatement, QueryGrammar, SchemaGrammar};
use oxide_sql_core::processor::Processor;
use oxide_sql_core::query::{col, Insert, Lock, LockStrength, Query, Statement};
use oxide_sql_core::registry::{DialectRegistry, DialectSet};
use oxide_sql_core::schema::{integer, ColumnType, CreateTableOp};
use oxide_sql_core::value::SqlValue;

#[derive(Debug, Default)]
struct Numbered;

impl Dialect for Numbered {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{index}")
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn lock_support(&self, strength: LockStrength) -> LockSupport {
        match strength {
            LockStrength::Update | LockStrength::Share => LockSupport::Native,
            _ => LockSupport::Omit,
        }
    }
}

#[derive(Debug, Default)]
struct Grammar {
    dialect: Numbered,
}

impl QueryGrammar for Grammar {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}

impl SchemaGrammar for Grammar {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn type_name(&self, column_type: &ColumnType) -> Result<String> {
        Ok(match column_type {
            ColumnType::Integer => String::from("INTEGER"),
            _ => String::from("TEXT"),
        })
    }

    fn compile_indexes(&self, _: &str, _: &str, table: &str) -> CompiledStatement {
        CompiledStatement::new(format!("PRAGMA index_list({table})"))
    }
}

struct Rows;

impl Processor for Rows {}

fn set() -> DialectSet {
    DialectSet {
        dialect: Arc::new(Numbered),
        query_grammar: Arc::new(Grammar::default()),
        schema_grammar: Arc::new(Grammar::default()),
        processor: Arc::new(Rows),
        connector: (),
    }
}

#[test]
fn placeholders_come_from_the_dialect() {
    let statement = Statement::from(
        Insert::into("t")
            .columns(&["a", "b"])
            .row(vec![1, 2])
            .returning(&["id"]),
    );
    let compiled = QueryGrammar::compile(&Grammar::default(), &statement).unwrap();
    assert_eq!(
        compiled.sql,
        r#"INSERT INTO "t" ("a", "b") VALUES (:1, :2) RETURNING "id""#
    );
}

#[test]
fn omitted_lock_strength_leaves_no_clause() {
    let query = Query::table("t")
        .where_clause(col("a").eq(1))
        .lock(Lock::with_strength(LockStrength::KeyShare));
    let compiled = QueryGrammar::compile(&Grammar::default(), &query.into()).unwrap();
    assert_eq!(compiled.sql, r#"SELECT * FROM "t" WHERE "a" = :1"#);
}

#[test]
fn registered_set_compiles_ddl_and_processes_rows() {
    let mut registry = DialectRegistry::new();
    registry.register("Numbered", set()).unwrap();
    let resolved = registry.resolve("NUMBERED").unwrap();
    assert_eq!(resolved.name(), "numbered");

    let ddl = resolved
        .schema_grammar
        .compile(&CreateTableOp::new("t").column(integer("a")).into())
        .unwrap();
    assert_eq!(ddl[0].sql, "CREATE TABLE \"t\" (\n    \"a\" INTEGER NOT NULL\n)");

    let rows: Vec<BTreeMap<String, SqlValue>> = vec![BTreeMap::from([(
        String::from("column_name"),
        SqlValue::Text(String::from("a")),
    )])];
    assert_eq!(
        resolved.processor.process_column_listing(&rows).unwrap(),
        vec!["a"]
    );
}
