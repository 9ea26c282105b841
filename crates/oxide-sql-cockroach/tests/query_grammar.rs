//! Query compilation against the CockroachDB grammar.

use oxide_sql_cockroach::CockroachQueryGrammar;
use oxide_sql_core::error::TranslationError;
use oxide_sql_core::grammar::{CompiledStatement, QueryGrammar};
use oxide_sql_core::query::{
    col, Delete, Direction, Insert, Join, JoinKind, Lock, LockStrength, Predicate, Query,
    Statement, TableRef, Update,
};
use oxide_sql_core::value::SqlValue;

fn compile(statement: impl Into<Statement>) -> CompiledStatement {
    CockroachQueryGrammar::new()
        .compile(&statement.into())
        .unwrap()
}

fn compile_err(statement: impl Into<Statement>) -> TranslationError {
    CockroachQueryGrammar::new()
        .compile(&statement.into())
        .unwrap_err()
}

#[test]
fn placeholders_follow_predicate_order() {
    let query = Query::table("users")
        .select(&["id", "email"])
        .where_clause(col("status").eq("active"))
        .or_where(col("age").between(18, 30))
        .where_clause(col("role").in_list(vec!["admin", "editor"]));
    let compiled = compile(query);
    assert_eq!(
        compiled.sql,
        r#"SELECT "id", "email" FROM "users" WHERE "status" = $1 OR "age" BETWEEN $2 AND $3 AND "role" IN ($4, $5)"#
    );
    assert_eq!(compiled.params.len(), 5);
    assert_eq!(compiled.params[0], SqlValue::Text(String::from("active")));
}

#[test]
fn compilation_is_idempotent() {
    let statement = Statement::from(
        Query::table("orders AS o")
            .join("users AS u", "u.id", "o.user_id")
            .where_clause(col("u.email").like("%@example.com"))
            .order_by_desc("o.created_at")
            .limit(20)
            .offset(40)
            .lock(Lock::for_update().skip_locked()),
    );
    let grammar = CockroachQueryGrammar::new();
    let first = grammar.compile(&statement).unwrap();
    let second = grammar.compile(&statement).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql,
        r#"SELECT * FROM "orders" AS "o" INNER JOIN "users" AS "u" ON "u"."id" = "o"."user_id" WHERE "u"."email" LIKE $1 ORDER BY "o"."created_at" DESC LIMIT 20 OFFSET 40 FOR UPDATE SKIP LOCKED"#
    );
}

#[test]
fn weaker_lock_strengths_are_substituted() {
    let no_key = Query::table("accounts").lock(Lock::with_strength(LockStrength::NoKeyUpdate));
    assert_eq!(compile(no_key).sql, r#"SELECT * FROM "accounts" FOR UPDATE"#);

    let key_share = Query::table("accounts").lock(Lock::with_strength(LockStrength::KeyShare).nowait());
    assert_eq!(
        compile(key_share).sql,
        r#"SELECT * FROM "accounts" FOR SHARE NOWAIT"#
    );
}

#[test]
fn locks_on_aggregated_queries_are_omitted() {
    let grouped = Query::table("orders")
        .select_raw("status, count(*)")
        .group_by(&["status"])
        .lock_for_update();
    assert_eq!(
        compile(grouped).sql,
        r#"SELECT status, count(*) FROM "orders" GROUP BY "status""#
    );

    let distinct = Query::table("orders").select(&["status"]).distinct().shared_lock();
    assert_eq!(
        compile(distinct).sql,
        r#"SELECT DISTINCT "status" FROM "orders""#
    );
}

#[test]
fn raw_locks_must_be_for_clauses() {
    let kept = Query::table("jobs").lock(Lock::Raw(String::from("FOR UPDATE OF jobs")));
    assert_eq!(compile(kept).sql, r#"SELECT * FROM "jobs" FOR UPDATE OF jobs"#);

    let dropped = Query::table("jobs").lock(Lock::Raw(String::from("LOCK IN SHARE MODE")));
    assert_eq!(compile(dropped).sql, r#"SELECT * FROM "jobs""#);
}

#[test]
fn upserts() {
    let update = Insert::into("users")
        .columns(&["email", "name"])
        .row(vec!["a@example.com", "Ada"])
        .on_conflict_update(&["email"], &["name"]);
    assert_eq!(
        compile(update).sql,
        r#"INSERT INTO "users" ("email", "name") VALUES ($1, $2) ON CONFLICT ("email") DO UPDATE SET "name" = excluded."name""#
    );

    let ignore = Insert::into("users").columns(&["email"]).row(vec!["a@example.com"]).or_ignore();
    assert_eq!(
        compile(ignore).sql,
        r#"INSERT INTO "users" ("email") VALUES ($1) ON CONFLICT DO NOTHING"#
    );

    let replace = Insert::into("users")
        .columns(&["id", "email"])
        .values(vec![SqlValue::Int(1), SqlValue::Text(String::from("a@example.com"))])
        .replace();
    assert_eq!(
        compile(replace).sql,
        r#"UPSERT INTO "users" ("id", "email") VALUES ($1, $2)"#
    );
}

#[test]
fn insert_returning() {
    let insert = Insert::into("users")
        .columns(&["email"])
        .row(vec!["a@example.com"])
        .returning(&["id"]);
    assert_eq!(
        compile(insert).sql,
        r#"INSERT INTO "users" ("email") VALUES ($1) RETURNING "id""#
    );
}

#[test]
fn nulls_are_inlined_not_bound() {
    let insert = Insert::into("people")
        .columns(&["name", "age", "born_on"])
        .values(vec![
            SqlValue::Text(String::from("ada")),
            SqlValue::Null,
            SqlValue::Null,
        ]);
    let compiled = compile(insert);
    assert_eq!(
        compiled.sql,
        r#"INSERT INTO "people" ("name", "age", "born_on") VALUES ($1, NULL, NULL)"#
    );
    assert_eq!(compiled.params, vec![SqlValue::Text(String::from("ada"))]);

    let update = Update::table("people")
        .set("age", None::<i64>)
        .set("name", "bob")
        .where_clause(col("id").eq(7));
    let compiled = compile(update);
    assert_eq!(
        compiled.sql,
        r#"UPDATE "people" SET "age" = NULL, "name" = $1 WHERE "id" = $2"#
    );
    assert!(!compiled.params.iter().any(SqlValue::is_null));
}

#[test]
fn update_with_join_uses_from() {
    let update = Update::table("orders")
        .set("status", "shipped")
        .join("users", "users.id", "orders.user_id")
        .where_clause(col("users.country").eq("NZ"))
        .returning(&["orders.id"]);
    let compiled = compile(update);
    assert_eq!(
        compiled.sql,
        r#"UPDATE "orders" SET "status" = $1 FROM "users" WHERE "users"."id" = "orders"."user_id" AND "users"."country" = $2 RETURNING "orders"."id""#
    );
    assert_eq!(compiled.params.len(), 2);
}

#[test]
fn delete_with_join_uses_using() {
    let delete = Delete::from("sessions")
        .join("users", "users.id", "sessions.user_id")
        .where_clause(col("users.banned").eq(true));
    assert_eq!(
        compile(delete).sql,
        r#"DELETE FROM "sessions" USING "users" WHERE "users"."id" = "sessions"."user_id" AND "users"."banned" = $1"#
    );
}

#[test]
fn outer_joins_rejected_in_mutations() {
    let delete = Delete::from("sessions").join_with(Join {
        kind: JoinKind::Left,
        table: TableRef::parse("users"),
        on: Some(col("users.id").eq_col("sessions.user_id")),
    });
    assert!(matches!(
        compile_err(delete),
        TranslationError::Unsupported { .. }
    ));
}

#[test]
fn ordered_and_limited_mutations() {
    let delete = Delete::from("events")
        .where_clause(col("processed").eq(true))
        .order_by("created_at", Direction::Asc)
        .limit(1000);
    assert_eq!(
        compile(delete).sql,
        r#"DELETE FROM "events" WHERE "processed" = $1 ORDER BY "created_at" ASC LIMIT 1000"#
    );
}

#[test]
fn nested_groups_and_null_checks() {
    let query = Query::table("users").where_clause(
        col("deleted_at")
            .is_null()
            .and(col("role").eq("admin").or(col("role").eq("owner"))),
    );
    assert_eq!(
        compile(query).sql,
        r#"SELECT * FROM "users" WHERE ("deleted_at" IS NULL AND ("role" = $1 OR "role" = $2))"#
    );
}

#[test]
fn exists_subquery_sees_outer_table() {
    let inner = Query::table("orders").where_clause(col("orders.user_id").eq_col("users.id"));
    let query = Query::table("users").where_clause(Predicate::exists(inner));
    assert_eq!(
        compile(query).sql,
        r#"SELECT * FROM "users" WHERE EXISTS (SELECT * FROM "orders" WHERE "orders"."user_id" = "users"."id")"#
    );
}

#[test]
fn undefined_alias_rejected_before_rendering() {
    let query = Query::table("users AS u").where_clause(col("x.id").eq(1));
    assert_eq!(
        compile_err(query),
        TranslationError::UnknownTable {
            table: String::from("x"),
            column: String::from("x.id"),
        }
    );
}

#[test]
fn insert_arity_and_emptiness_checked() {
    let ragged = Insert::into("users")
        .columns(&["a", "b"])
        .values(vec![SqlValue::Int(1)]);
    assert!(matches!(
        compile_err(ragged),
        TranslationError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
    assert!(matches!(
        compile_err(Insert::into("users").columns(&["a"])),
        TranslationError::EmptyInsert { .. }
    ));
}

#[test]
fn raw_predicates_are_renumbered() {
    let query = Query::table("users")
        .where_clause(col("id").gt(10))
        .where_clause(Predicate::raw("lower(email) = ?", vec![SqlValue::Text(String::from("a@b.c"))]));
    assert_eq!(
        compile(query).sql,
        r#"SELECT * FROM "users" WHERE "id" > $1 AND lower(email) = $2"#
    );
}

#[test]
fn empty_in_lists_are_constant() {
    let none: Vec<i64> = vec![];
    let query = Query::table("users")
        .where_clause(col("id").in_list(none.clone()))
        .or_where(col("id").not_in_list(none));
    let compiled = compile(query);
    assert_eq!(compiled.sql, r#"SELECT * FROM "users" WHERE 0 = 1 OR 1 = 1"#);
    assert!(compiled.params.is_empty());
}

#[test]
fn registry_resolves_aliases() {
    use oxide_sql_cockroach::{register, ConnectionConfig, DIALECT_NAME};
    use oxide_sql_core::error::RegistryError;
    use oxide_sql_core::registry::DialectRegistry;

    let mut registry = DialectRegistry::new();
    register(&mut registry, &ConnectionConfig::default()).unwrap();

    for name in ["cockroachdb", "CockroachDB", "cockroach", "crdb"] {
        assert_eq!(registry.resolve(name).unwrap().name(), DIALECT_NAME);
    }
    assert_eq!(
        registry.resolve("oracle").unwrap_err(),
        RegistryError::UnknownDialect(String::from("oracle"))
    );
    assert!(matches!(
        register(&mut registry, &ConnectionConfig::default()),
        Err(RegistryError::AlreadyRegistered(_))
    ));
}
