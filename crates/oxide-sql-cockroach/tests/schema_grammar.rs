//! DDL generation against the CockroachDB schema grammar.

use oxide_sql_cockroach::{CockroachSchemaGrammar, IdentityStrategy};
use oxide_sql_core::error::TranslationError;
use oxide_sql_core::grammar::SchemaGrammar;
use oxide_sql_core::schema::{
    big_increments, date, enumeration, integer, jsonb, mac_address, string, text, timestamp_tz,
    AddIndexOp, ColumnChange, ColumnType, CreateTableOp, DefaultValue, ForeignKeyAction,
    ForeignKeyDefinition, IndexType, Operation,
};

fn sql(grammar: &CockroachSchemaGrammar, op: impl Into<Operation>) -> Vec<String> {
    grammar
        .compile(&op.into())
        .unwrap()
        .into_iter()
        .map(|s| s.sql)
        .collect()
}

#[test]
fn create_table_with_emulated_types() {
    let op = CreateTableOp::new("devices")
        .column(big_increments("id"))
        .column(string("serial", 64).unique())
        .column(date("date_field").nullable())
        .column(integer("port").unsigned())
        .column(enumeration("status", &["active", "retired"]).default_str("active"))
        .column(mac_address("mac").nullable().comment("primary NIC"))
        .column(timestamp_tz("created_at").default_expr("now()"));

    let statements = sql(&CockroachSchemaGrammar::new(), op);
    assert_eq!(
        statements,
        vec![
            String::from(
                "CREATE TABLE \"devices\" (\n    \
                 \"id\" INT8 GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,\n    \
                 \"serial\" VARCHAR(64) NOT NULL UNIQUE,\n    \
                 \"date_field\" DATE,\n    \
                 \"port\" INT4 NOT NULL CHECK (\"port\" >= 0),\n    \
                 \"status\" VARCHAR(255) NOT NULL DEFAULT 'active' CHECK (\"status\" IN ('active', 'retired')),\n    \
                 \"mac\" VARCHAR(17),\n    \
                 \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now()\n)"
            ),
            String::from(r#"COMMENT ON COLUMN "devices"."mac" IS 'primary NIC'"#),
        ]
    );
}

#[test]
fn unique_rowid_identity() {
    let grammar = CockroachSchemaGrammar::new().with_identity(IdentityStrategy::UniqueRowId);
    let op = CreateTableOp::new("events").column(big_increments("id"));
    assert_eq!(
        sql(&grammar, op),
        vec!["CREATE TABLE \"events\" (\n    \"id\" INT8 DEFAULT unique_rowid() PRIMARY KEY\n)"]
    );
}

#[test]
fn composite_key_and_foreign_key() {
    let op = CreateTableOp::new("memberships")
        .column(integer("user_id"))
        .column(integer("team_id"))
        .primary_key(&["user_id", "team_id"])
        .foreign_key(
            ForeignKeyDefinition::new(&["team_id"], "teams", &["id"])
                .on_delete(ForeignKeyAction::Cascade),
        );
    assert_eq!(
        sql(&CockroachSchemaGrammar::new(), op),
        vec![
            "CREATE TABLE \"memberships\" (\n    \
             \"user_id\" INT4 NOT NULL,\n    \
             \"team_id\" INT4 NOT NULL,\n    \
             PRIMARY KEY (\"user_id\", \"team_id\"),\n    \
             CONSTRAINT \"memberships_team_id_foreign\" FOREIGN KEY (\"team_id\") REFERENCES \"teams\" (\"id\") ON DELETE CASCADE\n)"
        ]
    );
}

#[test]
fn indexes_by_kind() {
    let grammar = CockroachSchemaGrammar::new();
    assert_eq!(
        sql(&grammar, AddIndexOp::new("users", &["email"]).unique()),
        vec![r#"CREATE UNIQUE INDEX "users_email_unique" ON "users" ("email")"#]
    );
    assert_eq!(
        sql(
            &grammar,
            AddIndexOp::new("users", &["settings"]).using(IndexType::Inverted)
        ),
        vec![r#"CREATE INVERTED INDEX "users_settings_index" ON "users" ("settings")"#]
    );
    assert_eq!(
        sql(
            &grammar,
            AddIndexOp::new("events", &["created_at"])
                .using(IndexType::Hash)
                .condition("deleted_at IS NULL")
        ),
        vec![
            r#"CREATE INDEX "events_created_at_index" ON "events" ("created_at") USING HASH WHERE deleted_at IS NULL"#
        ]
    );
}

#[test]
fn full_text_index_unsupported() {
    let err = CockroachSchemaGrammar::new()
        .compile(&AddIndexOp::new("posts", &["body"]).using(IndexType::FullText).into())
        .unwrap_err();
    assert!(matches!(
        err,
        TranslationError::Unsupported {
            dialect: "cockroachdb",
            ..
        }
    ));
}

#[test]
fn table_scoped_index_names() {
    let grammar = CockroachSchemaGrammar::new();
    assert_eq!(
        sql(&grammar, Operation::drop_index("users", "users_name_index")),
        vec![r#"DROP INDEX "users"@"users_name_index""#]
    );
    assert_eq!(
        sql(&grammar, Operation::drop_unique("users", "users_email_unique")),
        vec![r#"DROP INDEX "users"@"users_email_unique" CASCADE"#]
    );
    assert_eq!(
        sql(
            &grammar,
            Operation::rename_index("users", "users_name_index", "users_full_name_index")
        ),
        vec![r#"ALTER INDEX "users"@"users_name_index" RENAME TO "users_full_name_index""#]
    );
}

#[test]
fn invalid_columns_rejected() {
    let grammar = CockroachSchemaGrammar::new();
    let err = grammar
        .compile(&Operation::add_column("users", string("code", 8).autoincrement()))
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidColumn { .. }));

    let err = grammar
        .compile(&Operation::add_column("users", text("bio").unsigned()))
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidColumn { .. }));

    let err = grammar
        .compile(&CreateTableOp::new("empty").into())
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidOperation { .. }));
}

#[test]
fn add_json_column() {
    assert_eq!(
        sql(
            &CockroachSchemaGrammar::new(),
            Operation::add_column("users", jsonb("settings").nullable())
        ),
        vec![r#"ALTER TABLE "users" ADD COLUMN "settings" JSONB"#]
    );
}

#[test]
fn column_alterations() {
    let grammar = CockroachSchemaGrammar::new();
    assert_eq!(
        sql(&grammar, Operation::drop_column("users", "legacy_flag")),
        vec![r#"ALTER TABLE "users" DROP COLUMN "legacy_flag""#]
    );
    assert_eq!(
        sql(&grammar, Operation::rename_column("users", "name", "full_name")),
        vec![r#"ALTER TABLE "users" RENAME COLUMN "name" TO "full_name""#]
    );
    assert_eq!(
        sql(
            &grammar,
            Operation::drop_foreign_key("posts", "posts_user_id_foreign")
        ),
        vec![r#"ALTER TABLE "posts" DROP CONSTRAINT "posts_user_id_foreign""#]
    );
}

#[test]
fn column_changes() {
    let grammar = CockroachSchemaGrammar::new();
    let change = |change| sql(&grammar, Operation::change_column("posts", "views", change));

    assert_eq!(
        change(ColumnChange::SetType(ColumnType::BigInteger)),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" TYPE INT8"#]
    );
    assert_eq!(
        change(ColumnChange::SetType(ColumnType::LongText)),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" TYPE STRING"#]
    );
    assert_eq!(
        change(ColumnChange::SetNullable(true)),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" DROP NOT NULL"#]
    );
    assert_eq!(
        change(ColumnChange::SetNullable(false)),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" SET NOT NULL"#]
    );
    assert_eq!(
        change(ColumnChange::SetDefault(DefaultValue::Integer(0))),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" SET DEFAULT 0"#]
    );
    assert_eq!(
        change(ColumnChange::SetDefault(DefaultValue::String(String::from("it's")))),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" SET DEFAULT 'it''s'"#]
    );
    assert_eq!(
        change(ColumnChange::DropDefault),
        vec![r#"ALTER TABLE "posts" ALTER COLUMN "views" DROP DEFAULT"#]
    );
}

#[test]
fn conflicting_primary_keys_rejected() {
    let grammar = CockroachSchemaGrammar::new();
    let err = grammar
        .compile(
            &CreateTableOp::new("pairs")
                .column(integer("a").primary_key())
                .column(integer("b").primary_key())
                .into(),
        )
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidOperation { .. }));

    let err = grammar
        .compile(
            &CreateTableOp::new("pairs")
                .column(big_increments("id"))
                .column(integer("b"))
                .primary_key(&["id", "b"])
                .into(),
        )
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidOperation { .. }));
}
