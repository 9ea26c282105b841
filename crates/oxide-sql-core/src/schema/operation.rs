//! Schema operations.
//!
//! Defines every structural change a schema grammar can compile: CREATE TABLE,
//! ADD COLUMN, indexes, foreign keys and so on. Operations are validated
//! before any SQL is produced.

use std::collections::HashSet;

use crate::error::{Result, TranslationError};

use super::column::{ColumnDefinition, ColumnType, DefaultValue, ForeignKeyAction};

/// All schema operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a new table.
    CreateTable(CreateTableOp),
    /// Drop an existing table.
    DropTable(DropTableOp),
    /// Rename a table.
    RenameTable(RenameTableOp),
    /// Add a column to an existing table.
    AddColumn(AddColumnOp),
    /// Drop a column from a table.
    DropColumn(DropColumnOp),
    /// Rename a column.
    RenameColumn(RenameColumnOp),
    /// Change a column's type, nullability or default.
    ChangeColumn(ChangeColumnOp),
    /// Create an index.
    AddIndex(AddIndexOp),
    /// Drop an index.
    DropIndex(DropIndexOp),
    /// Rename an index.
    RenameIndex(RenameIndexOp),
    /// Add a foreign key constraint.
    AddForeignKey(AddForeignKeyOp),
    /// Drop a foreign key constraint.
    DropForeignKey(DropForeignKeyOp),
    /// Run raw SQL.
    RawSql(String),
}

impl Operation {
    /// Creates a drop table operation.
    #[must_use]
    pub fn drop_table(name: impl Into<String>) -> Self {
        Self::DropTable(DropTableOp {
            name: name.into(),
            if_exists: false,
            cascade: false,
        })
    }

    /// Creates a drop table if exists operation.
    #[must_use]
    pub fn drop_table_if_exists(name: impl Into<String>) -> Self {
        Self::DropTable(DropTableOp {
            name: name.into(),
            if_exists: true,
            cascade: false,
        })
    }

    /// Creates a rename table operation.
    #[must_use]
    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable(RenameTableOp {
            old_name: old_name.into(),
            new_name: new_name.into(),
        })
    }

    /// Creates an add column operation.
    #[must_use]
    pub fn add_column(table: impl Into<String>, column: impl Into<ColumnDefinition>) -> Self {
        Self::AddColumn(AddColumnOp {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Creates a drop column operation.
    #[must_use]
    pub fn drop_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DropColumn(DropColumnOp {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Creates a rename column operation.
    #[must_use]
    pub fn rename_column(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameColumn(RenameColumnOp {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        })
    }

    /// Creates a change column operation.
    #[must_use]
    pub fn change_column(
        table: impl Into<String>,
        column: impl Into<String>,
        change: ColumnChange,
    ) -> Self {
        Self::ChangeColumn(ChangeColumnOp {
            table: table.into(),
            column: column.into(),
            change,
        })
    }

    /// Creates a drop index operation.
    #[must_use]
    pub fn drop_index(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DropIndex(DropIndexOp {
            table: table.into(),
            name: name.into(),
            unique: false,
            if_exists: false,
        })
    }

    /// Creates a drop unique index operation.
    #[must_use]
    pub fn drop_unique(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DropIndex(DropIndexOp {
            table: table.into(),
            name: name.into(),
            unique: true,
            if_exists: false,
        })
    }

    /// Creates a rename index operation.
    #[must_use]
    pub fn rename_index(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameIndex(RenameIndexOp {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        })
    }

    /// Creates a drop foreign key operation.
    #[must_use]
    pub fn drop_foreign_key(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DropForeignKey(DropForeignKeyOp {
            table: table.into(),
            name: name.into(),
        })
    }

    /// Creates a raw SQL operation.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::RawSql(sql.into())
    }

    /// Returns the table this operation touches, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::CreateTable(op) => Some(&op.name),
            Self::DropTable(op) => Some(&op.name),
            Self::RenameTable(op) => Some(&op.old_name),
            Self::AddColumn(op) => Some(&op.table),
            Self::DropColumn(op) => Some(&op.table),
            Self::RenameColumn(op) => Some(&op.table),
            Self::ChangeColumn(op) => Some(&op.table),
            Self::AddIndex(op) => Some(&op.table),
            Self::DropIndex(op) => Some(&op.table),
            Self::RenameIndex(op) => Some(&op.table),
            Self::AddForeignKey(op) => Some(&op.table),
            Self::DropForeignKey(op) => Some(&op.table),
            Self::RawSql(_) => None,
        }
    }

    /// Checks the operation for structural mistakes.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslationError`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::CreateTable(op) => {
                require_name(&op.name, "create table")?;
                if op.columns.is_empty() {
                    return Err(TranslationError::invalid_operation(
                        "create table",
                        &op.name,
                        "a table needs at least one column",
                    ));
                }
                let mut seen = HashSet::new();
                for column in &op.columns {
                    if !seen.insert(column.name.as_str()) {
                        return Err(TranslationError::InvalidColumn {
                            table: op.name.clone(),
                            column: column.name.clone(),
                            reason: String::from("duplicate column name"),
                        });
                    }
                    validate_column(&op.name, column)?;
                }
                let autoincrements = op.columns.iter().filter(|c| c.autoincrement).count();
                if autoincrements > 1 {
                    return Err(TranslationError::invalid_operation(
                        "create table",
                        &op.name,
                        "only one auto-increment column is allowed",
                    ));
                }
                let column_keys = op.columns.iter().filter(|c| c.primary_key).count();
                if column_keys > 1 {
                    return Err(TranslationError::invalid_operation(
                        "create table",
                        &op.name,
                        "several columns are marked primary key; declare a composite key instead",
                    ));
                }
                if column_keys == 1 && !op.primary_key.is_empty() {
                    return Err(TranslationError::invalid_operation(
                        "create table",
                        &op.name,
                        "a column-level primary key cannot be combined with a composite key",
                    ));
                }
                if let Some(missing) = op
                    .primary_key
                    .iter()
                    .find(|key| !op.columns.iter().any(|c| &c.name == *key))
                {
                    return Err(TranslationError::InvalidColumn {
                        table: op.name.clone(),
                        column: missing.clone(),
                        reason: String::from("primary key column is not declared"),
                    });
                }
                for fk in &op.foreign_keys {
                    validate_foreign_key(&op.name, fk)?;
                }
                Ok(())
            }
            Self::DropTable(op) => require_name(&op.name, "drop table"),
            Self::RenameTable(op) => {
                require_name(&op.old_name, "rename table")?;
                require_name(&op.new_name, "rename table")
            }
            Self::AddColumn(op) => {
                require_name(&op.table, "add column")?;
                validate_column(&op.table, &op.column)
            }
            Self::DropColumn(op) => {
                require_name(&op.table, "drop column")?;
                require_name(&op.column, "drop column")
            }
            Self::RenameColumn(op) => {
                require_name(&op.table, "rename column")?;
                require_name(&op.old_name, "rename column")?;
                require_name(&op.new_name, "rename column")
            }
            Self::ChangeColumn(op) => {
                require_name(&op.table, "change column")?;
                require_name(&op.column, "change column")?;
                if let ColumnChange::SetType(column_type) = &op.change {
                    validate_type(&op.table, &op.column, column_type)?;
                }
                Ok(())
            }
            Self::AddIndex(op) => {
                require_name(&op.table, "add index")?;
                if op.columns.is_empty() {
                    return Err(TranslationError::invalid_operation(
                        "add index",
                        &op.table,
                        "an index needs at least one column",
                    ));
                }
                op.columns
                    .iter()
                    .try_for_each(|c| require_name(c, "add index"))
            }
            Self::DropIndex(op) => {
                require_name(&op.table, "drop index")?;
                require_name(&op.name, "drop index")
            }
            Self::RenameIndex(op) => {
                require_name(&op.table, "rename index")?;
                require_name(&op.old_name, "rename index")?;
                require_name(&op.new_name, "rename index")
            }
            Self::AddForeignKey(op) => {
                require_name(&op.table, "add foreign key")?;
                validate_foreign_key(&op.table, &op.foreign_key)
            }
            Self::DropForeignKey(op) => {
                require_name(&op.table, "drop foreign key")?;
                require_name(&op.name, "drop foreign key")
            }
            Self::RawSql(sql) => {
                if sql.trim().is_empty() {
                    return Err(TranslationError::invalid_operation(
                        "raw sql",
                        "",
                        "statement is empty",
                    ));
                }
                Ok(())
            }
        }
    }
}

fn require_name(name: &str, context: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains('\0') {
        return Err(TranslationError::InvalidIdentifier {
            name: String::from(name),
            context: String::from(context),
        });
    }
    Ok(())
}

fn validate_column(table: &str, column: &ColumnDefinition) -> Result<()> {
    require_name(&column.name, table)?;
    validate_type(table, &column.name, &column.column_type)?;
    let invalid = |reason: &str| TranslationError::InvalidColumn {
        table: String::from(table),
        column: column.name.clone(),
        reason: String::from(reason),
    };
    if column.autoincrement && !column.column_type.is_integer() {
        return Err(invalid("auto-increment requires an integer type"));
    }
    if column.unsigned && !column.column_type.is_integer() {
        return Err(invalid("only integer columns can be unsigned"));
    }
    if column.autoincrement && column.default.is_some() {
        return Err(invalid("auto-increment columns cannot have a default"));
    }
    if !column.nullable && column.default == Some(DefaultValue::Null) {
        return Err(invalid("NOT NULL column cannot default to NULL"));
    }
    Ok(())
}

fn validate_type(table: &str, column: &str, column_type: &ColumnType) -> Result<()> {
    let invalid = |reason: &str| TranslationError::InvalidColumn {
        table: String::from(table),
        column: String::from(column),
        reason: String::from(reason),
    };
    match column_type {
        ColumnType::Decimal { precision, scale } if scale > precision => {
            Err(invalid("decimal scale exceeds precision"))
        }
        ColumnType::Decimal { precision: 0, .. } => Err(invalid("decimal precision must be positive")),
        ColumnType::Char(0) | ColumnType::String(0) => Err(invalid("length must be positive")),
        ColumnType::Enum(values) if values.is_empty() => {
            Err(invalid("enumeration needs at least one value"))
        }
        ColumnType::Custom(raw) if raw.trim().is_empty() => Err(invalid("custom type is empty")),
        _ => Ok(()),
    }
}

fn validate_foreign_key(table: &str, fk: &ForeignKeyDefinition) -> Result<()> {
    require_name(&fk.foreign_table, "foreign key")?;
    if fk.columns.is_empty() {
        return Err(TranslationError::invalid_operation(
            "add foreign key",
            table,
            "a foreign key needs at least one column",
        ));
    }
    if fk.columns.len() != fk.foreign_columns.len() {
        return Err(TranslationError::invalid_operation(
            "add foreign key",
            table,
            format!(
                "{} local columns but {} referenced columns",
                fk.columns.len(),
                fk.foreign_columns.len()
            ),
        ));
    }
    Ok(())
}

/// Create table operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableOp {
    /// Table name.
    pub name: String,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Composite primary key, when not declared on a column.
    pub primary_key: Vec<String>,
    /// Table-level foreign keys.
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    /// Whether to use IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Table comment.
    pub comment: Option<String>,
}

impl CreateTableOp {
    /// Starts a CREATE TABLE operation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
            primary_key: vec![],
            foreign_keys: vec![],
            if_not_exists: false,
            comment: None,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: impl Into<ColumnDefinition>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Declares a composite primary key.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Adds a table-level foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeyDefinition) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Uses IF NOT EXISTS.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Sets the table comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl From<CreateTableOp> for Operation {
    fn from(op: CreateTableOp) -> Self {
        Self::CreateTable(op)
    }
}

/// Drop table operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTableOp {
    /// Table name.
    pub name: String,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to use CASCADE.
    pub cascade: bool,
}

/// Rename table operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTableOp {
    /// Current table name.
    pub old_name: String,
    /// New table name.
    pub new_name: String,
}

/// Add column operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumnOp {
    /// Table name.
    pub table: String,
    /// Column definition.
    pub column: ColumnDefinition,
}

/// Drop column operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropColumnOp {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
}

/// Rename column operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameColumnOp {
    /// Table name.
    pub table: String,
    /// Current column name.
    pub old_name: String,
    /// New column name.
    pub new_name: String,
}

/// A single change applied to an existing column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnChange {
    /// Change the column type.
    SetType(ColumnType),
    /// Set or drop NOT NULL.
    SetNullable(bool),
    /// Set the default.
    SetDefault(DefaultValue),
    /// Drop the default.
    DropDefault,
}

/// Change column operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeColumnOp {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// The change.
    pub change: ColumnChange,
}

/// Index kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexType {
    /// Ordered index (default).
    #[default]
    BTree,
    /// Hash-distributed index.
    Hash,
    /// Inverted index for JSON and array columns.
    Inverted,
    /// Spatial index.
    Spatial,
    /// Full-text index.
    FullText,
}

/// Add index operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddIndexOp {
    /// Index name; generated from table and columns when absent.
    pub name: Option<String>,
    /// Table name.
    pub table: String,
    /// Columns to index.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Index kind.
    pub index_type: IndexType,
    /// Partial index condition (WHERE clause).
    pub condition: Option<String>,
}

impl AddIndexOp {
    /// Creates a plain index on `columns`.
    #[must_use]
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: None,
            table: table.into(),
            columns: columns.iter().map(|c| String::from(*c)).collect(),
            unique: false,
            index_type: IndexType::BTree,
            condition: None,
        }
    }

    /// Names the index.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the index kind.
    #[must_use]
    pub const fn using(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Makes this a partial index.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Returns the explicit name, or `{table}_{columns}_{index|unique}`.
    #[must_use]
    pub fn index_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let suffix = if self.unique { "unique" } else { "index" };
        let table = self.table.rsplit('.').next().unwrap_or(&self.table);
        format!("{}_{}_{}", table, self.columns.join("_"), suffix).to_lowercase()
    }
}

impl From<AddIndexOp> for Operation {
    fn from(op: AddIndexOp) -> Self {
        Self::AddIndex(op)
    }
}

/// Drop index operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndexOp {
    /// Table the index belongs to.
    pub table: String,
    /// Index name.
    pub name: String,
    /// Whether the index backs a unique constraint.
    pub unique: bool,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
}

/// Rename index operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameIndexOp {
    /// Table the index belongs to.
    pub table: String,
    /// Current name.
    pub old_name: String,
    /// New name.
    pub new_name: String,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDefinition {
    /// Constraint name.
    pub name: Option<String>,
    /// Local columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced columns.
    pub foreign_columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE action.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKeyDefinition {
    /// `columns` reference `foreign_columns` of `foreign_table`.
    #[must_use]
    pub fn new(columns: &[&str], foreign_table: impl Into<String>, foreign_columns: &[&str]) -> Self {
        Self {
            name: None,
            columns: columns.iter().map(|c| String::from(*c)).collect(),
            foreign_table: foreign_table.into(),
            foreign_columns: foreign_columns.iter().map(|c| String::from(*c)).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Names the constraint.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Returns the explicit name, or `{table}_{columns}_foreign`.
    #[must_use]
    pub fn constraint_name(&self, table: &str) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let table = table.rsplit('.').next().unwrap_or(table);
        format!("{}_{}_foreign", table, self.columns.join("_")).to_lowercase()
    }
}

/// Add foreign key operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForeignKeyOp {
    /// Table name.
    pub table: String,
    /// The constraint.
    pub foreign_key: ForeignKeyDefinition,
}

impl From<AddForeignKeyOp> for Operation {
    fn from(op: AddForeignKeyOp) -> Self {
        Self::AddForeignKey(op)
    }
}

/// Drop foreign key operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropForeignKeyOp {
    /// Table name.
    pub table: String,
    /// Constraint name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{big_increments, decimal, enumeration, integer, string, text};

    #[test]
    fn index_names_are_generated() {
        let op = AddIndexOp::new("users", &["email"]).unique();
        assert_eq!(op.index_name(), "users_email_unique");
        let op = AddIndexOp::new("public.Posts", &["user_id", "created_at"]);
        assert_eq!(op.index_name(), "posts_user_id_created_at_index");
        assert_eq!(AddIndexOp::new("t", &["a"]).named("idx").index_name(), "idx");
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let op: Operation = CreateTableOp::new("users")
            .column(integer("a"))
            .column(integer("a"))
            .into();
        assert!(matches!(
            op.validate(),
            Err(TranslationError::InvalidColumn { ref column, .. }) if column == "a"
        ));
    }

    #[test]
    fn autoincrement_requires_integer() {
        let op = Operation::add_column("users", text("body").autoincrement());
        assert!(matches!(op.validate(), Err(TranslationError::InvalidColumn { .. })));
    }

    #[test]
    fn decimal_scale_checked() {
        let op = Operation::add_column("prices", decimal("amount", 4, 6));
        assert!(op.validate().is_err());
    }

    #[test]
    fn empty_enum_rejected() {
        let op = Operation::add_column("users", enumeration("role", &[]));
        assert!(op.validate().is_err());
    }

    #[test]
    fn foreign_key_arity_checked() {
        let op: Operation = AddForeignKeyOp {
            table: String::from("posts"),
            foreign_key: ForeignKeyDefinition::new(&["a", "b"], "users", &["id"]),
        }
        .into();
        assert!(matches!(
            op.validate(),
            Err(TranslationError::InvalidOperation { operation: "add foreign key", .. })
        ));
    }

    #[test]
    fn foreign_key_names_are_generated() {
        let fk = ForeignKeyDefinition::new(&["user_id"], "users", &["id"]);
        assert_eq!(fk.constraint_name("public.posts"), "posts_user_id_foreign");
        assert_eq!(fk.named("fk_author").constraint_name("posts"), "fk_author");
    }

    #[test]
    fn composite_key_columns_must_exist() {
        let op: Operation = CreateTableOp::new("pairs")
            .column(integer("a"))
            .primary_key(&["a", "b"])
            .into();
        assert!(matches!(
            op.validate(),
            Err(TranslationError::InvalidColumn { ref column, .. }) if column == "b"
        ));
    }

    #[test]
    fn one_primary_key_per_table() {
        let op: Operation = CreateTableOp::new("pairs")
            .column(integer("a").primary_key())
            .column(integer("b").primary_key())
            .into();
        assert!(matches!(
            op.validate(),
            Err(TranslationError::InvalidOperation { operation: "create table", .. })
        ));

        let op: Operation = CreateTableOp::new("pairs")
            .column(big_increments("id"))
            .column(integer("tenant"))
            .primary_key(&["id", "tenant"])
            .into();
        assert!(matches!(
            op.validate(),
            Err(TranslationError::InvalidOperation { operation: "create table", .. })
        ));
    }

    #[test]
    fn empty_table_name_rejected() {
        assert!(matches!(
            Operation::drop_table("").validate(),
            Err(TranslationError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn valid_table_passes() {
        let op: Operation = CreateTableOp::new("users")
            .column(big_increments("id"))
            .column(string("email", 255).unique())
            .into();
        assert!(op.validate().is_ok());
        assert_eq!(op.table(), Some("users"));
    }
}
