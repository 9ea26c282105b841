//! Normalised catalog records.
//!
//! Whatever the dialect's metadata queries look like, introspection ends in
//! these shapes.

use serde::{Deserialize, Serialize};

use crate::schema::ForeignKeyAction;

/// A column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table.
    pub name: String,
    /// Dialect type name as reported (e.g. `INT8`, `DATE`).
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default expression, with dialect casts removed.
    pub default: Option<String>,
    /// Ordinal position (1-based) as reported by the catalog.
    pub ordinal: i64,
}

/// A base table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,
    /// Schema the table lives in.
    pub schema: String,
}

/// A view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    /// View name.
    pub name: String,
    /// Schema the view lives in.
    pub schema: String,
    /// View query, when the catalog exposes it.
    pub definition: Option<String>,
}

/// An index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Index name, unique within its table.
    pub name: String,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Whether the index backs the primary key.
    pub primary: bool,
}

/// A foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Constraint name.
    pub name: String,
    /// Local columns, in key order.
    pub columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced columns, paired with `columns`.
    pub foreign_columns: Vec<String>,
    /// ON UPDATE rule.
    pub on_update: Option<ForeignKeyAction>,
    /// ON DELETE rule.
    pub on_delete: Option<ForeignKeyAction>,
}
