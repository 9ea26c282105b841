//! Query Expression Tree.
//!
//! Statements are built as data with a fluent API and handed to a
//! [`QueryGrammar`](crate::grammar::QueryGrammar) for rendering:
//!
//! ```rust
//! use oxide_sql_core::query::{col, Query, Statement};
//!
//! let query = Query::table("users as u")
//!     .select(&["u.id", "u.name"])
//!     .where_clause(col("u.active").eq(true))
//!     .order_by("u.name")
//!     .limit(10);
//! let statement = Statement::from(query);
//! assert!(matches!(statement, Statement::Select(_)));
//! ```

mod delete;
mod expr;
mod insert;
mod lock;
mod select;
mod update;

pub use delete::{Delete, Truncate};
pub use expr::{col, Column, Operand, Operator, Predicate};
pub use insert::{ConflictAction, Insert, OnConflict};
pub use lock::{Lock, LockStrength, LockWait};
pub use select::{
    Conjunction, Direction, Join, JoinKind, Order, Query, SelectItem, TableRef, WhereClause,
};
pub use update::Update;

/// Any statement a query grammar can compile.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT.
    Select(Query),
    /// INSERT.
    Insert(Insert),
    /// UPDATE.
    Update(Update),
    /// DELETE.
    Delete(Delete),
    /// TRUNCATE.
    Truncate(Truncate),
}

impl From<Query> for Statement {
    fn from(q: Query) -> Self {
        Self::Select(q)
    }
}

impl From<Insert> for Statement {
    fn from(i: Insert) -> Self {
        Self::Insert(i)
    }
}

impl From<Update> for Statement {
    fn from(u: Update) -> Self {
        Self::Update(u)
    }
}

impl From<Delete> for Statement {
    fn from(d: Delete) -> Self {
        Self::Delete(d)
    }
}

impl From<Truncate> for Statement {
    fn from(t: Truncate) -> Self {
        Self::Truncate(t)
    }
}
