//! DELETE and TRUNCATE statements.

use super::expr::{Column, Predicate};
use super::insert::to_strings;
use super::select::{Conjunction, Direction, Join, JoinKind, Order, TableRef, WhereClause};

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Target table.
    pub table: TableRef,
    /// Joined tables.
    pub joins: Vec<Join>,
    /// WHERE entries.
    pub wheres: Vec<WhereClause>,
    /// ORDER BY entries.
    pub orders: Vec<Order>,
    /// LIMIT.
    pub limit: Option<u64>,
    /// Columns to return.
    pub returning: Vec<String>,
}

impl Delete {
    /// Starts a DELETE from `table`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: &str) -> Self {
        Self {
            table: TableRef::parse(table),
            joins: vec![],
            wheres: vec![],
            orders: vec![],
            limit: None,
            returning: vec![],
        }
    }

    /// Joins `table` on `first = second`.
    #[must_use]
    pub fn join(mut self, table: &str, first: &str, second: &str) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            table: TableRef::parse(table),
            on: Some(Column::parse(first).eq_col(second)),
        });
        self
    }

    /// Adds a join of any kind.
    #[must_use]
    pub fn join_with(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Adds a WHERE predicate joined with AND.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.wheres.push(WhereClause {
            conjunction: Conjunction::And,
            predicate,
        });
        self
    }

    /// Adds a WHERE predicate joined with OR.
    #[must_use]
    pub fn or_where(mut self, predicate: Predicate) -> Self {
        self.wheres.push(WhereClause {
            conjunction: Conjunction::Or,
            predicate,
        });
        self
    }

    /// Adds an ORDER BY column.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push(Order::Column {
            column: Column::parse(column),
            direction,
        });
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Adds a RETURNING clause.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = to_strings(cols);
        self
    }
}

/// A TRUNCATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncate {
    /// Table to empty.
    pub table: String,
    /// Also truncate tables with foreign keys to this one.
    pub cascade: bool,
}

impl Truncate {
    /// Truncates `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: String::from(table),
            cascade: false,
        }
    }

    /// Adds CASCADE.
    #[must_use]
    pub const fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }
}
