//! UPDATE statements.

use crate::value::ToSqlValue;

use super::expr::{Column, Operand, Predicate};
use super::insert::to_strings;
use super::select::{Conjunction, Direction, Join, JoinKind, Order, TableRef, WhereClause};

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Target table.
    pub table: TableRef,
    /// `SET` assignments, in order.
    pub assignments: Vec<(String, Operand)>,
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

impl Update {
    /// Starts an UPDATE of `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: TableRef::parse(table),
            assignments: vec![],
            joins: vec![],
            wheres: vec![],
            orders: vec![],
            limit: None,
            returning: vec![],
        }
    }

    /// Assigns a value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.assignments
            .push((String::from(column), Operand::Value(value.to_sql_value())));
        self
    }

    /// Assigns another column's value.
    #[must_use]
    pub fn set_col(mut self, column: &str, source: &str) -> Self {
        self.assignments
            .push((String::from(column), Operand::Column(Column::parse(source))));
        self
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
