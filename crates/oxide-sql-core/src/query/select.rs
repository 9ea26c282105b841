//! SELECT query tree and its fluent builder.
//!
//! A [`Query`] is plain data: building it never produces SQL. Grammars
//! validate and render it, so the same tree can be handed to any dialect.

use super::expr::{Column, Predicate};
use super::lock::{Lock, LockStrength};

/// A table in FROM / JOIN position, with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Table name, possibly schema-qualified.
    pub name: String,
    /// Alias.
    pub alias: Option<String>,
}

impl TableRef {
    /// Parses `"users"`, `"users u"` or `"users as u"`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [name, kw, alias] if kw.eq_ignore_ascii_case("as") => Self::aliased(name, alias),
            [name, alias] => Self::aliased(name, alias),
            _ => Self {
                name: String::from(input.trim()),
                alias: None,
            },
        }
    }

    /// Creates an aliased table reference.
    #[must_use]
    pub fn aliased(name: &str, alias: &str) -> Self {
        Self {
            name: String::from(name),
            alias: Some(String::from(alias)),
        }
    }
}

/// An item of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// `*`
    All,
    /// `t.*`
    AllFrom(String),
    /// A column with an optional alias.
    Column {
        /// Selected column.
        column: Column,
        /// Output alias.
        alias: Option<String>,
    },
    /// A raw expression such as `COUNT(*) AS total`.
    Raw(String),
}

impl SelectItem {
    /// Parses `"*"`, `"t.*"`, `"col"`, `"t.col"` or `"col as alias"`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == "*" {
            return Self::All;
        }
        if let Some(table) = input.strip_suffix(".*") {
            return Self::AllFrom(String::from(table));
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [column, kw, alias] if kw.eq_ignore_ascii_case("as") => Self::Column {
                column: Column::parse(column),
                alias: Some(String::from(*alias)),
            },
            _ => Self::Column {
                column: Column::parse(input),
                alias: None,
            },
        }
    }
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `CROSS JOIN`
    Cross,
}

impl JoinKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Join kind.
    pub kind: JoinKind,
    /// Joined table.
    pub table: TableRef,
    /// Join condition; `None` for cross joins.
    pub on: Option<Predicate>,
}

/// How a WHERE / HAVING entry attaches to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Conjunction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// One entry of a WHERE / HAVING list, kept in caller order.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Connective to the previous entry (ignored for the first one).
    pub conjunction: Conjunction,
    /// The predicate.
    pub predicate: Predicate,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    /// Order by a column.
    Column {
        /// Sort column.
        column: Column,
        /// Direction.
        direction: Direction,
    },
    /// Random order.
    Random,
    /// Raw SQL.
    Raw(String),
}

/// A SELECT query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// FROM table.
    pub table: TableRef,
    /// `SELECT DISTINCT`.
    pub distinct: bool,
    /// Select list; empty means `*`.
    pub columns: Vec<SelectItem>,
    /// Joins, in order.
    pub joins: Vec<Join>,
    /// WHERE entries, in order.
    pub wheres: Vec<WhereClause>,
    /// GROUP BY columns.
    pub groups: Vec<Column>,
    /// HAVING entries, in order.
    pub havings: Vec<WhereClause>,
    /// ORDER BY entries.
    pub orders: Vec<Order>,
    /// LIMIT.
    pub limit: Option<u64>,
    /// OFFSET.
    pub offset: Option<u64>,
    /// Row lock.
    pub lock: Option<Lock>,
}

impl Query {
    /// Starts a query on `table` (`"users"` or `"users as u"`).
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: TableRef::parse(table),
            distinct: false,
            columns: vec![],
            joins: vec![],
            wheres: vec![],
            groups: vec![],
            havings: vec![],
            orders: vec![],
            limit: None,
            offset: None,
            lock: None,
        }
    }

    /// Replaces the select list.
    #[must_use]
    pub fn select(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|c| SelectItem::parse(c)).collect();
        self
    }

    /// Appends to the select list.
    #[must_use]
    pub fn add_select(mut self, cols: &[&str]) -> Self {
        self.columns.extend(cols.iter().map(|c| SelectItem::parse(c)));
        self
    }

    /// Appends a raw expression to the select list.
    #[must_use]
    pub fn select_raw(mut self, expr: &str) -> Self {
        self.columns.push(SelectItem::Raw(String::from(expr)));
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds an INNER JOIN on `first = second`.
    #[must_use]
    pub fn join(self, table: &str, first: &str, second: &str) -> Self {
        self.push_join(JoinKind::Inner, table, first, second)
    }

    /// Adds a LEFT JOIN on `first = second`.
    #[must_use]
    pub fn left_join(self, table: &str, first: &str, second: &str) -> Self {
        self.push_join(JoinKind::Left, table, first, second)
    }

    /// Adds a RIGHT JOIN on `first = second`.
    #[must_use]
    pub fn right_join(self, table: &str, first: &str, second: &str) -> Self {
        self.push_join(JoinKind::Right, table, first, second)
    }

    /// Adds a join with an arbitrary condition.
    #[must_use]
    pub fn join_on(mut self, kind: JoinKind, table: &str, on: Predicate) -> Self {
        self.joins.push(Join {
            kind,
            table: TableRef::parse(table),
            on: Some(on),
        });
        self
    }

    /// Adds a CROSS JOIN.
    #[must_use]
    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Cross,
            table: TableRef::parse(table),
            on: None,
        });
        self
    }

    fn push_join(mut self, kind: JoinKind, table: &str, first: &str, second: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: TableRef::parse(table),
            on: Some(Column::parse(first).eq_col(second)),
        });
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

    /// Adds GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.groups.extend(cols.iter().map(|c| Column::parse(c)));
        self
    }

    /// Adds a HAVING predicate joined with AND.
    #[must_use]
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.havings.push(WhereClause {
            conjunction: Conjunction::And,
            predicate,
        });
        self
    }

    /// Adds an ascending ORDER BY column.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: Column::parse(column),
            direction: Direction::Asc,
        });
        self
    }

    /// Adds a descending ORDER BY column.
    #[must_use]
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: Column::parse(column),
            direction: Direction::Desc,
        });
        self
    }

    /// Orders rows randomly.
    #[must_use]
    pub fn in_random_order(mut self) -> Self {
        self.orders.push(Order::Random);
        self
    }

    /// Adds a raw ORDER BY expression.
    #[must_use]
    pub fn order_by_raw(mut self, expr: &str) -> Self {
        self.orders.push(Order::Raw(String::from(expr)));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Sets the row lock.
    #[must_use]
    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Shorthand for `FOR UPDATE`.
    #[must_use]
    pub fn lock_for_update(self) -> Self {
        self.lock(Lock::for_update())
    }

    /// Shorthand for `FOR SHARE`.
    #[must_use]
    pub fn shared_lock(self) -> Self {
        self.lock(Lock::with_strength(LockStrength::Share))
    }

    /// Returns whether rows are aggregated (DISTINCT, GROUP BY or HAVING),
    /// in which case row locks cannot apply.
    #[must_use]
    pub fn is_aggregated(&self) -> bool {
        self.distinct || !self.groups.is_empty() || !self.havings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::col;

    #[test]
    fn table_alias_forms() {
        assert_eq!(TableRef::parse("users"), TableRef {
            name: String::from("users"),
            alias: None
        });
        assert_eq!(TableRef::parse("users u"), TableRef::aliased("users", "u"));
        assert_eq!(TableRef::parse("users AS u"), TableRef::aliased("users", "u"));
    }

    #[test]
    fn select_item_forms() {
        assert_eq!(SelectItem::parse("*"), SelectItem::All);
        assert_eq!(SelectItem::parse("u.*"), SelectItem::AllFrom(String::from("u")));
        assert_eq!(
            SelectItem::parse("u.name as author"),
            SelectItem::Column {
                column: Column::qualified("u", "name"),
                alias: Some(String::from("author")),
            }
        );
    }

    #[test]
    fn builder_keeps_predicate_order() {
        let query = Query::table("users")
            .where_clause(col("b").eq(2))
            .or_where(col("a").eq(1));
        assert_eq!(query.wheres.len(), 2);
        assert_eq!(query.wheres[0].predicate, col("b").eq(2));
        assert_eq!(query.wheres[1].conjunction, Conjunction::Or);
    }

    #[test]
    fn aggregation_detection() {
        assert!(!Query::table("t").is_aggregated());
        assert!(Query::table("t").distinct().is_aggregated());
        assert!(Query::table("t").group_by(&["a"]).is_aggregated());
    }
}
