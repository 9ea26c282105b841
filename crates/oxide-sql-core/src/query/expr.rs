//! Predicate expression builder.
//!
//! `col("name").eq("Alice")` produces a [`Predicate`] node rather than SQL
//! text; grammars decide how each node is rendered.

use crate::value::{SqlValue, ToSqlValue};

use super::Query;

/// Creates a column reference. `"t.name"` is qualified by `t`.
#[must_use]
pub fn col(name: &str) -> Column {
    Column::parse(name)
}

/// A column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Optional table or alias qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Parses a possibly-qualified column. The qualifier is everything before
    /// the last dot, so `public.users.id` is column `id` of `public.users`.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        match reference.rsplit_once('.') {
            Some((table, name)) => Self::qualified(table, name),
            None => Self {
                table: None,
                name: String::from(reference),
            },
        }
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Returns the dotted reference (`t.name` or `name`).
    #[must_use]
    pub fn reference(&self) -> String {
        match &self.table {
            Some(t) => format!("{t}.{}", self.name),
            None => self.name.clone(),
        }
    }

    fn compare<T: ToSqlValue>(self, op: Operator, value: T) -> Predicate {
        Predicate::Compare {
            column: self,
            op,
            operand: Operand::Value(value.to_sql_value()),
        }
    }

    /// Creates an equality predicate. Comparing with NULL renders `IS NULL`.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::Eq, value)
    }

    /// Creates an inequality predicate.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::NotEq, value)
    }

    /// Creates a less-than predicate.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::Lt, value)
    }

    /// Creates a less-than-or-equal predicate.
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::LtEq, value)
    }

    /// Creates a greater-than predicate.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::Gt, value)
    }

    /// Creates a greater-than-or-equal predicate.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Predicate {
        self.compare(Operator::GtEq, value)
    }

    /// Creates a LIKE predicate.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Predicate {
        self.compare(Operator::Like, pattern)
    }

    /// Creates a NOT LIKE predicate.
    #[must_use]
    pub fn not_like<T: ToSqlValue>(self, pattern: T) -> Predicate {
        self.compare(Operator::NotLike, pattern)
    }

    /// Creates a case-insensitive ILIKE predicate.
    #[must_use]
    pub fn ilike<T: ToSqlValue>(self, pattern: T) -> Predicate {
        self.compare(Operator::ILike, pattern)
    }

    /// Compares this column with another column.
    #[must_use]
    pub fn eq_col(self, other: &str) -> Predicate {
        self.cmp_col(Operator::Eq, other)
    }

    /// Compares this column with another column using `op`.
    #[must_use]
    pub fn cmp_col(self, op: Operator, other: &str) -> Predicate {
        Predicate::Compare {
            column: self,
            op,
            operand: Operand::Column(Column::parse(other)),
        }
    }

    /// Creates an IS NULL predicate.
    #[must_use]
    pub fn is_null(self) -> Predicate {
        Predicate::Null {
            column: self,
            negated: false,
        }
    }

    /// Creates an IS NOT NULL predicate.
    #[must_use]
    pub fn is_not_null(self) -> Predicate {
        Predicate::Null {
            column: self,
            negated: true,
        }
    }

    /// Creates a BETWEEN predicate.
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            column: self,
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN predicate.
    #[must_use]
    pub fn not_between<T: ToSqlValue, U: ToSqlValue>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            column: self,
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: true,
        }
    }

    /// Creates an IN predicate.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: Vec<T>) -> Predicate {
        Predicate::InList {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// Creates a NOT IN predicate.
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: Vec<T>) -> Predicate {
        Predicate::InList {
            column: self,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: true,
        }
    }

    /// Creates an IN (sub-query) predicate.
    #[must_use]
    pub fn in_query(self, query: Query) -> Predicate {
        Predicate::InQuery {
            column: self,
            query: Box::new(query),
            negated: false,
        }
    }

    /// Creates a NOT IN (sub-query) predicate.
    #[must_use]
    pub fn not_in_query(self, query: Query) -> Predicate {
        Predicate::InQuery {
            column: self,
            query: Box::new(query),
            negated: true,
        }
    }

    /// Creates a JSON containment predicate (the column contains `value`).
    #[must_use]
    pub fn json_contains(self, value: serde_json::Value) -> Predicate {
        Predicate::JsonContains {
            column: self,
            value: SqlValue::Json(value),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `ILIKE`
    ILike,
}

impl Operator {
    /// Returns the SQL operator text.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
        }
    }
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A bound value.
    Value(SqlValue),
    /// Another column.
    Column(Column),
}

/// A node of a WHERE / HAVING / ON expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column op operand`.
    Compare {
        /// Left-hand column.
        column: Column,
        /// Operator.
        op: Operator,
        /// Right-hand side.
        operand: Operand,
    },
    /// `column IS [NOT] NULL`.
    Null {
        /// Tested column.
        column: Column,
        /// `IS NOT NULL` when true.
        negated: bool,
    },
    /// `column [NOT] IN (v1, v2, ...)`.
    InList {
        /// Tested column.
        column: Column,
        /// Candidate values.
        values: Vec<SqlValue>,
        /// `NOT IN` when true.
        negated: bool,
    },
    /// `column [NOT] IN (SELECT ...)`.
    InQuery {
        /// Tested column.
        column: Column,
        /// Sub-query.
        query: Box<Query>,
        /// `NOT IN` when true.
        negated: bool,
    },
    /// `column [NOT] BETWEEN low AND high`.
    Between {
        /// Tested column.
        column: Column,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
        /// `NOT BETWEEN` when true.
        negated: bool,
    },
    /// `[NOT] EXISTS (SELECT ...)`.
    Exists {
        /// Sub-query.
        query: Box<Query>,
        /// `NOT EXISTS` when true.
        negated: bool,
    },
    /// JSON containment.
    JsonContains {
        /// JSON column.
        column: Column,
        /// Contained document.
        value: SqlValue,
    },
    /// Full-text match over one or more columns.
    FullText {
        /// Searched columns.
        columns: Vec<Column>,
        /// Search term.
        term: String,
    },
    /// All children must hold.
    And(Vec<Predicate>),
    /// Any child must hold.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
    /// Raw SQL with `?` markers for its parameters.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    Raw {
        /// SQL fragment.
        sql: String,
        /// Parameters, one per `?` marker.
        params: Vec<SqlValue>,
    },
}

impl Predicate {
    /// Creates a raw predicate.
    #[must_use]
    pub fn raw(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: sql.into(),
            params,
        }
    }

    /// Creates an EXISTS predicate.
    #[must_use]
    pub fn exists(query: Query) -> Self {
        Self::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    /// Creates a NOT EXISTS predicate.
    #[must_use]
    pub fn not_exists(query: Query) -> Self {
        Self::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    /// Creates a full-text predicate.
    #[must_use]
    pub fn full_text(columns: &[&str], term: impl Into<String>) -> Self {
        Self::FullText {
            columns: columns.iter().map(|c| Column::parse(c)).collect(),
            term: term.into(),
        }
    }

    /// Combines with AND, flattening nested AND nodes.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut children) => {
                children.push(other);
                Self::And(children)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Combines with OR, flattening nested OR nodes.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut children) => {
                children.push(other);
                Self::Or(children)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Negates the predicate.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Visits every column referenced by this predicate, excluding those in
    /// sub-queries.
    pub fn for_each_column<'a>(&'a self, f: &mut dyn FnMut(&'a Column)) {
        match self {
            Self::Compare {
                column, operand, ..
            } => {
                f(column);
                if let Operand::Column(other) = operand {
                    f(other);
                }
            }
            Self::Null { column, .. }
            | Self::InList { column, .. }
            | Self::InQuery { column, .. }
            | Self::Between { column, .. }
            | Self::JsonContains { column, .. } => f(column),
            Self::FullText { columns, .. } => columns.iter().for_each(|c| f(c)),
            Self::And(children) | Self::Or(children) => {
                children.iter().for_each(|c| c.for_each_column(f));
            }
            Self::Not(inner) => inner.for_each_column(f),
            Self::Exists { .. } | Self::Raw { .. } => {}
        }
    }

    /// Visits every sub-query nested in this predicate.
    pub fn for_each_subquery<'a>(&'a self, f: &mut dyn FnMut(&'a Query)) {
        match self {
            Self::InQuery { query, .. } | Self::Exists { query, .. } => f(query),
            Self::And(children) | Self::Or(children) => {
                children.iter().for_each(|c| c.for_each_subquery(f));
            }
            Self::Not(inner) => inner.for_each_subquery(f),
            _ => {}
        }
    }
}
