//! INSERT statements, including conflict handling.

use crate::value::{SqlValue, ToSqlValue};

/// What to do when an inserted row collides with an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// Keep the existing row.
    DoNothing,
    /// Overwrite these columns with the incoming values.
    Update(Vec<String>),
}

/// An `ON CONFLICT` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict {
    /// Conflict target columns; empty means any constraint.
    pub target: Vec<String>,
    /// Resolution.
    pub action: ConflictAction,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target table.
    pub table: String,
    /// Declared columns.
    pub columns: Vec<String>,
    /// Rows; each must have one value per declared column.
    pub rows: Vec<Vec<SqlValue>>,
    /// Conflict handling.
    pub on_conflict: Option<OnConflict>,
    /// Replace rows that collide on the primary key.
    pub replace: bool,
    /// Columns to return.
    pub returning: Vec<String>,
}

impl Insert {
    /// Starts an INSERT into `table`.
    #[must_use]
    pub fn into(table: &str) -> Self {
        Self {
            table: String::from(table),
            columns: vec![],
            rows: vec![],
            on_conflict: None,
            replace: false,
            returning: vec![],
        }
    }

    /// Declares the inserted columns.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Appends one row of values.
    #[must_use]
    pub fn values(mut self, row: Vec<SqlValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Appends one row built from anything convertible to a SQL value.
    #[must_use]
    pub fn row<T: ToSqlValue>(self, row: Vec<T>) -> Self {
        self.values(row.into_iter().map(ToSqlValue::to_sql_value).collect())
    }

    /// On conflict with `target`, update `columns` from the incoming row.
    #[must_use]
    pub fn on_conflict_update(mut self, target: &[&str], columns: &[&str]) -> Self {
        self.on_conflict = Some(OnConflict {
            target: to_strings(target),
            action: ConflictAction::Update(to_strings(columns)),
        });
        self
    }

    /// On conflict with `target`, keep the existing row.
    #[must_use]
    pub fn on_conflict_do_nothing(mut self, target: &[&str]) -> Self {
        self.on_conflict = Some(OnConflict {
            target: to_strings(target),
            action: ConflictAction::DoNothing,
        });
        self
    }

    /// Ignores rows that collide with any constraint.
    #[must_use]
    pub fn or_ignore(self) -> Self {
        self.on_conflict_do_nothing(&[])
    }

    /// Replaces rows that collide on the primary key.
    #[must_use]
    pub const fn replace(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Adds a RETURNING clause.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = to_strings(cols);
        self
    }
}

pub(crate) fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| String::from(*s)).collect()
}
