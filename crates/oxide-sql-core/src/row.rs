//! Raw result rows.
//!
//! Drivers hand back rows in different shapes: key/value maps, JSON
//! objects, typed records. Everything that normalises rows goes through
//! [`RowAccess`], the single capability of looking a field up by name, so
//! every shape is handled identically.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Field lookup by column name.
pub trait RowAccess {
    /// Returns the value of `name`, or `None` when the row has no such field.
    fn field(&self, name: &str) -> Option<SqlValue>;
}

impl<S: BuildHasher> RowAccess for HashMap<String, SqlValue, S> {
    fn field(&self, name: &str) -> Option<SqlValue> {
        self.get(name).cloned()
    }
}

impl RowAccess for BTreeMap<String, SqlValue> {
    fn field(&self, name: &str) -> Option<SqlValue> {
        self.get(name).cloned()
    }
}

impl RowAccess for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<SqlValue> {
        self.get(name).cloned().map(SqlValue::from)
    }
}

/// Only JSON objects have fields.
impl RowAccess for serde_json::Value {
    fn field(&self, name: &str) -> Option<SqlValue> {
        self.as_object().and_then(|object| object.field(name))
    }
}

impl<T: RowAccess + ?Sized> RowAccess for &T {
    fn field(&self, name: &str) -> Option<SqlValue> {
        (**self).field(name)
    }
}

impl<T: RowAccess + ?Sized> RowAccess for Box<T> {
    fn field(&self, name: &str) -> Option<SqlValue> {
        (**self).field(name)
    }
}

/// A typed row of a column-listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnListingRecord {
    /// Column name.
    pub column_name: String,
}

impl ColumnListingRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }
}

impl RowAccess for ColumnListingRecord {
    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "column_name" => Some(SqlValue::Text(self.column_name.clone())),
            _ => None,
        }
    }
}

/// An ordered collection of rows, accessible through trait objects so
/// processors stay object-safe.
pub trait RowSet {
    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns the row at `index`.
    fn row(&self, index: usize) -> Option<&dyn RowAccess>;
}

impl<R: RowAccess> RowSet for [R] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<&dyn RowAccess> {
        self.get(index).map(|r| r as &dyn RowAccess)
    }
}

impl<R: RowAccess> RowSet for Vec<R> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<&dyn RowAccess> {
        self.get(index).map(|r| r as &dyn RowAccess)
    }
}

impl<R: RowAccess, const N: usize> RowSet for [R; N] {
    fn row_count(&self) -> usize {
        N
    }

    fn row(&self, index: usize) -> Option<&dyn RowAccess> {
        self.get(index).map(|r| r as &dyn RowAccess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mapping_and_object_rows_agree() {
        let mut map = HashMap::new();
        map.insert(String::from("column_name"), SqlValue::Text(String::from("id")));
        let object = json!({ "column_name": "id" });
        let record = ColumnListingRecord::new("id");

        assert_eq!(map.field("column_name"), object.field("column_name"));
        assert_eq!(record.field("column_name"), object.field("column_name"));
        assert_eq!(object.field("missing"), None);
    }

    #[test]
    fn non_objects_have_no_fields() {
        assert_eq!(json!(["id"]).field("column_name"), None);
    }

    #[test]
    fn row_sets_index_rows() {
        let rows = vec![ColumnListingRecord::new("a"), ColumnListingRecord::new("b")];
        assert_eq!(rows.row_count(), 2);
        assert_eq!(
            rows.row(1).and_then(|r| r.field("column_name")),
            Some(SqlValue::Text(String::from("b")))
        );
        assert!(rows.row(2).is_none());
    }
}
