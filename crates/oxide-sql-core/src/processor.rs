//! Result processing: turns raw catalog rows into typed records.

use crate::catalog::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor, ViewDescriptor,
};
use crate::error::{Result, TranslationError};
use crate::row::{RowAccess, RowSet};
use crate::schema::ForeignKeyAction;
use crate::value::SqlValue;

/// Normalises raw result rows for one dialect.
///
/// Every method accepts any [`RowSet`], so mapping-backed and object-backed
/// rows produce identical output.
pub trait Processor: Send + Sync {
    /// Extracts `column_name` from each row, keeping the database's order.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] when a row lacks a textual
    /// `column_name` field.
    fn process_column_listing(&self, rows: &dyn RowSet) -> Result<Vec<String>> {
        each_row(rows, |index, row| text_field(row, index, "column_name"))
    }

    /// Builds column descriptors from `column_name`, `data_type`,
    /// `is_nullable`, `column_default` and `ordinal_position`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] for rows missing a field.
    fn process_columns(&self, rows: &dyn RowSet) -> Result<Vec<ColumnDescriptor>> {
        each_row(rows, |index, row| {
            let nullable = row
                .field("is_nullable")
                .and_then(|v| self.parse_flag(&v))
                .ok_or_else(|| malformed(index, "is_nullable"))?;
            let default = optional_text(row, "column_default").map(|d| self.normalize_default(&d));
            let ordinal = row
                .field("ordinal_position")
                .and_then(|v| v.as_i64())
                .unwrap_or_else(|| i64::try_from(index + 1).unwrap_or(i64::MAX));
            Ok(ColumnDescriptor {
                name: text_field(row, index, "column_name")?,
                data_type: self.normalize_type(&text_field(row, index, "data_type")?),
                nullable,
                default,
                ordinal,
            })
        })
    }

    /// Builds table descriptors from `table_name` and `table_schema`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] for rows missing a field.
    fn process_tables(&self, rows: &dyn RowSet) -> Result<Vec<TableDescriptor>> {
        each_row(rows, |index, row| {
            Ok(TableDescriptor {
                name: text_field(row, index, "table_name")?,
                schema: text_field(row, index, "table_schema")?,
            })
        })
    }

    /// Builds view descriptors from `table_name`, `table_schema` and
    /// `view_definition`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] for rows missing a field.
    fn process_views(&self, rows: &dyn RowSet) -> Result<Vec<ViewDescriptor>> {
        each_row(rows, |index, row| {
            Ok(ViewDescriptor {
                name: text_field(row, index, "table_name")?,
                schema: text_field(row, index, "table_schema")?,
                definition: optional_text(row, "view_definition"),
            })
        })
    }

    /// Groups per-column index rows (`index_name`, `column_name`,
    /// `non_unique`, `seq_in_index`, `is_primary`) into index descriptors.
    ///
    /// Indexes keep the order in which they first appear; columns are
    /// ordered by `seq_in_index`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] for rows missing a field.
    fn process_indexes(&self, rows: &dyn RowSet) -> Result<Vec<IndexDescriptor>> {
        let mut indexes: Vec<(IndexDescriptor, Vec<(i64, String)>)> = vec![];
        for index in 0..rows.row_count() {
            let row = rows.row(index).ok_or_else(|| malformed(index, "index_name"))?;
            let name = text_field(row, index, "index_name")?;
            let column = text_field(row, index, "column_name")?;
            let non_unique = row
                .field("non_unique")
                .and_then(|v| self.parse_flag(&v))
                .ok_or_else(|| malformed(index, "non_unique"))?;
            let primary = row
                .field("is_primary")
                .and_then(|v| self.parse_flag(&v))
                .unwrap_or(false);
            let seq = row.field("seq_in_index").and_then(|v| v.as_i64()).unwrap_or(0);

            let position = indexes.iter().position(|(d, _)| d.name == name);
            let entry = match position {
                Some(i) => &mut indexes[i],
                None => {
                    indexes.push((
                        IndexDescriptor {
                            name,
                            columns: vec![],
                            unique: !non_unique,
                            primary,
                        },
                        vec![],
                    ));
                    let last = indexes.len() - 1;
                    &mut indexes[last]
                }
            };
            entry.1.push((seq, column));
        }
        Ok(indexes
            .into_iter()
            .map(|(mut descriptor, mut columns)| {
                columns.sort_by_key(|(seq, _)| *seq);
                descriptor.columns = columns.into_iter().map(|(_, c)| c).collect();
                descriptor
            })
            .collect())
    }

    /// Groups per-column foreign key rows (`constraint_name`, `column_name`,
    /// `foreign_table`, `foreign_column`, `update_rule`, `delete_rule`) into
    /// foreign key descriptors, keeping row order.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] for rows missing a field.
    fn process_foreign_keys(&self, rows: &dyn RowSet) -> Result<Vec<ForeignKeyDescriptor>> {
        let mut keys: Vec<ForeignKeyDescriptor> = vec![];
        for index in 0..rows.row_count() {
            let row = rows
                .row(index)
                .ok_or_else(|| malformed(index, "constraint_name"))?;
            let name = text_field(row, index, "constraint_name")?;
            let column = text_field(row, index, "column_name")?;
            let foreign_column = text_field(row, index, "foreign_column")?;
            if let Some(key) = keys.iter_mut().find(|k| k.name == name) {
                key.columns.push(column);
                key.foreign_columns.push(foreign_column);
                continue;
            }
            keys.push(ForeignKeyDescriptor {
                name,
                columns: vec![column],
                foreign_table: text_field(row, index, "foreign_table")?,
                foreign_columns: vec![foreign_column],
                on_update: optional_text(row, "update_rule")
                    .and_then(|r| ForeignKeyAction::parse(&r)),
                on_delete: optional_text(row, "delete_rule")
                    .and_then(|r| ForeignKeyAction::parse(&r)),
            });
        }
        Ok(keys)
    }

    /// Reads the generated key of an `INSERT .. RETURNING` result.
    ///
    /// Returns `None` when no row came back.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedRow`] when the returned row has
    /// no integer `column` field.
    fn process_insert_get_id(&self, rows: &dyn RowSet, column: &str) -> Result<Option<i64>> {
        match rows.row(0) {
            None => Ok(None),
            Some(row) => row
                .field(column)
                .and_then(|v| v.as_i64())
                .map(Some)
                .ok_or_else(|| malformed(0, column)),
        }
    }

    /// Interprets a catalog flag. Accepts booleans, `YES`/`NO`,
    /// `true`/`false` and `1`/`0`.
    fn parse_flag(&self, value: &SqlValue) -> Option<bool> {
        match value {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(n) => Some(*n != 0),
            SqlValue::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "YES" | "TRUE" | "T" | "1" => Some(true),
                "NO" | "FALSE" | "F" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Cleans up a reported default expression.
    fn normalize_default(&self, raw: &str) -> String {
        String::from(raw)
    }

    /// Cleans up a reported type name.
    fn normalize_type(&self, raw: &str) -> String {
        String::from(raw)
    }
}

fn each_row<T>(
    rows: &dyn RowSet,
    mut f: impl FnMut(usize, &dyn RowAccess) -> Result<T>,
) -> Result<Vec<T>> {
    (0..rows.row_count())
        .map(|index| {
            let row = rows.row(index).ok_or_else(|| malformed(index, "row"))?;
            f(index, row)
        })
        .collect()
}

fn text_field(row: &dyn RowAccess, index: usize, name: &str) -> Result<String> {
    match row.field(name) {
        Some(SqlValue::Text(s)) => Ok(s),
        _ => Err(malformed(index, name)),
    }
}

fn optional_text(row: &dyn RowAccess, name: &str) -> Option<String> {
    match row.field(name) {
        Some(SqlValue::Text(s)) => Some(s),
        _ => None,
    }
}

fn malformed(row: usize, field: &str) -> TranslationError {
    TranslationError::MalformedRow {
        row,
        field: String::from(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Plain;

    impl Processor for Plain {}

    #[test]
    fn column_listing_from_json_rows() {
        let rows = vec![json!({ "column_name": "id" }), json!({ "column_name": "name" })];
        assert_eq!(Plain.process_column_listing(&rows).unwrap(), vec!["id", "name"]);
    }

    #[test]
    fn column_listing_rejects_missing_field() {
        let rows = vec![json!({ "column_name": "id" }), json!({ "name": "x" })];
        assert_eq!(
            Plain.process_column_listing(&rows),
            Err(TranslationError::MalformedRow {
                row: 1,
                field: String::from("column_name")
            })
        );
    }

    #[test]
    fn indexes_are_grouped_and_ordered() {
        let rows = vec![
            json!({ "index_name": "primary", "column_name": "id", "non_unique": "NO", "seq_in_index": 1, "is_primary": true }),
            json!({ "index_name": "by_name", "column_name": "last", "non_unique": "YES", "seq_in_index": 2 }),
            json!({ "index_name": "by_name", "column_name": "first", "non_unique": "YES", "seq_in_index": 1 }),
        ];
        let indexes = Plain.process_indexes(&rows).unwrap();
        assert_eq!(indexes.len(), 2);
        assert!(indexes[0].primary && indexes[0].unique);
        assert_eq!(indexes[1].columns, vec!["first", "last"]);
        assert!(!indexes[1].unique);
    }

    #[test]
    fn foreign_keys_are_grouped() {
        let rows = vec![
            json!({ "constraint_name": "fk", "column_name": "a", "foreign_table": "t", "foreign_column": "x", "delete_rule": "CASCADE" }),
            json!({ "constraint_name": "fk", "column_name": "b", "foreign_table": "t", "foreign_column": "y", "delete_rule": "CASCADE" }),
        ];
        let keys = Plain.process_foreign_keys(&rows).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].columns, vec!["a", "b"]);
        assert_eq!(keys[0].foreign_columns, vec!["x", "y"]);
        assert_eq!(keys[0].on_delete, Some(ForeignKeyAction::Cascade));
        assert_eq!(keys[0].on_update, None);
    }

    #[test]
    fn insert_id_read_from_first_row() {
        let rows = vec![json!({ "id": 42 })];
        assert_eq!(Plain.process_insert_get_id(&rows, "id").unwrap(), Some(42));
        let empty: Vec<serde_json::Value> = vec![];
        assert_eq!(Plain.process_insert_get_id(&empty, "id").unwrap(), None);
    }
}
