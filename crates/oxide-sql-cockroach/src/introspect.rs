//! Catalog introspection.

use oxide_sql_core::catalog::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor, ViewDescriptor,
};

use crate::connector::CockroachConnection;
use crate::error::Result;

/// Reads table, column, index and foreign key metadata from the catalog.
///
/// Table names may be schema-qualified (`app.users`); unqualified names
/// resolve against the first entry of the connection's search path.
/// Database errors are returned as they come, without retries.
#[derive(Debug)]
pub struct CatalogIntrospector<'c> {
    connection: &'c mut CockroachConnection,
}

impl<'c> CatalogIntrospector<'c> {
    /// Creates an introspector over `connection`.
    pub fn new(connection: &'c mut CockroachConnection) -> Self {
        Self { connection }
    }

    /// Returns the database (catalog) being inspected.
    #[must_use]
    pub fn catalog(&self) -> &str {
        &self.connection.config().database
    }

    fn locate(&self, table: &str) -> (String, String) {
        match table.rsplit_once('.') {
            Some((schema, name)) => (String::from(schema), String::from(name)),
            None => (
                String::from(self.connection.config().default_schema()),
                String::from(table),
            ),
        }
    }

    /// Returns the visible column names of `table`, in catalog order.
    ///
    /// An unknown or column-less table yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn list_columns(&mut self, table: &str) -> Result<Vec<String>> {
        let (schema, name) = self.locate(table);
        let set = self.connection.dialect_set().clone();
        let statement = set
            .schema_grammar
            .compile_column_listing(self.catalog(), &schema, &name);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_column_listing(&rows)?)
    }

    /// Describes the visible columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let (schema, name) = self.locate(table);
        let set = self.connection.dialect_set().clone();
        let statement = set
            .schema_grammar
            .compile_columns(self.catalog(), &schema, &name);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_columns(&rows)?)
    }

    /// Lists base tables in `schema`, or the default schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn list_tables(&mut self, schema: Option<&str>) -> Result<Vec<TableDescriptor>> {
        let schema = self.schema_or_default(schema);
        let set = self.connection.dialect_set().clone();
        let statement = set.schema_grammar.compile_tables(self.catalog(), &schema);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_tables(&rows)?)
    }

    /// Lists views in `schema`, or the default schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn list_views(&mut self, schema: Option<&str>) -> Result<Vec<ViewDescriptor>> {
        let schema = self.schema_or_default(schema);
        let set = self.connection.dialect_set().clone();
        let statement = set.schema_grammar.compile_views(self.catalog(), &schema);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_views(&rows)?)
    }

    /// Lists the indexes of `table`, including the primary index.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn list_indexes(&mut self, table: &str) -> Result<Vec<IndexDescriptor>> {
        let (schema, name) = self.locate(table);
        let set = self.connection.dialect_set().clone();
        let statement = set
            .schema_grammar
            .compile_indexes(self.catalog(), &schema, &name);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_indexes(&rows)?)
    }

    /// Lists the foreign keys declared on `table`.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or a row is malformed.
    pub async fn list_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyDescriptor>> {
        let (schema, name) = self.locate(table);
        let set = self.connection.dialect_set().clone();
        let statement = set
            .schema_grammar
            .compile_foreign_keys(self.catalog(), &schema, &name);
        let rows = self.connection.fetch_all(&statement).await?;
        Ok(set.processor.process_foreign_keys(&rows)?)
    }

    /// Returns whether `table` exists as a base table.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn has_table(&mut self, table: &str) -> Result<bool> {
        let (schema, name) = self.locate(table);
        let tables = self.list_tables(Some(&schema)).await?;
        Ok(tables.iter().any(|t| t.name == name))
    }

    /// Returns whether `table` has a visible column named `column`.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn has_column(&mut self, table: &str, column: &str) -> Result<bool> {
        let columns = self.list_columns(table).await?;
        Ok(columns.iter().any(|c| c == column))
    }

    fn schema_or_default(&self, schema: Option<&str>) -> String {
        String::from(schema.unwrap_or_else(|| self.connection.config().default_schema()))
    }
}
