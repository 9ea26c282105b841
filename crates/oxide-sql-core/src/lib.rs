//! # oxide-sql-core
//!
//! Dialect-agnostic building blocks for talking to SQL databases.
//!
//! This crate provides:
//! - A Query Expression Tree ([`query`]) built with a fluent API
//! - Schema operations and column definitions ([`schema`])
//! - Grammar traits that render both into dialect SQL ([`grammar`])
//! - Row access and result processing for catalog queries ([`row`], [`processor`])
//! - A registry keyed by dialect name ([`registry`])
//!
//! Nothing here talks to a database. Dialect crates implement the grammar
//! traits and bring the driver.
//!
//! ## Building and compiling a query
//!
//! ```rust
//! use oxide_sql_core::grammar::{GenericGrammar, QueryGrammar};
//! use oxide_sql_core::query::{col, Query};
//!
//! let query = Query::table("users")
//!     .select(&["id", "name"])
//!     .where_clause(col("name").eq("'; DROP TABLE users; --"));
//! let compiled = GenericGrammar::new().compile(&query.into()).unwrap();
//!
//! assert_eq!(compiled.sql, r#"SELECT "id", "name" FROM "users" WHERE "name" = ?"#);
//! assert_eq!(compiled.params.len(), 1);
//! ```
//!
//! Values are always bound as parameters; they never appear in the SQL text.

pub mod catalog;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod processor;
pub mod query;
pub mod registry;
pub mod row;
pub mod schema;
pub mod value;

pub use catalog::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor, ViewDescriptor,
};
pub use dialect::{Dialect, GenericDialect, LockSupport};
pub use error::{RegistryError, Result, TranslationError};
pub use grammar::{CompiledStatement, GenericGrammar, QueryGrammar, SchemaGrammar};
pub use processor::Processor;
pub use query::{col, Query, Statement};
pub use registry::{DialectRegistry, DialectSet};
pub use row::{RowAccess, RowSet};
pub use schema::Operation;
pub use value::{SqlValue, ToSqlValue};
