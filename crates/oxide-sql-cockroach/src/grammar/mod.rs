//! CockroachDB grammars.

mod query;
mod schema;
pub mod types;

pub use query::CockroachQueryGrammar;
pub use schema::CockroachSchemaGrammar;
