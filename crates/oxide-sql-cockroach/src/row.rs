//! Driver rows and parameter binding.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use oxide_sql_core::row::RowAccess;
use oxide_sql_core::value::SqlValue;
use sqlx::postgres::types::{Oid, PgTimeTz};
use sqlx::postgres::{PgArguments, PgRow, PgValueFormat, PgValueRef};
use sqlx::query::Query;
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::types::{Decimal, Uuid};
use sqlx::{Postgres, Row, TypeInfo, ValueRef};

/// A driver row, readable through [`RowAccess`].
#[derive(Debug)]
pub struct CockroachRow(pub PgRow);

impl From<PgRow> for CockroachRow {
    fn from(row: PgRow) -> Self {
        Self(row)
    }
}

impl CockroachRow {
    /// Returns the underlying driver row.
    #[must_use]
    pub fn into_inner(self) -> PgRow {
        self.0
    }
}

impl RowAccess for CockroachRow {
    fn field(&self, name: &str) -> Option<SqlValue> {
        let raw = self.0.try_get_raw(name).ok()?;
        if raw.is_null() {
            return Some(SqlValue::Null);
        }
        let decoding = Decoding::for_type(raw.type_info().name());
        self.decode(name, decoding).or_else(|| undecoded(&raw))
    }
}

/// How a value of a given server type is read into a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoding {
    Bool,
    Int2,
    Int4,
    Int8,
    Oid,
    Float4,
    Float8,
    Numeric,
    Bytes,
    Json,
    Uuid,
    Inet,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Text,
}

impl Decoding {
    fn for_type(type_name: &str) -> Self {
        match type_name.to_ascii_uppercase().as_str() {
            "BOOL" => Self::Bool,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "OID" => Self::Oid,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            "NUMERIC" => Self::Numeric,
            "BYTEA" => Self::Bytes,
            "JSON" | "JSONB" => Self::Json,
            "UUID" => Self::Uuid,
            "INET" | "CIDR" => Self::Inet,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMETZ" => Self::TimeTz,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            _ => Self::Text,
        }
    }
}

impl CockroachRow {
    fn decode(&self, name: &str, decoding: Decoding) -> Option<SqlValue> {
        let row = &self.0;
        match decoding {
            Decoding::Bool => row.try_get::<bool, _>(name).ok().map(SqlValue::Bool),
            Decoding::Int2 => row
                .try_get::<i16, _>(name)
                .ok()
                .map(|v| SqlValue::Int(i64::from(v))),
            Decoding::Int4 => row
                .try_get::<i32, _>(name)
                .ok()
                .map(|v| SqlValue::Int(i64::from(v))),
            Decoding::Int8 => row.try_get::<i64, _>(name).ok().map(SqlValue::Int),
            Decoding::Oid => row
                .try_get::<Oid, _>(name)
                .ok()
                .map(|v| SqlValue::Int(i64::from(v.0))),
            Decoding::Float4 => row
                .try_get::<f32, _>(name)
                .ok()
                .map(|v| SqlValue::Float(f64::from(v))),
            Decoding::Float8 => row.try_get::<f64, _>(name).ok().map(SqlValue::Float),
            Decoding::Numeric => text(row.try_get::<Decimal, _>(name)),
            Decoding::Bytes => row.try_get::<Vec<u8>, _>(name).ok().map(SqlValue::Blob),
            Decoding::Json => row
                .try_get::<serde_json::Value, _>(name)
                .ok()
                .map(SqlValue::Json),
            Decoding::Uuid => text(row.try_get::<Uuid, _>(name)),
            Decoding::Inet => text(row.try_get::<IpNetwork, _>(name)),
            Decoding::Date => row.try_get::<NaiveDate, _>(name).ok().map(SqlValue::Date),
            Decoding::Time => text(row.try_get::<NaiveTime, _>(name)),
            Decoding::TimeTz => row
                .try_get::<PgTimeTz<NaiveTime, FixedOffset>, _>(name)
                .ok()
                .map(|v| SqlValue::Text(format!("{}{}", v.time, v.offset))),
            Decoding::Timestamp => row
                .try_get::<NaiveDateTime, _>(name)
                .ok()
                .map(SqlValue::Timestamp),
            Decoding::TimestampTz => row
                .try_get::<DateTime<Utc>, _>(name)
                .ok()
                .map(SqlValue::TimestampTz),
            Decoding::Text => row.try_get::<String, _>(name).ok().map(SqlValue::Text),
        }
    }
}

fn text<T: Display>(decoded: Result<T, sqlx::Error>) -> Option<SqlValue> {
    decoded.ok().map(|v| SqlValue::Text(v.to_string()))
}

/// Reads a value no typed decoder accepted: text-format values as text,
/// binary-format values as their raw bytes.
fn undecoded(raw: &PgValueRef<'_>) -> Option<SqlValue> {
    match raw.format() {
        PgValueFormat::Text => raw.as_str().ok().map(|s| SqlValue::Text(String::from(s))),
        PgValueFormat::Binary => raw.as_bytes().ok().map(|b| SqlValue::Blob(b.to_vec())),
    }
}

/// Binds one value to a query.
pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &SqlValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        // Grammars write NULL inline; this arm only serves hand-built statements.
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(n) => query.bind(*n),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Blob(b) => query.bind(b.clone()),
        SqlValue::Json(j) => query.bind(j.clone()),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::Timestamp(t) => query.bind(*t),
        SqlValue::TimestampTz(t) => query.bind(*t),
    }
}

/// Binds every parameter, in order.
pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in params {
        query = bind_value(query, value);
    }
    query
}
