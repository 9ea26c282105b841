//! SQL values and parameter handling.
//!
//! Values travel next to the SQL text as bound parameters. Inline rendering
//! exists for DDL defaults and debugging output only.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A SQL value that can be bound as a parameter or read back from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
    /// JSON document.
    Json(serde_json::Value),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
    /// Timestamp with time zone, normalised to UTC.
    TimestampTz(DateTime<Utc>),
}

impl SqlValue {
    /// Returns the SQL literal for inline use (escaped).
    ///
    /// **Warning**: Prefer bound parameters; this is meant for DDL defaults
    /// and for printing statements.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => quote_literal(s),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("'\\x{hex}'")
            }
            Self::Json(v) => quote_literal(&v.to_string()),
            Self::Date(d) => quote_literal(&d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(ts) => quote_literal(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Self::TimestampTz(ts) => {
                quote_literal(&ts.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string())
            }
        }
    }

    /// Returns the value as a string slice when it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer when it is one, or text holding one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns whether the value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Quotes a string literal, doubling embedded single quotes.
#[must_use]
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_int_value {
    ($($t:ty),*) => {
        $(
            impl ToSqlValue for $t {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

impl_int_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Json(self)
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Date(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::TimestampTz(self)
    }
}

impl From<serde_json::Value> for SqlValue {
    /// Maps JSON scalars onto their SQL counterparts; arrays and objects stay JSON.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_scalars() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
    }

    #[test]
    fn inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
        let escaped = SqlValue::Text(String::from("'; DROP TABLE users; --")).to_sql_inline();
        assert_eq!(escaped, "'''; DROP TABLE users; --'");
    }

    #[test]
    fn inline_bytes_use_hex_escape() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "'\\x4849'"
        );
    }

    #[test]
    fn inline_dates() {
        let date = NaiveDate::from_ymd_opt(2019, 10, 1).unwrap();
        assert_eq!(date.to_sql_value().to_sql_inline(), "'2019-10-01'");
        let ts = date.and_hms_opt(10, 15, 20).unwrap();
        assert_eq!(ts.to_sql_value().to_sql_inline(), "'2019-10-01 10:15:20'");
    }

    #[test]
    fn conversions() {
        assert_eq!(42_u32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some("a").to_sql_value(), SqlValue::Text(String::from("a")));
        assert_eq!(
            SqlValue::from(serde_json::json!("id")),
            SqlValue::Text(String::from("id"))
        );
        assert_eq!(SqlValue::from(serde_json::json!(7)), SqlValue::Int(7));
    }

    #[test]
    fn integer_accessor_reads_numeric_text() {
        assert_eq!(SqlValue::Text(String::from(" 12 ")).as_i64(), Some(12));
        assert_eq!(SqlValue::Bool(true).as_i64(), None);
    }
}
