//! Abstract column type to CockroachDB type mapping.

use oxide_sql_core::schema::ColumnType;

/// Returns the CockroachDB spelling of `column_type`.
///
/// CockroachDB has no unsigned integers, inline enumerations or MAC address
/// type. Those map to the closest type; unsigned and enumeration columns get
/// CHECK constraints from the schema grammar.
#[must_use]
pub fn type_name(column_type: &ColumnType) -> String {
    match column_type {
        ColumnType::TinyInteger | ColumnType::SmallInteger => "INT2".to_string(),
        ColumnType::Integer | ColumnType::Year => "INT4".to_string(),
        ColumnType::BigInteger => "INT8".to_string(),
        ColumnType::Float => "FLOAT4".to_string(),
        ColumnType::Double => "FLOAT8".to_string(),
        ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
        ColumnType::Boolean => "BOOL".to_string(),
        ColumnType::Char(n) => format!("CHAR({n})"),
        ColumnType::String(n) => format!("VARCHAR({n})"),
        ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "STRING".to_string(),
        ColumnType::Json | ColumnType::Jsonb => "JSONB".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Time => "TIME".to_string(),
        ColumnType::TimeTz => "TIMETZ".to_string(),
        ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
        ColumnType::DateTimeTz | ColumnType::TimestampTz => "TIMESTAMPTZ".to_string(),
        ColumnType::Binary => "BYTES".to_string(),
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::IpAddress => "INET".to_string(),
        ColumnType::MacAddress => "VARCHAR(17)".to_string(),
        ColumnType::Enum(_) => "VARCHAR(255)".to_string(),
        ColumnType::Geometry => "GEOMETRY".to_string(),
        ColumnType::Geography => "GEOGRAPHY".to_string(),
        ColumnType::Custom(raw) => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(type_name(&ColumnType::TinyInteger), "INT2");
        assert_eq!(type_name(&ColumnType::SmallInteger), "INT2");
        assert_eq!(type_name(&ColumnType::Integer), "INT4");
        assert_eq!(type_name(&ColumnType::BigInteger), "INT8");
    }

    #[test]
    fn text_and_json() {
        assert_eq!(type_name(&ColumnType::String(255)), "VARCHAR(255)");
        assert_eq!(type_name(&ColumnType::LongText), "STRING");
        assert_eq!(type_name(&ColumnType::Json), "JSONB");
    }

    #[test]
    fn temporal() {
        assert_eq!(type_name(&ColumnType::DateTime), "TIMESTAMP");
        assert_eq!(type_name(&ColumnType::TimestampTz), "TIMESTAMPTZ");
        assert_eq!(type_name(&ColumnType::TimeTz), "TIMETZ");
        assert_eq!(type_name(&ColumnType::Year), "INT4");
    }

    #[test]
    fn types_without_native_equivalent() {
        assert_eq!(type_name(&ColumnType::MacAddress), "VARCHAR(17)");
        assert_eq!(
            type_name(&ColumnType::Enum(vec![String::from("a")])),
            "VARCHAR(255)"
        );
        assert_eq!(type_name(&ColumnType::Binary), "BYTES");
    }

    #[test]
    fn decimal_and_custom() {
        assert_eq!(
            type_name(&ColumnType::Decimal {
                precision: 10,
                scale: 2
            }),
            "DECIMAL(10, 2)"
        );
        assert_eq!(type_name(&ColumnType::Custom(String::from("INT8[]"))), "INT8[]");
    }
}
