//! Column definitions and their fluent builder.
//!
//! ```rust
//! use oxide_sql_core::schema::{big_increments, date, string};
//!
//! let id = big_increments("id").build();
//! let email = string("email", 255).unique().build();
//! let born = date("born_on").nullable().build();
//! assert!(id.autoincrement && id.primary_key);
//! assert!(email.unique && !email.nullable);
//! assert!(born.nullable);
//! ```

use serde::{Deserialize, Serialize};

/// Abstract column types, independent of any dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// 1-byte integer.
    TinyInteger,
    /// 2-byte integer.
    SmallInteger,
    /// 4-byte integer.
    Integer,
    /// 8-byte integer.
    BigInteger,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Exact numeric.
    Decimal {
        /// Total digits.
        precision: u16,
        /// Digits after the decimal point.
        scale: u16,
    },
    /// Boolean.
    Boolean,
    /// Fixed-length string.
    Char(u32),
    /// Variable-length string with a maximum length.
    String(u32),
    /// Unbounded text.
    Text,
    /// Medium text.
    MediumText,
    /// Long text.
    LongText,
    /// JSON document.
    Json,
    /// Binary JSON document.
    Jsonb,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Time of day with time zone.
    TimeTz,
    /// Date and time.
    DateTime,
    /// Date and time with time zone.
    DateTimeTz,
    /// Timestamp.
    Timestamp,
    /// Timestamp with time zone.
    TimestampTz,
    /// Year.
    Year,
    /// Binary data.
    Binary,
    /// UUID.
    Uuid,
    /// IP address.
    IpAddress,
    /// MAC address.
    MacAddress,
    /// One of a fixed set of strings.
    Enum(Vec<String>),
    /// Planar spatial value.
    Geometry,
    /// Geodetic spatial value.
    Geography,
    /// Dialect type name passed through verbatim.
    Custom(String),
}

impl ColumnType {
    /// Returns whether this is an integer type.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInteger | Self::SmallInteger | Self::Integer | Self::BigInteger
        )
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parses a referential rule as catalogs report it (`"SET NULL"`, `"cascade"`).
    #[must_use]
    pub fn parse(rule: &str) -> Option<Self> {
        match rule.trim().to_ascii_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression (e.g., `now()`).
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => crate::value::quote_literal(s),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// A complete column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Abstract type.
    pub column_type: ColumnType,
    /// Whether the column is nullable.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether this is a primary key.
    pub primary_key: bool,
    /// Whether this column is unique.
    pub unique: bool,
    /// Whether this column auto-increments.
    pub autoincrement: bool,
    /// Whether only non-negative values are allowed.
    pub unsigned: bool,
    /// Check constraint expression, if any.
    pub check: Option<String>,
    /// Collation for string columns.
    pub collation: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a NOT NULL column definition with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            primary_key: false,
            unique: false,
            autoincrement: false,
            unsigned: false,
            check: None,
            collation: None,
            comment: None,
        }
    }
}

/// Fluent column definition builder.
///
/// Columns are NOT NULL unless [`nullable`](Self::nullable) is called, as in
/// most schema builders.
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    def: ColumnDefinition,
}

impl ColumnBuilder {
    /// Creates a new column builder with name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            def: ColumnDefinition::new(name, column_type),
        }
    }

    /// Marks the column as NOT NULL (default).
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.def.nullable = false;
        self
    }

    /// Marks the column as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.def.nullable = true;
        self
    }

    /// Marks the column as PRIMARY KEY.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.def.primary_key = true;
        self.def.nullable = false; // Primary keys are implicitly NOT NULL
        self
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.def.unique = true;
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub const fn autoincrement(mut self) -> Self {
        self.def.autoincrement = true;
        self
    }

    /// Restricts the column to non-negative values.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.def.unsigned = true;
        self
    }

    /// Sets a boolean default value.
    #[must_use]
    pub fn default_bool(mut self, value: bool) -> Self {
        self.def.default = Some(DefaultValue::Boolean(value));
        self
    }

    /// Sets an integer default value.
    #[must_use]
    pub fn default_int(mut self, value: i64) -> Self {
        self.def.default = Some(DefaultValue::Integer(value));
        self
    }

    /// Sets a float default value.
    #[must_use]
    pub fn default_float(mut self, value: f64) -> Self {
        self.def.default = Some(DefaultValue::Float(value));
        self
    }

    /// Sets a string default value.
    #[must_use]
    pub fn default_str(mut self, value: impl Into<String>) -> Self {
        self.def.default = Some(DefaultValue::String(value.into()));
        self
    }

    /// Sets a NULL default value.
    #[must_use]
    pub fn default_null(mut self) -> Self {
        self.def.default = Some(DefaultValue::Null);
        self
    }

    /// Sets a raw SQL expression as default (e.g., `now()`).
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.def.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    /// Adds a CHECK constraint.
    #[must_use]
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.def.check = Some(expr.into());
        self
    }

    /// Sets the collation for string columns.
    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.def.collation = Some(collation.into());
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.def.comment = Some(comment.into());
        self
    }

    /// Builds the column definition.
    #[must_use]
    pub fn build(self) -> ColumnDefinition {
        self.def
    }
}

impl From<ColumnBuilder> for ColumnDefinition {
    fn from(builder: ColumnBuilder) -> Self {
        builder.build()
    }
}

// =============================================================================
// Shorthand Functions for Common Types
// =============================================================================

/// Creates an auto-incrementing INTEGER primary key.
#[must_use]
pub fn increments(name: impl Into<String>) -> ColumnBuilder {
    integer(name).primary_key().autoincrement()
}

/// Creates an auto-incrementing BIGINT primary key.
#[must_use]
pub fn big_increments(name: impl Into<String>) -> ColumnBuilder {
    big_integer(name).primary_key().autoincrement()
}

/// Creates a tiny integer column builder.
#[must_use]
pub fn tiny_integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::TinyInteger)
}

/// Creates a small integer column builder.
#[must_use]
pub fn small_integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::SmallInteger)
}

/// Creates an integer column builder.
#[must_use]
pub fn integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Integer)
}

/// Creates a big integer column builder.
#[must_use]
pub fn big_integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::BigInteger)
}

/// Creates a FLOAT column builder.
#[must_use]
pub fn float(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Float)
}

/// Creates a DOUBLE column builder.
#[must_use]
pub fn double(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Double)
}

/// Creates a DECIMAL column builder.
#[must_use]
pub fn decimal(name: impl Into<String>, precision: u16, scale: u16) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Decimal { precision, scale })
}

/// Creates a BOOLEAN column builder.
#[must_use]
pub fn boolean(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Boolean)
}

/// Creates a CHAR column builder.
#[must_use]
pub fn char(name: impl Into<String>, len: u32) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Char(len))
}

/// Creates a VARCHAR column builder.
#[must_use]
pub fn string(name: impl Into<String>, len: u32) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::String(len))
}

/// Creates a TEXT column builder.
#[must_use]
pub fn text(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Text)
}

/// Creates a medium text column builder.
#[must_use]
pub fn medium_text(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::MediumText)
}

/// Creates a long text column builder.
#[must_use]
pub fn long_text(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::LongText)
}

/// Creates a JSON column builder.
#[must_use]
pub fn json(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Json)
}

/// Creates a JSONB column builder.
#[must_use]
pub fn jsonb(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Jsonb)
}

/// Creates a DATE column builder.
#[must_use]
pub fn date(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Date)
}

/// Creates a TIME column builder.
#[must_use]
pub fn time(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Time)
}

/// Creates a TIME WITH TIME ZONE column builder.
#[must_use]
pub fn time_tz(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::TimeTz)
}

/// Creates a DATETIME column builder.
#[must_use]
pub fn datetime(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::DateTime)
}

/// Creates a DATETIME WITH TIME ZONE column builder.
#[must_use]
pub fn datetime_tz(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::DateTimeTz)
}

/// Creates a TIMESTAMP column builder.
#[must_use]
pub fn timestamp(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Timestamp)
}

/// Creates a TIMESTAMP WITH TIME ZONE column builder.
#[must_use]
pub fn timestamp_tz(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::TimestampTz)
}

/// Creates a YEAR column builder.
#[must_use]
pub fn year(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Year)
}

/// Creates a binary column builder.
#[must_use]
pub fn binary(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Binary)
}

/// Creates a UUID column builder.
#[must_use]
pub fn uuid(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Uuid)
}

/// Creates an IP address column builder.
#[must_use]
pub fn ip_address(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::IpAddress)
}

/// Creates a MAC address column builder.
#[must_use]
pub fn mac_address(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::MacAddress)
}

/// Creates an enumeration column builder.
#[must_use]
pub fn enumeration(name: impl Into<String>, values: &[&str]) -> ColumnBuilder {
    ColumnBuilder::new(
        name,
        ColumnType::Enum(values.iter().map(|v| String::from(*v)).collect()),
    )
}

/// Creates a GEOMETRY column builder.
#[must_use]
pub fn geometry(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Geometry)
}

/// Creates a GEOGRAPHY column builder.
#[must_use]
pub fn geography(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Geography)
}

/// Creates a column with a dialect type name passed through verbatim.
#[must_use]
pub fn custom(name: impl Into<String>, type_name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, ColumnType::Custom(type_name.into()))
}
