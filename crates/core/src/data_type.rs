//! Data type enumeration
//!
//! The closed set of types a logical field may be declared with.
//!
//! | Type | In-memory form | Stored form |
//! |------|----------------|-------------|
//! | string | `String` | the string itself |
//! | integer | `i64` | decimal digits |
//! | float | `f64` | shortest round-trip text |
//! | decimal | `rust_decimal::Decimal` | exact decimal text |
//! | boolean | `bool` | `"true"` / `"false"` |
//! | date | `chrono::NaiveDate` | ISO `YYYY-MM-DD` |
//! | datetime | `chrono::DateTime<Utc>` | integer epoch seconds |
//! | array | `Vec<serde_json::Value>` | JSON array text |
//! | hash | `serde_json::Map` | JSON object text |

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The declared type of a logical field
///
/// ## Invariant
///
/// Every variant has exactly one registered handler in
/// [`TypeRegistry`](crate::registry::TypeRegistry). Adding a variant
/// requires adding a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Arbitrary-precision decimal
    Decimal,
    /// true / false
    Boolean,
    /// Calendar date
    Date,
    /// Instant, normalized to UTC
    #[serde(alias = "time")]
    DateTime,
    /// Ordered list of JSON values
    Array,
    /// String-keyed map of JSON values
    Hash,
}

impl DataType {
    /// All data types (for iteration)
    pub const ALL: [DataType; 9] = [
        DataType::String,
        DataType::Integer,
        DataType::Float,
        DataType::Decimal,
        DataType::Boolean,
        DataType::Date,
        DataType::DateTime,
        DataType::Array,
        DataType::Hash,
    ];

    /// Declaration name
    pub const fn name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Decimal => "decimal",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
            DataType::Array => "array",
            DataType::Hash => "hash",
        }
    }

    /// Parse a declaration name
    ///
    /// `"time"` is accepted as the historical name of `datetime`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(DataType::String),
            "integer" => Some(DataType::Integer),
            "float" => Some(DataType::Float),
            "decimal" => Some(DataType::Decimal),
            "boolean" => Some(DataType::Boolean),
            "date" => Some(DataType::Date),
            "datetime" | "time" => Some(DataType::DateTime),
            "array" => Some(DataType::Array),
            "hash" => Some(DataType::Hash),
            _ => None,
        }
    }

    /// integer, float and decimal
    pub const fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float | DataType::Decimal)
    }

    /// date and datetime
    pub const fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::DateTime)
    }

    /// array and hash
    pub const fn is_container(&self) -> bool {
        matches!(self, DataType::Array | DataType::Hash)
    }

    /// Column type reported to the host's schema reflection
    ///
    /// Containers have no native column type and report the generic `value`.
    pub const fn column_type(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Decimal => "decimal",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
            DataType::Array | DataType::Hash => "value",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::from_name(s).ok_or_else(|| Error::InvalidDataType {
            name: s.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
