//! Logical values
//!
//! This module defines:
//! - Value: the typed, deserialized value visible through a logical accessor
//!
//! ## Nil
//!
//! `Value::Null` is the engine's nil. It is what a read returns for a missing
//! key or a missing physical attribute, and writing it stores a nil marker.
//!
//! ## Containers
//!
//! Array elements and hash values are `serde_json::Value`s, so a single field
//! can hold mixed content such as `[1, 2, "3"]` or nested maps.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// JSON object type used for hash values
pub type JsonMap = Map<String, JsonValue>;

/// A logical value
///
/// Equality is per variant: `Int(1) != Float(1.0)`. Casting through the
/// type registry is what brings loosely-typed input into the one variant
/// a field's data type uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// Arbitrary-precision decimal
    Decimal(Decimal),
    /// UTF-8 string
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Instant in UTC
    DateTime(DateTime<Utc>),
    /// Ordered list
    Array(Vec<JsonValue>),
    /// String-keyed map
    Hash(JsonMap),
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Hash(_) => "hash",
        }
    }

    /// Check if this is the nil value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Presence test behind `<field>?`
    ///
    /// - Null: absent
    /// - Bool: the boolean itself
    /// - String: false when empty or whitespace only
    /// - Array / Hash: true if non-empty
    /// - everything else: present
    pub fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Hash(h) => !h.is_empty(),
            _ => true,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the decimal if this is a Decimal value
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the date if this is a Date value
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the instant if this is a DateTime value
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the elements if this is an Array value
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get the map if this is a Hash value
    pub fn as_hash(&self) -> Option<&JsonMap> {
        match self {
            Value::Hash(h) => Some(h),
            _ => None,
        }
    }

    /// Convert into a JSON value
    ///
    /// Decimals become strings so no precision is lost; dates and instants
    /// become ISO 8601 strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Decimal(d) => JsonValue::String(d.to_string()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(t) => {
                JsonValue::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Array(a) => JsonValue::Array(a.clone()),
            Value::Hash(h) => JsonValue::Object(h.clone()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::DateTime(t)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::DateTime(t.with_timezone(&Utc))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<JsonMap> for Value {
    fn from(h: JsonMap) -> Self {
        Value::Hash(h)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(a) => Value::Array(a),
            JsonValue::Object(o) => Value::Hash(o),
        }
    }
}
