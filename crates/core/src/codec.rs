//! Encoders and decoders between canonical values and stored strings
//!
//! Encoders only ever see the canonical variant of their type (the registry
//! casts first). Decoders see the raw string found in the physical attribute,
//! which may have been written by something other than this engine.

use crate::cast::{float_to_i64, format_float, parse_date, parse_datetime, parse_decimal};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::{JsonMap, Value};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

fn unexpected(data_type: DataType, value: &Value) -> Error {
    Error::ShapeMismatch {
        data_type,
        actual: value.type_name(),
    }
}

// ============================================================================
// Encoders
// ============================================================================

pub(crate) fn encode_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(unexpected(DataType::String, other)),
    }
}

pub(crate) fn encode_integer(value: &Value) -> Result<String> {
    match value {
        Value::Int(i) => Ok(i.to_string()),
        other => Err(unexpected(DataType::Integer, other)),
    }
}

pub(crate) fn encode_float(value: &Value) -> Result<String> {
    match value {
        Value::Float(f) => Ok(format_float(*f)),
        other => Err(unexpected(DataType::Float, other)),
    }
}

pub(crate) fn encode_decimal(value: &Value) -> Result<String> {
    match value {
        Value::Decimal(d) => Ok(d.to_string()),
        other => Err(unexpected(DataType::Decimal, other)),
    }
}

pub(crate) fn encode_boolean(value: &Value) -> Result<String> {
    match value {
        Value::Bool(true) => Ok("true".to_string()),
        Value::Bool(false) => Ok("false".to_string()),
        other => Err(unexpected(DataType::Boolean, other)),
    }
}

pub(crate) fn encode_date(value: &Value) -> Result<String> {
    match value {
        Value::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
        other => Err(unexpected(DataType::Date, other)),
    }
}

pub(crate) fn encode_datetime(value: &Value) -> Result<String> {
    match value {
        Value::DateTime(t) => Ok(t.timestamp().to_string()),
        other => Err(unexpected(DataType::DateTime, other)),
    }
}

pub(crate) fn encode_array(value: &Value) -> Result<String> {
    match value {
        Value::Array(items) => serde_json::to_string(items)
            .map_err(|e| Error::cast_failure(DataType::Array, value, e)),
        other => Err(unexpected(DataType::Array, other)),
    }
}

pub(crate) fn encode_hash(value: &Value) -> Result<String> {
    match value {
        Value::Hash(map) => {
            serde_json::to_string(map).map_err(|e| Error::cast_failure(DataType::Hash, value, e))
        }
        other => Err(unexpected(DataType::Hash, other)),
    }
}

// ============================================================================
// Decoders
// ============================================================================

pub(crate) fn decode_string(stored: &str) -> Result<Value> {
    Ok(Value::String(stored.to_string()))
}

/// Blank numeric strings decode as zero. A fractional string left by another
/// writer is truncated; one outside the `i64` range is corrupt.
pub(crate) fn decode_integer(stored: &str) -> Result<Value> {
    let s = stored.trim();
    if s.is_empty() {
        return Ok(Value::Int(0));
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(float_to_i64)
        .map(Value::Int)
        .ok_or_else(|| Error::corrupt(DataType::Integer, stored, "not an integer in range"))
}

pub(crate) fn decode_float(stored: &str) -> Result<Value> {
    let s = stored.trim();
    if s.is_empty() {
        return Ok(Value::Float(0.0));
    }
    s.parse::<f64>()
        .map(Value::Float)
        .map_err(|e| Error::corrupt(DataType::Float, stored, e))
}

pub(crate) fn decode_decimal(stored: &str) -> Result<Value> {
    let s = stored.trim();
    if s.is_empty() {
        return Ok(Value::Decimal(Decimal::ZERO));
    }
    parse_decimal(s)
        .map(Value::Decimal)
        .ok_or_else(|| Error::corrupt(DataType::Decimal, stored, "not an exact decimal"))
}

/// Only the literal `"true"` reads back as true.
pub(crate) fn decode_boolean(stored: &str) -> Result<Value> {
    Ok(Value::Bool(stored == "true"))
}

pub(crate) fn decode_date(stored: &str) -> Result<Value> {
    parse_date(stored.trim())
        .map(Value::Date)
        .ok_or_else(|| Error::corrupt(DataType::Date, stored, "not a date"))
}

/// Epoch seconds, or a timestamp string left behind by another writer.
pub(crate) fn decode_datetime(stored: &str) -> Result<Value> {
    parse_datetime(stored.trim())
        .map(Value::DateTime)
        .ok_or_else(|| Error::corrupt(DataType::DateTime, stored, "not a timestamp"))
}

pub(crate) fn decode_array(stored: &str) -> Result<Value> {
    serde_json::from_str::<Vec<JsonValue>>(stored)
        .map(Value::Array)
        .map_err(|e| Error::corrupt(DataType::Array, stored, e))
}

pub(crate) fn decode_hash(stored: &str) -> Result<Value> {
    serde_json::from_str::<JsonMap>(stored)
        .map(Value::Hash)
        .map_err(|e| Error::corrupt(DataType::Hash, stored, e))
}
