//! Casters: loosely-typed input to canonical values
//!
//! Every caster receives a non-null input and returns either the one
//! canonical variant its data type uses or `Value::Null` (a blank string is
//! treated as "no value" for every non-string type). Casting is idempotent:
//! a canonical value casts to itself.

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Tokens that cast to `true`
pub const TRUE_TOKENS: &[&str] = &["1", "t", "true", "on", "yes", "y"];

/// Tokens that cast to `false`
pub const FALSE_TOKENS: &[&str] = &["0", "f", "false", "off", "no", "n"];

/// Shortest text that parses back to the same `f64`
pub fn format_float(f: f64) -> String {
    format!("{:?}", f)
}

pub(crate) fn cast_string(value: &Value) -> Result<Value> {
    let s = match value {
        Value::String(s) => return Ok(Value::String(s.clone())),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Decimal(d) => d.to_string(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::DateTime(t) => t.to_rfc3339(),
        Value::Array(_) | Value::Hash(_) => value.to_json().to_string(),
        Value::Null => return Ok(Value::Null),
    };
    Ok(Value::String(s))
}

pub(crate) fn cast_integer(value: &Value) -> Result<Value> {
    let dt = DataType::Integer;
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => float_to_i64(*f)
            .map(Value::Int)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::Decimal(d) => d
            .trunc()
            .to_i64()
            .map(Value::Int)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Int(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(float_to_i64)
                .map(Value::Int)
                .ok_or_else(|| Error::cast_failure(dt, value, "not an integer"))
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

pub(crate) fn float_to_i64(f: f64) -> Option<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

pub(crate) fn cast_float(value: &Value) -> Result<Value> {
    let dt = DataType::Float;
    match value {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Decimal(d) => d
            .to_f64()
            .map(Value::Float)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            s.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| Error::cast_failure(dt, value, e))
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

pub(crate) fn cast_decimal(value: &Value) -> Result<Value> {
    let dt = DataType::Decimal;
    match value {
        Value::Decimal(d) => Ok(Value::Decimal(*d)),
        Value::Int(i) => Ok(Value::Decimal(Decimal::from(*i))),
        // Display never uses exponent notation and is the shortest form
        // that reads back as the same float.
        Value::Float(f) if f.is_finite() => parse_decimal(&f.to_string())
            .map(Value::Decimal)
            .ok_or_else(|| Error::cast_failure(dt, value, "not representable exactly")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            parse_decimal(s)
                .map(Value::Decimal)
                .ok_or_else(|| Error::cast_failure(dt, value, "not a decimal or too precise"))
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

/// Exact decimal parsing
///
/// Plain and scientific notation are accepted. Input that does not fit in
/// 28 significant digits is rejected rather than rounded.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    if let Ok(d) = Decimal::from_str_exact(s) {
        return Some(d);
    }
    let (mantissa, exponent) = s.split_once(['e', 'E'])?;
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    shift_exact(mantissa, exponent)
}

/// `d * 10^exponent`, or `None` if the result cannot be held exactly
fn shift_exact(d: Decimal, exponent: i64) -> Option<Decimal> {
    let scale = i64::from(d.scale()).checked_sub(exponent)?;
    let mut mantissa = d.mantissa();
    let scale = if scale < 0 {
        if scale < -40 {
            return None;
        }
        for _ in 0..(-scale) {
            mantissa = mantissa.checked_mul(10)?;
        }
        0
    } else {
        scale
    };
    Decimal::try_from_i128_with_scale(mantissa, u32::try_from(scale).ok()?).ok()
}

pub(crate) fn cast_boolean(value: &Value) -> Result<Value> {
    let dt = DataType::Boolean;
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::String(s) => {
            let token = s.trim().to_ascii_lowercase();
            if token.is_empty() {
                Ok(Value::Null)
            } else if TRUE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(Error::cast_failure(dt, value, "not a boolean token"))
            }
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

pub(crate) fn cast_date(value: &Value) -> Result<Value> {
    let dt = DataType::Date;
    match value {
        Value::Date(d) => Ok(Value::Date(*d)),
        Value::DateTime(t) => Ok(Value::Date(t.date_naive())),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            parse_date(s)
                .map(Value::Date)
                .ok_or_else(|| Error::cast_failure(dt, value, "not a date"))
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

/// Lenient date parsing: ISO dates first, then the calendar date written in
/// a timestamp.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.date());
        }
    }
    None
}

pub(crate) fn cast_datetime(value: &Value) -> Result<Value> {
    let dt = DataType::DateTime;
    match value {
        Value::DateTime(t) => whole_seconds(t.timestamp())
            .map(Value::DateTime)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::Date(d) => midnight(*d)
            .map(Value::DateTime)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::Int(secs) => whole_seconds(*secs)
            .map(Value::DateTime)
            .ok_or_else(|| Error::cast_failure(dt, value, "out of range")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || is_zero_date(s) {
                return Ok(Value::Null);
            }
            parse_datetime(s)
                .and_then(|t| whole_seconds(t.timestamp()))
                .map(Value::DateTime)
                .ok_or_else(|| Error::cast_failure(dt, value, "not a timestamp"))
        }
        Value::Null => Ok(Value::Null),
        other => Err(Error::cast_failure(dt, other, "unsupported input")),
    }
}

/// Instants are kept at whole-second precision, the precision of the
/// epoch-second storage form.
fn whole_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn is_zero_date(s: &str) -> bool {
    s.starts_with("0000-00-00")
}

/// Parse a timestamp string into an instant
///
/// An explicit offset is honored; a string without one is read as UTC.
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ] {
        if let Ok(t) = DateTime::parse_from_str(s, fmt) {
            return Some(t.with_timezone(&Utc));
        }
    }
    let naive = s.strip_suffix(" UTC").unwrap_or(s);
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(t.and_utc());
        }
    }
    parse_date(naive).and_then(midnight)
}

fn midnight(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0).map(|t| t.and_utc())
}

pub(crate) fn cast_array(value: &Value) -> Result<Value> {
    match value {
        Value::Array(a) => Ok(Value::Array(a.clone())),
        Value::Hash(_) => Err(Error::ShapeMismatch {
            data_type: DataType::Array,
            actual: value.type_name(),
        }),
        Value::Null => Ok(Value::Null),
        scalar => Ok(Value::Array(vec![scalar.to_json()])),
    }
}

pub(crate) fn cast_hash(value: &Value) -> Result<Value> {
    match value {
        Value::Hash(h) => Ok(Value::Hash(h.clone())),
        Value::Null => Ok(Value::Null),
        other => Err(Error::ShapeMismatch {
            data_type: DataType::Hash,
            actual: other.type_name(),
        }),
    }
}
