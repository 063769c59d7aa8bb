//! Condition evaluation with store-side semantics
//!
//! Mirrors what an hstore-backed database does with a rendered condition:
//! - a missing key never matches
//! - a stored string that does not survive the store-side cast never matches
//! - JSON containment follows jsonb superset rules

use std::cmp::Ordering;
use std::str::FromStr;

use overlay_core::{CompareOp, FilterTest, SqlParam, StoreCast};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// Whether the string stored under a key satisfies `test`
pub fn evaluate(test: &FilterTest, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match test {
        FilterTest::Contains { value } | FilterTest::Equals { value } => stored == value,
        FilterTest::Compare { cast, op, operand } => compare(*cast, stored, operand)
            .map(|ordering| op.matches(ordering))
            .unwrap_or(false),
        FilterTest::JsonContains { json } => {
            match (
                serde_json::from_str::<JsonValue>(stored),
                serde_json::from_str::<JsonValue>(json),
            ) {
                (Ok(haystack), Ok(needle)) => json_contains(&haystack, &needle, true),
                _ => false,
            }
        }
    }
}

/// Order the stored string against the operand after casting both
fn compare(cast: StoreCast, stored: &str, operand: &SqlParam) -> Option<Ordering> {
    let rhs = operand.to_string();
    match cast {
        StoreCast::Integer | StoreCast::Epoch => {
            let l = stored.trim().parse::<i64>().ok()?;
            let r = rhs.trim().parse::<i64>().ok()?;
            Some(l.cmp(&r))
        }
        StoreCast::Float => {
            let l = stored.trim().parse::<f64>().ok()?;
            let r = rhs.trim().parse::<f64>().ok()?;
            l.partial_cmp(&r)
        }
        StoreCast::Decimal => {
            let l = Decimal::from_str(stored.trim()).ok()?;
            let r = Decimal::from_str(rhs.trim()).ok()?;
            Some(l.cmp(&r))
        }
        StoreCast::Text => Some(stored.cmp(rhs.as_str())),
    }
}

/// jsonb `@>`
///
/// A top-level array also contains a bare scalar equal to one of its
/// elements.
fn json_contains(haystack: &JsonValue, needle: &JsonValue, top_level: bool) -> bool {
    match (haystack, needle) {
        (JsonValue::Object(h), JsonValue::Object(n)) => n.iter().all(|(k, nv)| {
            h.get(k)
                .map(|hv| json_contains(hv, nv, false))
                .unwrap_or(false)
        }),
        (JsonValue::Array(h), JsonValue::Array(n)) => n.iter().all(|nv| {
            h.iter().any(|hv| match nv {
                JsonValue::Array(_) | JsonValue::Object(_) => json_contains(hv, nv, false),
                scalar => scalar_eq(hv, scalar),
            })
        }),
        (JsonValue::Array(h), scalar) if top_level && is_scalar(scalar) => {
            h.iter().any(|hv| scalar_eq(hv, scalar))
        }
        (h, n) if is_scalar(h) && is_scalar(n) => scalar_eq(h, n),
        _ => false,
    }
}

fn is_scalar(v: &JsonValue) -> bool {
    !matches!(v, JsonValue::Array(_) | JsonValue::Object(_))
}

/// Numbers compare by value, so `1` and `1.0` are equal
fn scalar_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}
