//! Legacy storage format migration
//!
//! Early releases stored arrays as strings joined with
//! [`LEGACY_ARRAY_SEPARATOR`] and hashes as loosely formatted JSON. These
//! helpers rewrite one stored string into the current encoding. Nil stays
//! nil.

use crate::codec;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;

/// Delimiter of the historical array encoding
pub const LEGACY_ARRAY_SEPARATOR: &str = "||;||";

/// Convert a delimiter-joined array into JSON array text
///
/// Input that already is a JSON array is re-encoded unchanged, so running
/// the migration twice is harmless.
pub fn migrate_legacy_array(stored: Option<&str>) -> Result<Option<String>> {
    let Some(stored) = stored else {
        return Ok(None);
    };
    if let Ok(items) = serde_json::from_str::<Vec<JsonValue>>(stored) {
        return codec::encode_array(&Value::Array(items)).map(Some);
    }
    let items = if stored.is_empty() {
        Vec::new()
    } else {
        stored
            .split(LEGACY_ARRAY_SEPARATOR)
            .map(|s| JsonValue::String(s.to_string()))
            .collect()
    };
    codec::encode_array(&Value::Array(items)).map(Some)
}

/// Re-encode a JSON object string in the canonical hash encoding
pub fn migrate_legacy_hash(stored: Option<&str>) -> Result<Option<String>> {
    let Some(stored) = stored else {
        return Ok(None);
    };
    match serde_json::from_str::<JsonValue>(stored) {
        Ok(JsonValue::Object(map)) => codec::encode_hash(&Value::Hash(map)).map(Some),
        Ok(other) => Err(Error::corrupt(
            DataType::Hash,
            stored,
            format!("expected an object, found {}", json_kind(&other)),
        )),
        Err(e) => Err(Error::corrupt(DataType::Hash, stored, e)),
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
