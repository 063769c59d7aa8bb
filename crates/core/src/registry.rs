//! Type registry
//!
//! The registry maps every [`DataType`] to the three functions that define
//! it: a caster, an encoder, and a decoder. Every read, write and predicate
//! goes through it.
//!
//! ## Usage
//!
//! ```rust
//! use overlay_core::{registry, DataType, Value};
//!
//! let stored = registry::serialize(DataType::Integer, &Value::from("468")).unwrap();
//! assert_eq!(stored.as_deref(), Some("468"));
//!
//! let value = registry::deserialize(DataType::Integer, stored.as_deref()).unwrap();
//! assert_eq!(value, Value::Int(468));
//! ```
//!
//! ## Nil
//!
//! All three public functions pass nil straight through: casting nil gives
//! nil, serializing nil gives no stored string, and a missing stored string
//! deserializes to nil.
//!
//! ## Round-trip law
//!
//! For every type `T` and non-nil `v` whose cast succeeds,
//! `deserialize(T, serialize(T, v)) == cast(T, v)`.

use crate::cast;
use crate::codec;
use crate::data_type::DataType;
use crate::error::Result;
use crate::value::Value;

/// Coerce loosely-typed input into a canonical value
pub type CastFn = fn(&Value) -> Result<Value>;

/// Turn a canonical value into its stored string
pub type EncodeFn = fn(&Value) -> Result<String>;

/// Read a stored string back into a canonical value
pub type DecodeFn = fn(&str) -> Result<Value>;

/// The cast/encode/decode triple for one data type
#[derive(Debug, Clone, Copy)]
pub struct TypeHandler {
    /// Caster
    pub cast: CastFn,
    /// Encoder
    pub encode: EncodeFn,
    /// Decoder
    pub decode: DecodeFn,
}

impl TypeHandler {
    /// The stringify/identity pair
    pub const DEFAULT: TypeHandler = TypeHandler {
        cast: cast::cast_string,
        encode: codec::encode_string,
        decode: codec::decode_string,
    };
}

/// Total mapping from data type to handler
///
/// The mapping is a `match`, so adding a [`DataType`] variant without a
/// handler does not compile.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    /// The process-wide registry
    pub const DEFAULT: TypeRegistry = TypeRegistry;

    /// Handler for a data type
    pub fn handler(&self, data_type: DataType) -> TypeHandler {
        match data_type {
            DataType::String => TypeHandler::DEFAULT,
            DataType::Integer => TypeHandler {
                cast: cast::cast_integer,
                encode: codec::encode_integer,
                decode: codec::decode_integer,
            },
            DataType::Float => TypeHandler {
                cast: cast::cast_float,
                encode: codec::encode_float,
                decode: codec::decode_float,
            },
            DataType::Decimal => TypeHandler {
                cast: cast::cast_decimal,
                encode: codec::encode_decimal,
                decode: codec::decode_decimal,
            },
            DataType::Boolean => TypeHandler {
                cast: cast::cast_boolean,
                encode: codec::encode_boolean,
                decode: codec::decode_boolean,
            },
            DataType::Date => TypeHandler {
                cast: cast::cast_date,
                encode: codec::encode_date,
                decode: codec::decode_date,
            },
            DataType::DateTime => TypeHandler {
                cast: cast::cast_datetime,
                encode: codec::encode_datetime,
                decode: codec::decode_datetime,
            },
            DataType::Array => TypeHandler {
                cast: cast::cast_array,
                encode: codec::encode_array,
                decode: codec::decode_array,
            },
            DataType::Hash => TypeHandler {
                cast: cast::cast_hash,
                encode: codec::encode_hash,
                decode: codec::decode_hash,
            },
        }
    }

    /// Cast `value` into the canonical form of `data_type`
    pub fn cast(&self, data_type: DataType, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        (self.handler(data_type).cast)(value)
    }

    /// Cast then encode; nil (or input that casts to nil) stores nothing
    pub fn serialize(&self, data_type: DataType, value: &Value) -> Result<Option<String>> {
        let canonical = self.cast(data_type, value)?;
        if canonical.is_null() {
            return Ok(None);
        }
        (self.handler(data_type).encode)(&canonical).map(Some)
    }

    /// Decode a stored string; a missing string reads as nil
    pub fn deserialize(&self, data_type: DataType, stored: Option<&str>) -> Result<Value> {
        match stored {
            None => Ok(Value::Null),
            Some(s) => (self.handler(data_type).decode)(s),
        }
    }
}

/// [`TypeRegistry::cast`] on the default registry
pub fn cast(data_type: DataType, value: &Value) -> Result<Value> {
    TypeRegistry::DEFAULT.cast(data_type, value)
}

/// [`TypeRegistry::serialize`] on the default registry
pub fn serialize(data_type: DataType, value: &Value) -> Result<Option<String>> {
    TypeRegistry::DEFAULT.serialize(data_type, value)
}

/// [`TypeRegistry::deserialize`] on the default registry
pub fn deserialize(data_type: DataType, stored: Option<&str>) -> Result<Value> {
    TypeRegistry::DEFAULT.deserialize(data_type, stored)
}
