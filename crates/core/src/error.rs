//! Error types for the overlay engine
//!
//! This module defines every error the engine can report.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence (`Value::Null`) is never an error: every stage has explicit
//! nil-in/nil-out behavior. Errors are immediate and local to the single
//! read, write, or predicate call that produced them; nothing is retried.

use crate::data_type::DataType;
use thiserror::Error;

/// Result type alias for overlay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the overlay engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A field was declared with a type outside the closed set
    #[error("invalid data type: {name:?}")]
    InvalidDataType {
        /// The type name as declared
        name: String,
    },

    /// A container-typed field was handed a value of the wrong shape
    /// (e.g. a string assigned to a hash field)
    #[error("invalid data type: {data_type} field cannot hold a {actual} value")]
    ShapeMismatch {
        /// Declared type of the field
        data_type: DataType,
        /// Runtime shape of the rejected value
        actual: &'static str,
    },

    /// Input could not be coerced into the canonical form of the target type
    #[error("cannot cast {input} to {data_type}: {reason}")]
    CastFailure {
        /// Target type
        data_type: DataType,
        /// Debug rendering of the rejected input
        input: String,
        /// Why the cast failed
        reason: String,
    },

    /// A stored string could not be decoded under the field's type
    #[error("stored {data_type} value {stored:?} is unreadable: {reason}")]
    Corrupt {
        /// Declared type of the field
        data_type: DataType,
        /// The raw stored string
        stored: String,
        /// Why decoding failed
        reason: String,
    },

    /// No logical field with this name is declared
    #[error("unknown field: {field}")]
    UnknownField {
        /// Logical field name
        field: String,
    },

    /// No overlay is declared on this physical attribute
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute {
        /// Physical attribute name
        attribute: String,
    },

    /// No named predicate with this name is registered
    #[error("unknown scope: {scope}")]
    UnknownScope {
        /// Predicate name
        scope: String,
    },

    /// Two logical fields of one overlay map to the same store key
    #[error("store key {store_key:?} on {attribute} is claimed by both {first} and {second}")]
    DuplicateStoreKey {
        /// Owning physical attribute
        attribute: String,
        /// The contested store key
        store_key: String,
        /// Field declared first
        first: String,
        /// Field declared second
        second: String,
    },

    /// A logical field name is declared twice on one host type
    #[error("field {field} is already declared")]
    DuplicateField {
        /// Logical field name
        field: String,
    },

    /// An overlay is declared twice on the same physical attribute
    #[error("attribute {attribute} already carries an overlay")]
    DuplicateAttribute {
        /// Physical attribute name
        attribute: String,
    },

    /// Two fields generate the same named predicate
    #[error("scope {scope} is generated by both {first} and {second}")]
    DuplicateScope {
        /// Predicate name
        scope: String,
        /// Field that owns the name already
        first: String,
        /// Field being declared
        second: String,
    },

    /// A named predicate was invoked with the wrong number of arguments
    #[error("scope {scope} takes {expected} argument(s), got {got}")]
    ScopeArity {
        /// Predicate name
        scope: String,
        /// Arguments the predicate takes
        expected: usize,
        /// Arguments supplied
        got: usize,
    },

    /// Configuration could not be read, parsed, or validated
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Build a cast failure for `input`
    pub fn cast_failure(
        data_type: DataType,
        input: &impl std::fmt::Debug,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::CastFailure {
            data_type,
            input: format!("{:?}", input),
            reason: reason.to_string(),
        }
    }

    /// Build a decoding failure for a stored string
    pub fn corrupt(data_type: DataType, stored: &str, reason: impl std::fmt::Display) -> Self {
        Error::Corrupt {
            data_type,
            stored: stored.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for both declaration-time and write-time data type errors
    pub fn is_invalid_data_type(&self) -> bool {
        matches!(
            self,
            Error::InvalidDataType { .. } | Error::ShapeMismatch { .. }
        )
    }
}
