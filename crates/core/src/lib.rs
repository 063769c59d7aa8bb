//! Core types for the typed attribute overlay engine
//!
//! This crate defines the foundational pieces every other crate builds on:
//! - Value: the logical value enum
//! - DataType: the closed set of declarable types
//! - StoreMap: the physical string-to-string attribute
//! - Error: the error taxonomy
//! - registry: cast / serialize / deserialize per data type
//! - migrate: rewriting historical storage encodings
//! - filter: conditions over store keys and their SQL rendering
//! - traits: the host record and query builder seams

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cast;
mod codec;
pub mod data_type;
pub mod error;
pub mod filter;
pub mod migrate;
pub mod registry;
pub mod traits;
pub mod types;
pub mod value;

pub use cast::{format_float, FALSE_TOKENS, TRUE_TOKENS};
pub use data_type::DataType;
pub use error::{Error, Result};
pub use filter::{ColumnRef, CompareOp, Condition, FilterTest, SqlFragment, SqlParam, StoreCast};
pub use migrate::{migrate_legacy_array, migrate_legacy_hash, LEGACY_ARRAY_SEPARATOR};
pub use registry::{TypeHandler, TypeRegistry};
pub use traits::{HostRecord, MapChange, QueryBuilder};
pub use types::{changed_keys, store_map, stored, StoreMap};
pub use value::{JsonMap, Value};
