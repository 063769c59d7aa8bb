//! typed-overlay: strongly-typed logical fields on a string-keyed map column
//!
//! A host record stores one physical attribute as a flat string-to-string
//! map. An overlay declares typed logical fields on it; each field reads,
//! writes, tracks changes and filters as if it were a column of its own.
//!
//! # Quick Start
//!
//! ```
//! use typed_overlay::{Declaration, FieldSpec, HostSchema, Value};
//! use typed_overlay::memory::MemoryRecord;
//!
//! let mut schema = HostSchema::new("products");
//! schema.declare(
//!     Declaration::new("options")
//!         .field("color", "string")
//!         .field("weight", FieldSpec::keyed("float", "w")),
//! )?;
//!
//! let mut record = MemoryRecord::new();
//! schema.set(&mut record, "weight", "38.5")?;
//! assert_eq!(schema.read(&record, "weight")?, Value::Float(38.5));
//! # Ok::<(), typed_overlay::Error>(())
//! ```
//!
//! # Layout
//!
//! - `overlay-core`: values, data types, the type registry, conditions and
//!   the host traits (re-exported at the root)
//! - `overlay-engine`: declarations, accessors, dirty tracking, predicates
//! - `overlay-storage`: an in-memory host, re-exported as [`memory`]

pub use overlay_core::*;
pub use overlay_engine::*;
pub use overlay_storage as memory;
