//! Overlay engine
//!
//! This crate turns overlay declarations into behaviour:
//! - Declaration / DescriptorTable: validated field descriptors
//! - Overlay / FieldAccessor: typed reads and writes on one physical attribute
//! - dirty tracking: field-level change facts derived from the host
//! - NamedPredicate: per-field filters rendered as conditions
//! - HostSchema: all overlays of one host, scopes, schema reflection
//! - OverlayConfig: `overlay.toml` policies
//!
//! The engine never owns records. Hosts implement `HostRecord` and
//! `QueryBuilder` from `overlay-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod descriptor;
mod dirty;
pub mod overlay;
pub mod predicate;
pub mod schema;

pub use config::{CollisionPolicy, DirtyPolicy, OverlayConfig, CONFIG_FILE_NAME};
pub use descriptor::{Declaration, DescriptorTable, FieldDescriptor, FieldSpec};
pub use overlay::{FieldAccessor, Overlay};
pub use predicate::{kinds_for, predicates_for, NamedPredicate, PredicateKind};
pub use schema::{ColumnInfo, HostSchema};
