//! In-memory reference host for the overlay engine
//!
//! This crate implements the host side of the overlay contract with:
//! - MemoryRecord: physical attributes, baselines, dirty flags, commit batches
//! - MemoryTable: named record collections that execute `Condition`s
//! - SqlQuery: a `QueryBuilder` that renders accumulated fragments
//!
//! Real hosts (ORMs, document mappers) implement `HostRecord` and
//! `QueryBuilder` themselves; this crate is the reference they are tested
//! against.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod eval;
pub mod query;
pub mod record;
pub mod table;

pub use eval::evaluate;
pub use query::SqlQuery;
pub use record::MemoryRecord;
pub use table::{MemoryTable, RecordId};
