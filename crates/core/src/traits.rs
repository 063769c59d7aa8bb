//! Host traits
//!
//! The engine never owns record identity, persistence, or dirty tracking.
//! It reaches the host record and the host's query builder only through the
//! two traits defined here, so any record type (an ORM model, a document
//! wrapper, the in-memory reference host) can carry overlays.

use crate::filter::SqlParam;
use crate::types::StoreMap;

/// One committed before/after pair of a physical attribute
pub type MapChange = (Option<StoreMap>, Option<StoreMap>);

/// A record that holds map-valued physical attributes
///
/// # Contract
///
/// - `attribute_was` is the baseline the host tracks dirtiness against
///   (normally the last committed value).
/// - `attribute_will_change` marks the attribute dirty; the host decides
///   what that means for persistence.
/// - `saved_changes` returns the before/after pairs of the most recent
///   commit batch, oldest first. A batch may hold several pairs when the
///   host commits more than once inside one save.
pub trait HostRecord {
    /// Current value of a physical attribute (`None` if unset)
    fn read_attribute(&self, attribute: &str) -> Option<&StoreMap>;

    /// Replace a physical attribute
    fn write_attribute(&mut self, attribute: &str, value: Option<StoreMap>);

    /// Notify the host that a physical attribute is about to change
    fn attribute_will_change(&mut self, attribute: &str);

    /// Whether the physical attribute is dirty
    fn attribute_changed(&self, attribute: &str) -> bool;

    /// Baseline value of a physical attribute
    fn attribute_was(&self, attribute: &str) -> Option<&StoreMap>;

    /// Committed before/after pairs from the last commit batch
    fn saved_changes(&self, attribute: &str) -> Vec<MapChange>;
}

/// The host's `where(fragment, *params)` query primitive
pub trait QueryBuilder: Sized {
    /// Add a parameterized filter fragment
    ///
    /// `sql` uses `?` placeholders, one per entry of `params`.
    fn where_fragment(self, sql: &str, params: Vec<SqlParam>) -> Self;
}
