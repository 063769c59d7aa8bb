//! MemoryRecord: an in-memory host record
//!
//! Each physical attribute carries three pieces of state:
//! - the current value
//! - the baseline (the value as of the last save, what `attribute_was` reports)
//! - a dirty flag, set only through `attribute_will_change`
//!
//! `save()` commits every dirty attribute and records its before/after pair
//! as the commit batch that `saved_changes` exposes.

use std::collections::{BTreeMap, BTreeSet};

use overlay_core::{HostRecord, MapChange, StoreMap};
use tracing::debug;

/// An in-memory record holding map-valued physical attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRecord {
    /// Current attribute values
    attributes: BTreeMap<String, Option<StoreMap>>,
    /// Values as of the last save
    baseline: BTreeMap<String, Option<StoreMap>>,
    /// Attributes flagged by `attribute_will_change`
    dirty: BTreeSet<String>,
    /// Before/after pairs of the most recent commit batch
    saved: BTreeMap<String, Vec<MapChange>>,
    /// Count of `attribute_will_change` calls since the last save
    notifications: BTreeMap<String, usize>,
}

impl MemoryRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an attribute as if loaded from the backing store
    ///
    /// The value becomes both current and baseline; nothing is dirty.
    pub fn with_attribute(mut self, attribute: impl Into<String>, value: StoreMap) -> Self {
        let attribute = attribute.into();
        self.baseline.insert(attribute.clone(), Some(value.clone()));
        self.attributes.insert(attribute, Some(value));
        self
    }

    /// Assign a physical attribute directly, bypassing any overlay
    ///
    /// Marks the attribute dirty when the value differs, like a host's own
    /// attribute writer would.
    pub fn set_raw(&mut self, attribute: &str, value: Option<StoreMap>) {
        if self.get_raw(attribute) != value.as_ref() {
            self.attribute_will_change(attribute);
        }
        self.write_attribute(attribute, value);
    }

    /// Current value of a physical attribute
    pub fn get_raw(&self, attribute: &str) -> Option<&StoreMap> {
        self.read_attribute(attribute)
    }

    /// Whether the attribute is flagged dirty
    pub fn is_dirty(&self, attribute: &str) -> bool {
        self.dirty.contains(attribute)
    }

    /// Whether any attribute is flagged dirty
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Number of dirty notifications received since the last save
    pub fn change_notifications(&self, attribute: &str) -> usize {
        self.notifications.get(attribute).copied().unwrap_or(0)
    }

    /// Commit every dirty attribute, starting a new commit batch
    pub fn save(&mut self) {
        self.saved.clear();
        self.commit();
    }

    /// Commit every dirty attribute, appending to the current commit batch
    ///
    /// Models a host that saves the same record more than once inside one
    /// outer transaction.
    pub fn save_batched(&mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        let dirty = std::mem::take(&mut self.dirty);
        debug!(attributes = dirty.len(), "committing record");
        for attribute in dirty {
            let before = self.baseline.get(&attribute).cloned().flatten();
            let after = self.attributes.get(&attribute).cloned().flatten();
            self.saved
                .entry(attribute.clone())
                .or_default()
                .push((before, after.clone()));
            self.baseline.insert(attribute, after);
        }
        self.notifications.clear();
    }

    /// Discard unsaved changes
    pub fn reload(&mut self) {
        self.attributes = self.baseline.clone();
        self.dirty.clear();
        self.notifications.clear();
    }
}

impl HostRecord for MemoryRecord {
    fn read_attribute(&self, attribute: &str) -> Option<&StoreMap> {
        self.attributes.get(attribute).and_then(|v| v.as_ref())
    }

    fn write_attribute(&mut self, attribute: &str, value: Option<StoreMap>) {
        self.attributes.insert(attribute.to_string(), value);
    }

    fn attribute_will_change(&mut self, attribute: &str) {
        *self.notifications.entry(attribute.to_string()).or_insert(0) += 1;
        self.dirty.insert(attribute.to_string());
    }

    fn attribute_changed(&self, attribute: &str) -> bool {
        self.is_dirty(attribute)
    }

    fn attribute_was(&self, attribute: &str) -> Option<&StoreMap> {
        self.baseline.get(attribute).and_then(|v| v.as_ref())
    }

    fn saved_changes(&self, attribute: &str) -> Vec<MapChange> {
        self.saved.get(attribute).cloned().unwrap_or_default()
    }
}
