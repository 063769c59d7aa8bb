//! Change-Tracking Adapter
//!
//! Field-level change facts derived from the host's tracking of the whole
//! physical attribute. The host knows whether the attribute is dirty, what
//! its baseline was, and what the last commit batch looked like; everything
//! here is computed from those three facts.

use overlay_core::{changed_keys, registry, stored, HostRecord, Result, StoreMap, Value};
use tracing::warn;

use crate::overlay::Overlay;

impl Overlay {
    /// `<field>_changed?`
    ///
    /// True when the physical attribute is dirty and the field's value
    /// differs from its baseline.
    pub fn changed<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<bool> {
        if !record.attribute_changed(self.attribute()) {
            return Ok(false);
        }
        Ok(self.was(record, field)? != self.read(record, field)?)
    }

    /// `<field>_was`
    ///
    /// The value at the baseline; a missing baseline reads as an empty map.
    pub fn was<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<Value> {
        let d = self.descriptor(field)?;
        let raw = record
            .attribute_was(self.attribute())
            .and_then(|map| stored(map, &d.store_key));
        registry::deserialize(d.data_type, raw)
    }

    /// `<field>_change`
    ///
    /// `(was, now)` when the attribute is dirty and this field's store key
    /// is among the keys that differ from the baseline. A change to a
    /// sibling field alone yields `None`.
    pub fn change<R: HostRecord + ?Sized>(
        &self,
        record: &R,
        field: &str,
    ) -> Result<Option<(Value, Value)>> {
        let d = self.descriptor(field)?;
        let attribute = self.attribute();
        if !record.attribute_changed(attribute) {
            return Ok(None);
        }
        let empty = StoreMap::new();
        let before = record.attribute_was(attribute).unwrap_or(&empty);
        let after = record.read_attribute(attribute).unwrap_or(&empty);
        if !changed_keys(before, after).contains(&d.store_key) {
            return Ok(None);
        }
        Ok(Some((self.was(record, field)?, self.read(record, field)?)))
    }

    /// `<field>_will_change!`
    ///
    /// Marks the physical attribute dirty.
    pub fn will_change<R: HostRecord + ?Sized>(&self, record: &mut R, field: &str) -> Result<()> {
        self.descriptor(field)?;
        record.attribute_will_change(self.attribute());
        Ok(())
    }

    /// `restore_<field>!`
    ///
    /// Writes the baseline value back through the normal write path.
    /// Sibling fields are untouched.
    pub fn restore<R: HostRecord + ?Sized>(&self, record: &mut R, field: &str) -> Result<()> {
        let was = self.was(record, field)?;
        self.write(record, field, &was)
    }

    /// Deprecated name of [`Overlay::restore`]
    #[deprecated(note = "use restore")]
    pub fn reset<R: HostRecord + ?Sized>(&self, record: &mut R, field: &str) -> Result<()> {
        warn!(field, "reset is deprecated, use restore");
        self.restore(record, field)
    }

    /// `saved_change_to_<field>`
    ///
    /// The single distinct `(old, new)` pair observed for this field across
    /// the last commit batch. No change, or more than one distinct change,
    /// yields `None`.
    pub fn saved_change<R: HostRecord + ?Sized>(
        &self,
        record: &R,
        field: &str,
    ) -> Result<Option<(Value, Value)>> {
        let d = self.descriptor(field)?;
        let mut pairs: Vec<(Value, Value)> = Vec::new();
        for (before, after) in record.saved_changes(self.attribute()) {
            let old = registry::deserialize(
                d.data_type,
                before.as_ref().and_then(|m| stored(m, &d.store_key)),
            )?;
            let new = registry::deserialize(
                d.data_type,
                after.as_ref().and_then(|m| stored(m, &d.store_key)),
            )?;
            if old != new && !pairs.iter().any(|(o, n)| *o == old && *n == new) {
                pairs.push((old, new));
            }
        }
        if pairs.len() == 1 {
            Ok(pairs.pop())
        } else {
            Ok(None)
        }
    }

    /// `saved_change_to_<field>?`
    pub fn saved_changed<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<bool> {
        Ok(self.saved_change(record, field)?.is_some())
    }
}
