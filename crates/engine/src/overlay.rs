//! Accessor Synthesizer
//!
//! An [`Overlay`] multiplexes the logical fields of one declaration onto one
//! physical attribute of a host record. Field access is a runtime dispatch
//! keyed by logical name; [`FieldAccessor`] bundles every per-field
//! operation behind a single handle.
//!
//! ## Write path
//!
//! 1. cast and serialize through the type registry (shape errors surface
//!    here, before the record is touched)
//! 2. compare with the stored string, per [`DirtyPolicy`]
//! 3. `attribute_will_change` on the physical attribute
//! 4. replace the physical attribute with the merged map
//!
//! Writing nil leaves a nil marker under the store key.

use overlay_core::{
    migrate_legacy_array, migrate_legacy_hash, registry, stored, ColumnRef, DataType, Error,
    HostRecord, Result, StoreMap, Value,
};
use tracing::trace;

use crate::config::{DirtyPolicy, OverlayConfig};
use crate::descriptor::{Declaration, DescriptorTable, FieldDescriptor};
use crate::predicate::{predicates_for, NamedPredicate};

/// Typed fields overlaid on one physical attribute of one host table
#[derive(Debug, Clone)]
pub struct Overlay {
    table: String,
    descriptors: DescriptorTable,
    config: OverlayConfig,
}

impl Overlay {
    /// Declare an overlay on `table`
    ///
    /// # Errors
    ///
    /// Any declaration error of [`DescriptorTable::declare`].
    pub fn new(
        table: impl Into<String>,
        declaration: Declaration,
        config: OverlayConfig,
    ) -> Result<Self> {
        let descriptors = DescriptorTable::declare(declaration, config.store_key_collisions)?;
        Ok(Overlay {
            table: table.into(),
            descriptors,
            config,
        })
    }

    /// Host table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Physical attribute carrying the overlay
    pub fn attribute(&self) -> &str {
        self.descriptors.owner()
    }

    /// The table-qualified physical attribute
    pub fn column(&self) -> ColumnRef {
        ColumnRef::new(self.table.clone(), self.attribute())
    }

    /// Engine configuration in effect
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The validated descriptor table
    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    /// Descriptors in declaration order
    pub fn metadata(&self) -> &[FieldDescriptor] {
        self.descriptors.metadata()
    }

    /// Descriptor by logical name
    pub fn descriptor(&self, field: &str) -> Result<&FieldDescriptor> {
        self.descriptors.get(field).ok_or_else(|| Error::UnknownField {
            field: field.to_string(),
        })
    }

    /// Whether `field` belongs to this overlay
    pub fn has_field(&self, field: &str) -> bool {
        self.descriptors.get(field).is_some()
    }

    /// Handle for one field
    pub fn field(&self, name: &str) -> Result<FieldAccessor<'_>> {
        Ok(FieldAccessor {
            overlay: self,
            descriptor: self.descriptor(name)?,
        })
    }

    /// Read a logical field
    ///
    /// A missing physical attribute or store key reads as nil.
    pub fn read<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<Value> {
        let d = self.descriptor(field)?;
        let raw = record
            .read_attribute(self.attribute())
            .and_then(|map| stored(map, &d.store_key));
        registry::deserialize(d.data_type, raw)
    }

    /// Write a logical field
    pub fn write<R: HostRecord + ?Sized>(
        &self,
        record: &mut R,
        field: &str,
        value: &Value,
    ) -> Result<()> {
        let d = self.descriptor(field)?;
        let serialized = registry::serialize(d.data_type, value)?;
        let attribute = self.attribute();
        let current = record.read_attribute(attribute);

        if self.config.dirty_policy == DirtyPolicy::CompareBeforeMark {
            let existing = current.and_then(|map| stored(map, &d.store_key));
            if existing == serialized.as_deref() {
                trace!(field, store_key = %d.store_key, rewritten = false, "logical write");
                return Ok(());
            }
        }

        let mut map: StoreMap = current.cloned().unwrap_or_default();
        map.insert(d.store_key.clone(), serialized);
        record.attribute_will_change(attribute);
        record.write_attribute(attribute, Some(map));
        trace!(field, store_key = %d.store_key, rewritten = true, "logical write");
        Ok(())
    }

    /// [`Overlay::write`] taking anything convertible into a [`Value`]
    pub fn set<R: HostRecord + ?Sized>(
        &self,
        record: &mut R,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.write(record, field, &value.into())
    }

    /// Write nil
    pub fn clear<R: HostRecord + ?Sized>(&self, record: &mut R, field: &str) -> Result<()> {
        self.write(record, field, &Value::Null)
    }

    /// Presence predicate (`<field>?`)
    pub fn is_set<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<bool> {
        Ok(self.read(record, field)?.is_present())
    }

    /// Read every field, in declaration order
    pub fn read_all<R: HostRecord + ?Sized>(&self, record: &R) -> Result<Vec<(String, Value)>> {
        self.descriptors
            .iter()
            .map(|d| Ok((d.name.clone(), self.read(record, &d.name)?)))
            .collect()
    }

    /// Every named predicate of every field
    pub fn predicates(&self) -> Vec<NamedPredicate> {
        let column = self.column();
        self.descriptors
            .iter()
            .flat_map(|d| predicates_for(&column, d))
            .collect()
    }

    /// Rewrite array and hash keys still stored in a historical encoding
    ///
    /// Returns the number of store keys rewritten. The physical attribute is
    /// marked dirty only if at least one key changed.
    pub fn migrate_legacy<R: HostRecord + ?Sized>(&self, record: &mut R) -> Result<usize> {
        let attribute = self.attribute();
        let Some(current) = record.read_attribute(attribute) else {
            return Ok(0);
        };
        let mut map = current.clone();
        let mut rewritten = 0;
        for d in self.descriptors.iter() {
            let old = stored(&map, &d.store_key);
            let new = match d.data_type {
                DataType::Array => migrate_legacy_array(old)?,
                DataType::Hash => migrate_legacy_hash(old)?,
                _ => continue,
            };
            if new.as_deref() != old {
                map.insert(d.store_key.clone(), new);
                rewritten += 1;
            }
        }
        if rewritten > 0 {
            record.attribute_will_change(attribute);
            record.write_attribute(attribute, Some(map));
        }
        Ok(rewritten)
    }
}

/// Every operation on one logical field
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
    overlay: &'a Overlay,
    descriptor: &'a FieldDescriptor,
}

impl<'a> FieldAccessor<'a> {
    /// Field descriptor
    pub fn descriptor(&self) -> &'a FieldDescriptor {
        self.descriptor
    }

    /// Logical name
    pub fn name(&self) -> &'a str {
        &self.descriptor.name
    }

    /// Declared type
    pub fn data_type(&self) -> DataType {
        self.descriptor.data_type
    }

    /// Store key
    pub fn store_key(&self) -> &'a str {
        &self.descriptor.store_key
    }

    /// Read the field
    pub fn get<R: HostRecord + ?Sized>(&self, record: &R) -> Result<Value> {
        self.overlay.read(record, self.name())
    }

    /// Write the field
    pub fn set<R: HostRecord + ?Sized>(&self, record: &mut R, value: impl Into<Value>) -> Result<()> {
        self.overlay.set(record, self.name(), value)
    }

    /// Write nil
    pub fn clear<R: HostRecord + ?Sized>(&self, record: &mut R) -> Result<()> {
        self.overlay.clear(record, self.name())
    }

    /// `<field>?`
    pub fn is_set<R: HostRecord + ?Sized>(&self, record: &R) -> Result<bool> {
        self.overlay.is_set(record, self.name())
    }

    /// `<field>_changed?`
    pub fn changed<R: HostRecord + ?Sized>(&self, record: &R) -> Result<bool> {
        self.overlay.changed(record, self.name())
    }

    /// `<field>_was`
    pub fn was<R: HostRecord + ?Sized>(&self, record: &R) -> Result<Value> {
        self.overlay.was(record, self.name())
    }

    /// `<field>_change`
    pub fn change<R: HostRecord + ?Sized>(&self, record: &R) -> Result<Option<(Value, Value)>> {
        self.overlay.change(record, self.name())
    }

    /// `<field>_will_change!`
    pub fn will_change<R: HostRecord + ?Sized>(&self, record: &mut R) -> Result<()> {
        self.overlay.will_change(record, self.name())
    }

    /// `restore_<field>!`
    pub fn restore<R: HostRecord + ?Sized>(&self, record: &mut R) -> Result<()> {
        self.overlay.restore(record, self.name())
    }

    /// `saved_change_to_<field>`
    pub fn saved_change<R: HostRecord + ?Sized>(
        &self,
        record: &R,
    ) -> Result<Option<(Value, Value)>> {
        self.overlay.saved_change(record, self.name())
    }

    /// `saved_change_to_<field>?`
    pub fn saved_changed<R: HostRecord + ?Sized>(&self, record: &R) -> Result<bool> {
        self.overlay.saved_changed(record, self.name())
    }

    /// The field's named predicates
    pub fn predicates(&self) -> Vec<NamedPredicate> {
        predicates_for(&self.overlay.column(), self.descriptor)
    }
}
