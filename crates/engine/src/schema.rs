//! Host schema: every overlay declared on one host table
//!
//! A host may carry overlays on several physical attributes. Logical field
//! names are unique across all of them, and each field's named predicates
//! are registered as scopes on the host.
//!
//! The schema also answers the host's reflection queries: the declared type
//! of a logical field, and a synthesized column description for it.

use std::collections::BTreeMap;

use overlay_core::{Condition, DataType, Error, HostRecord, QueryBuilder, Result, Value};
use serde::Serialize;
use tracing::debug;

use crate::config::OverlayConfig;
use crate::descriptor::{Declaration, FieldDescriptor};
use crate::overlay::Overlay;
use crate::predicate::NamedPredicate;

/// Column description synthesized for a logical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Logical field name
    pub name: String,
    /// Declared type
    pub data_type: DataType,
    /// Column type as the host would report it
    pub sql_type: &'static str,
    /// Owning physical attribute
    pub owner: String,
    /// Key inside the physical attribute
    pub store_key: String,
}

impl From<&FieldDescriptor> for ColumnInfo {
    fn from(d: &FieldDescriptor) -> Self {
        ColumnInfo {
            name: d.name.clone(),
            data_type: d.data_type,
            sql_type: d.data_type.column_type(),
            owner: d.owner.clone(),
            store_key: d.store_key.clone(),
        }
    }
}

/// All overlays of one host table
#[derive(Debug, Clone)]
pub struct HostSchema {
    table: String,
    config: OverlayConfig,
    overlays: Vec<Overlay>,
    /// logical field -> index into `overlays`
    field_index: BTreeMap<String, usize>,
    scopes: BTreeMap<String, NamedPredicate>,
}

impl HostSchema {
    /// Empty schema for `table` with the default configuration
    pub fn new(table: impl Into<String>) -> Self {
        HostSchema {
            table: table.into(),
            config: OverlayConfig::default(),
            overlays: Vec::new(),
            field_index: BTreeMap::new(),
            scopes: BTreeMap::new(),
        }
    }

    /// Use `config` for overlays declared from now on
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration applied to new declarations
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Host table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declare an overlay on one physical attribute
    ///
    /// Nothing is registered unless the whole declaration is valid.
    ///
    /// # Errors
    ///
    /// - `DuplicateAttribute` if the attribute already carries an overlay
    /// - `DuplicateField` if a field name is taken by another overlay
    /// - `DuplicateScope` if two fields would generate the same predicate name
    /// - any error of [`Overlay::new`]
    pub fn declare(&mut self, declaration: Declaration) -> Result<&Overlay> {
        if self.overlays.iter().any(|o| o.attribute() == declaration.owner()) {
            return Err(Error::DuplicateAttribute {
                attribute: declaration.owner().to_string(),
            });
        }
        let overlay = Overlay::new(self.table.clone(), declaration, self.config)?;
        if let Some(taken) = overlay
            .metadata()
            .iter()
            .find(|d| self.field_index.contains_key(&d.name))
        {
            return Err(Error::DuplicateField {
                field: taken.name.clone(),
            });
        }

        let mut predicates: BTreeMap<String, NamedPredicate> = BTreeMap::new();
        for predicate in overlay.predicates() {
            let owner = self
                .scopes
                .get(&predicate.name)
                .or_else(|| predicates.get(&predicate.name));
            if let Some(owner) = owner {
                return Err(Error::DuplicateScope {
                    scope: predicate.name.clone(),
                    first: owner.field.clone(),
                    second: predicate.field.clone(),
                });
            }
            predicates.insert(predicate.name.clone(), predicate);
        }

        let index = self.overlays.len();
        for d in overlay.metadata() {
            self.field_index.insert(d.name.clone(), index);
        }
        self.scopes.extend(predicates);
        debug!(
            table = %self.table,
            attribute = %overlay.attribute(),
            scopes = self.scopes.len(),
            "registered overlay"
        );
        self.overlays.push(overlay);
        Ok(&self.overlays[index])
    }

    /// Overlay on a physical attribute
    pub fn overlay(&self, attribute: &str) -> Result<&Overlay> {
        self.overlays
            .iter()
            .find(|o| o.attribute() == attribute)
            .ok_or_else(|| Error::UnknownAttribute {
                attribute: attribute.to_string(),
            })
    }

    /// Descriptors of the overlay on `attribute`, in declaration order
    pub fn metadata_for(&self, attribute: &str) -> Result<&[FieldDescriptor]> {
        Ok(self.overlay(attribute)?.metadata())
    }

    /// Overlay that declares `field`
    pub fn overlay_for_field(&self, field: &str) -> Result<&Overlay> {
        self.field_index
            .get(field)
            .map(|&i| &self.overlays[i])
            .ok_or_else(|| Error::UnknownField {
                field: field.to_string(),
            })
    }

    /// Overlays in declaration order
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Named predicate by name
    pub fn scope(&self, name: &str) -> Result<&NamedPredicate> {
        self.scopes.get(name).ok_or_else(|| Error::UnknownScope {
            scope: name.to_string(),
        })
    }

    /// Every registered named predicate, by name
    pub fn scopes(&self) -> impl Iterator<Item = &NamedPredicate> {
        self.scopes.values()
    }

    /// Build the condition for a named predicate
    pub fn filter(&self, scope: &str, args: &[Value]) -> Result<Condition> {
        self.scope(scope)?.apply(args)
    }

    /// Narrow `query` by a named predicate
    pub fn apply_scope<Q: QueryBuilder>(&self, query: Q, scope: &str, args: &[Value]) -> Result<Q> {
        Ok(self.filter(scope, args)?.apply(query))
    }

    /// Declared type of a logical field
    pub fn type_for_attribute(&self, field: &str) -> Option<DataType> {
        self.descriptor(field).map(|d| d.data_type)
    }

    /// Synthesized column description of a logical field
    pub fn column_for_attribute(&self, field: &str) -> Option<ColumnInfo> {
        self.descriptor(field).map(ColumnInfo::from)
    }

    /// Read a logical field of any overlay
    pub fn read<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Result<Value> {
        self.overlay_for_field(field)?.read(record, field)
    }

    /// Write a logical field of any overlay
    pub fn write<R: HostRecord + ?Sized>(
        &self,
        record: &mut R,
        field: &str,
        value: &Value,
    ) -> Result<()> {
        self.overlay_for_field(field)?.write(record, field, value)
    }

    /// [`HostSchema::write`] taking anything convertible into a [`Value`]
    pub fn set<R: HostRecord + ?Sized>(
        &self,
        record: &mut R,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.write(record, field, &value.into())
    }

    fn descriptor(&self, field: &str) -> Option<&FieldDescriptor> {
        let overlay = self.overlay_for_field(field).ok()?;
        overlay.descriptors().get(field)
    }
}
