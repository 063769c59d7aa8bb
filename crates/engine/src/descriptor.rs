//! Field Descriptor Table
//!
//! A declaration names the physical attribute that owns the overlay and
//! lists its logical fields in order. Declaring validates every field before
//! anything is built, so a failed declaration leaves no state behind.

use std::collections::BTreeMap;

use overlay_core::{DataType, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CollisionPolicy;

/// How one field is declared: a bare type name, or a type plus store key
///
/// Untagged, so both `"string"` and
/// `{ data_type = "float", store_key = "w" }` deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Type name only; the store key is the field name
    Type(String),
    /// Type name with an explicit store key
    Keyed {
        /// Type name
        data_type: String,
        /// Store key, defaults to the field name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        store_key: Option<String>,
    },
}

impl FieldSpec {
    /// Type name with an explicit store key
    pub fn keyed(data_type: impl Into<String>, store_key: impl Into<String>) -> Self {
        FieldSpec::Keyed {
            data_type: data_type.into(),
            store_key: Some(store_key.into()),
        }
    }

    /// The declared type name, as written
    pub fn type_name(&self) -> &str {
        match self {
            FieldSpec::Type(t) => t,
            FieldSpec::Keyed { data_type, .. } => data_type,
        }
    }

    /// The explicit store key, if any
    pub fn store_key(&self) -> Option<&str> {
        match self {
            FieldSpec::Type(_) => None,
            FieldSpec::Keyed { store_key, .. } => store_key.as_deref(),
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(t: &str) -> Self {
        FieldSpec::Type(t.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(t: String) -> Self {
        FieldSpec::Type(t)
    }
}

impl From<DataType> for FieldSpec {
    fn from(t: DataType) -> Self {
        FieldSpec::Type(t.name().to_string())
    }
}

/// Immutable record of one declared logical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Logical field name
    pub name: String,
    /// Declared type
    pub data_type: DataType,
    /// Key inside the physical attribute
    pub store_key: String,
    /// Owning physical attribute
    pub owner: String,
}

/// An ordered overlay declaration
///
/// ```
/// use overlay_engine::{Declaration, FieldSpec};
///
/// let decl = Declaration::new("options")
///     .field("color", "string")
///     .field("weight", FieldSpec::keyed("float", "w"));
/// assert_eq!(decl.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    owner: String,
    fields: Vec<(String, FieldSpec)>,
}

impl Declaration {
    /// Start a declaration on a physical attribute
    pub fn new(owner: impl Into<String>) -> Self {
        Declaration {
            owner: owner.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.fields.push((name.into(), spec.into()));
        self
    }

    /// Add several fields, in iteration order
    pub fn fields_from<I, N, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<FieldSpec>,
    {
        self.fields
            .extend(fields.into_iter().map(|(n, s)| (n.into(), s.into())));
        self
    }

    /// Owning physical attribute
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Declared fields, verbatim
    pub fn fields(&self) -> &[(String, FieldSpec)] {
        &self.fields
    }
}

/// Validated descriptors of one overlay
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    owner: String,
    descriptors: Vec<FieldDescriptor>,
    declared: Vec<(String, FieldSpec)>,
    by_name: BTreeMap<String, usize>,
    /// store key -> descriptor that owns it for reads
    by_store_key: BTreeMap<String, usize>,
}

impl DescriptorTable {
    /// Validate a declaration and build its table
    ///
    /// # Errors
    ///
    /// - `InvalidDataType` for the first field with an unknown type
    /// - `DuplicateField` if a logical name appears twice
    /// - `DuplicateStoreKey` if two fields share a store key under
    ///   [`CollisionPolicy::Reject`]
    pub fn declare(declaration: Declaration, collisions: CollisionPolicy) -> Result<Self> {
        let Declaration { owner, fields } = declaration;

        let mut descriptors = Vec::with_capacity(fields.len());
        for (name, spec) in &fields {
            let data_type: DataType = spec.type_name().parse()?;
            let store_key = spec.store_key().unwrap_or(name).to_string();
            descriptors.push(FieldDescriptor {
                name: name.clone(),
                data_type,
                store_key,
                owner: owner.clone(),
            });
        }

        let mut by_name = BTreeMap::new();
        let mut by_store_key: BTreeMap<String, usize> = BTreeMap::new();
        for (i, d) in descriptors.iter().enumerate() {
            if by_name.insert(d.name.clone(), i).is_some() {
                return Err(Error::DuplicateField {
                    field: d.name.clone(),
                });
            }
            if let Some(prev) = by_store_key.insert(d.store_key.clone(), i) {
                let first = descriptors[prev].name.clone();
                match collisions {
                    CollisionPolicy::Reject => {
                        return Err(Error::DuplicateStoreKey {
                            attribute: owner,
                            store_key: d.store_key.clone(),
                            first,
                            second: d.name.clone(),
                        });
                    }
                    CollisionPolicy::LastWins => {
                        warn!(
                            attribute = %owner,
                            store_key = %d.store_key,
                            first = %first,
                            second = %d.name,
                            "store key declared twice; later field wins"
                        );
                    }
                }
            }
        }

        debug!(attribute = %owner, fields = descriptors.len(), "declared overlay");
        Ok(DescriptorTable {
            owner,
            descriptors,
            declared: fields,
            by_name,
            by_store_key,
        })
    }

    /// Owning physical attribute
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Descriptors in declaration order
    pub fn metadata(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// The declaration as written
    pub fn declared_fields(&self) -> &[(String, FieldSpec)] {
        &self.declared
    }

    /// Descriptor by logical name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.descriptors[i])
    }

    /// Descriptor that owns a store key
    pub fn by_store_key(&self, store_key: &str) -> Option<&FieldDescriptor> {
        self.by_store_key.get(store_key).map(|&i| &self.descriptors[i])
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no fields are declared
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterate descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.iter()
    }
}
