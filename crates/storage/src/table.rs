//! MemoryTable: a named collection of records
//!
//! Filters run against persisted state: each record is evaluated on its
//! attribute baseline, so unsaved changes are invisible to queries exactly
//! as they would be to a database.

use overlay_core::{stored, Condition, Error, HostRecord, Result};

use crate::eval::evaluate;
use crate::record::MemoryRecord;

/// Position of a record in its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// A named table of in-memory records
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    name: String,
    records: Vec<MemoryRecord>,
}

impl MemoryTable {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        MemoryTable {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Save a record and append it
    pub fn insert(&mut self, mut record: MemoryRecord) -> RecordId {
        record.save();
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    /// Look up a record
    pub fn get(&self, id: RecordId) -> Option<&MemoryRecord> {
        self.records.get(id.0)
    }

    /// Look up a record for modification
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut MemoryRecord> {
        self.records.get_mut(id.0)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of records whose persisted state satisfies `condition`, in
    /// insertion order
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` if the condition is qualified with a
    /// different table.
    pub fn filter(&self, condition: &Condition) -> Result<Vec<RecordId>> {
        if condition.column.table != self.name {
            return Err(Error::UnknownAttribute {
                attribute: condition.column.qualified(),
            });
        }
        let attribute = condition.column.attribute.as_str();
        Ok(self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                let value = record
                    .attribute_was(attribute)
                    .and_then(|map| stored(map, &condition.store_key));
                evaluate(&condition.test, value)
            })
            .map(|(i, _)| RecordId(i))
            .collect())
    }

    /// Ids of records satisfying every condition
    pub fn filter_all(&self, conditions: &[Condition]) -> Result<Vec<RecordId>> {
        let mut ids: Option<Vec<RecordId>> = None;
        for condition in conditions {
            let matched = self.filter(condition)?;
            ids = Some(match ids {
                None => matched,
                Some(prev) => prev.into_iter().filter(|id| matched.contains(id)).collect(),
            });
        }
        Ok(ids.unwrap_or_else(|| (0..self.records.len()).map(RecordId).collect()))
    }
}
