//! Attribute tables attached to layers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single attribute record.
pub type Record = Map<String, Value>;

/// An ordered list of attribute rows, aligned with a layer's shapes.
///
/// A row may be missing (`None`); it is written as `null` on export rather
/// than as an empty object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    records: Vec<Option<Record>>,
}

impl DataTable {
    /// Builds a table whose rows may be missing.
    pub fn from_rows(rows: Vec<Option<Record>>) -> Self {
        Self { records: rows }
    }

    pub fn rows(&self) -> &[Option<Record>] {
        &self.records
    }

    /// The record for shape `i`; `None` if the row is missing or null.
    pub fn get(&self, i: usize) -> Option<&Record> {
        self.records.get(i).and_then(Option::as_ref)
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }
}
