//! One page of the all-documents listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Document;

/// Rows plus the service's totals. `offset` is the index of the first row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub offset: u64,
    pub rows: Vec<DocumentRow>,
}

impl DocumentPage {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Documents carried by the rows; empty when listed without bodies.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.rows.iter().filter_map(|row| row.doc.as_ref())
    }

    /// True when rows remain past this page.
    pub fn has_more(&self) -> bool {
        self.offset + (self.rows.len() as u64) < self.total_rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: String,
    pub key: Value,
    pub value: RowValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValue {
    pub rev: String,
}
