//! Result of inserting a document.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by the service: the assigned id and new revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDocument {
    #[serde(default = "default_ok")]
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

fn default_ok() -> bool {
    true
}
