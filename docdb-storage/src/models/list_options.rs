//! Parameters for listing documents.

use serde::{Deserialize, Serialize};

/// Rows per page when no limit is given; matches the service default.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Include full document bodies in each row.
    pub include_docs: bool,
    pub limit: u32,
    /// Rows to skip (used with limit for paging).
    pub skip: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            include_docs: true,
            limit: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

impl ListOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub fn without_docs(mut self) -> Self {
        self.include_docs = false;
        self
    }

    /// Options for the page following one fetched with `self`.
    pub fn next_page(&self) -> Self {
        Self {
            skip: self.skip.saturating_add(self.limit),
            ..self.clone()
        }
    }
}
