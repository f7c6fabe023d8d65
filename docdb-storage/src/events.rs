//! Outcome events published by [`crate::DocumentRepository`].
//!
//! Every repository call publishes exactly one event. Delivery goes through a
//! `tokio::sync::broadcast` channel, so listeners run on their own tasks and cannot
//! disturb the operation or each other.

use crate::error::StorageError;
use crate::models::{Document, DocumentPage, SavedDocument};

/// Capacity of the broadcast buffer; lagging receivers skip older events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryEvent {
    SaveSuccess(SavedDocument),
    SaveError(StorageError),
    GetSuccess(Document),
    GetError(StorageError),
    GetDocsSuccess(DocumentPage),
    GetDocsError(StorageError),
}

impl RepositoryEvent {
    /// Event name, e.g. `save-success`.
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryEvent::SaveSuccess(_) => "save-success",
            RepositoryEvent::SaveError(_) => "save-error",
            RepositoryEvent::GetSuccess(_) => "get-success",
            RepositoryEvent::GetError(_) => "get-error",
            RepositoryEvent::GetDocsSuccess(_) => "get-docs-success",
            RepositoryEvent::GetDocsError(_) => "get-docs-error",
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    pub fn error(&self) -> Option<&StorageError> {
        match self {
            RepositoryEvent::SaveError(e)
            | RepositoryEvent::GetError(e)
            | RepositoryEvent::GetDocsError(e) => Some(e),
            _ => None,
        }
    }
}
