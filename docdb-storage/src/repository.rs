//! Capabilities of the remote document service.
//!
//! [`Connector`] performs the handshake and hands back a [`DocumentService`] bound to one
//! collection. Implemented over HTTP by `couch-client` and in memory by [`crate::InMemoryConnector`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{Document, DocumentPage, ListOptions, SavedDocument};

/// Document operations against a single collection. Shared read-only by concurrent callers.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Name of the collection this handle is bound to.
    fn collection(&self) -> &str;

    /// Stores `doc`; the service assigns `_id` when the document has none.
    async fn insert(&self, doc: &Document) -> Result<SavedDocument, StorageError>;

    /// Fetches a document by id. A missing document is `StorageError::NotFound`.
    async fn get(&self, id: &str) -> Result<Document, StorageError>;

    /// Returns a single page of rows ordered by id.
    async fn list(&self, options: &ListOptions) -> Result<DocumentPage, StorageError>;
}

/// Establishes the connection to the service.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Pings the service and binds a handle to `collection`. Never retries.
    async fn connect(&self, collection: &str) -> Result<Arc<dyn DocumentService>, StorageError>;
}
