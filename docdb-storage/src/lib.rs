//! Storage crate: document repository over a CouchDB-style document service.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Document, SavedDocument, DocumentPage, ListOptions
//! - [`repository`] – DocumentService and Connector traits
//! - [`connection`] – ConnectionProvider (connect once, share the handle)
//! - [`document_repo`] – DocumentRepository
//! - [`events`] – RepositoryEvent
//! - [`memory`] – InMemoryConnector

mod connection;
mod document_repo;
mod error;
mod events;
mod memory;
mod models;
mod repository;

#[cfg(test)]
mod document_repo_test;

pub use connection::{ConnectionProvider, ConnectionState};
pub use document_repo::DocumentRepository;
pub use error::StorageError;
pub use events::{RepositoryEvent, EVENT_CHANNEL_CAPACITY};
pub use memory::{InMemoryConnector, InMemoryDatabase};
pub use models::{
    Document, DocumentPage, DocumentRow, ListOptions, RowValue, SavedDocument, DEFAULT_PAGE_SIZE,
    ID_FIELD, REV_FIELD,
};
pub use repository::{Connector, DocumentService};
