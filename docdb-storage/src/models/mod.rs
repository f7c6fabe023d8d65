//! Data models for storage (documents, insert results, pages, list options).
//!
//! Used by DocumentRepository and the DocumentService implementations.

mod document;
mod document_page;
mod list_options;
mod saved_document;

pub use document::{Document, ID_FIELD, REV_FIELD};
pub use document_page::{DocumentPage, DocumentRow, RowValue};
pub use list_options::{ListOptions, DEFAULT_PAGE_SIZE};
pub use saved_document::SavedDocument;
