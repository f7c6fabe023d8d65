//! # CouchDB / Cloudant client
//!
//! This crate implements the `Connector` and `DocumentService` traits from `docdb-storage`
//! over the CouchDB HTTP API, which Cloudant also serves.
//!
//! ## CouchConnector
//!
//! Holds the endpoint, credentials and a shared `reqwest` client. `connect` pings the server
//! once and binds a [`CouchDatabase`] to the requested database name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use couch_client::CouchConnector;
//! use docdb_storage::{Document, DocumentRepository};
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     // DB_URL, DB_USER and DB_PASS must be set
//!     let connector = CouchConnector::from_env()?;
//!     let repo = DocumentRepository::new(Arc::new(connector), "party-post")?;
//!
//!     let saved = repo.save(&Document::new().with("title", "Hello")).await?;
//!     let doc = repo.get(&saved.id).await?;
//!     println!("{:?}", doc);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints used
//!
//! - `GET /` – ping
//! - `POST /{db}` – insert
//! - `GET /{db}/{id}` – fetch by id
//! - `GET /{db}/_all_docs?include_docs=..&limit=..&skip=..` – list
//!
//! Non-2xx responses map to `StorageError`: 404 → `NotFound`, 409 → `Conflict`,
//! 401/403 → `Unauthorized`, anything else → `Remote`.

mod client;
mod errors;

pub use client::{CouchConnector, CouchDatabase};
