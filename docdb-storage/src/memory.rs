//! # In-memory document service
//!
//! [`InMemoryConnector`] implements [`Connector`] without a network, for tests and local
//! development. Collections live as long as the connector; data is lost on drop.
//!
//! Behaves like the real service where the repository can observe it: ids are assigned on
//! insert, revisions follow the `<generation>-<hex>` form, stale revisions conflict, and
//! listings are ordered by id.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{
    Document, DocumentPage, DocumentRow, ListOptions, RowValue, SavedDocument, ID_FIELD, REV_FIELD,
};
use crate::repository::{Connector, DocumentService};

type Collection = BTreeMap<String, Document>;

/// Connector backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    collections: Arc<RwLock<HashMap<String, Arc<RwLock<Collection>>>>>,
    connect_calls: Arc<AtomicUsize>,
    connect_delay: Option<Duration>,
    failure: Option<StorageError>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every handshake; useful to exercise concurrent first use.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Makes every handshake fail with `err`.
    pub fn failing(mut self, err: StorageError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Number of handshakes attempted so far.
    pub fn connect_count(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    async fn connect(&self, collection: &str) -> Result<Arc<dyn DocumentService>, StorageError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let docs = {
            let mut collections = self.collections.write().await;
            Arc::clone(collections.entry(collection.to_string()).or_default())
        };
        info!(collection = %collection, "Ping Result: in-memory service ready");

        Ok(Arc::new(InMemoryDatabase {
            name: collection.to_string(),
            docs,
        }))
    }
}

/// Handle to one in-memory collection.
#[derive(Debug, Clone)]
pub struct InMemoryDatabase {
    name: String,
    docs: Arc<RwLock<Collection>>,
}

impl InMemoryDatabase {
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn next_rev(current: Option<&str>) -> String {
    let generation = current
        .and_then(|rev| rev.split('-').next())
        .and_then(|g| g.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-{}", generation + 1, Uuid::new_v4().simple())
}

#[async_trait]
impl DocumentService for InMemoryDatabase {
    fn collection(&self) -> &str {
        &self.name
    }

    async fn insert(&self, doc: &Document) -> Result<SavedDocument, StorageError> {
        let mut docs = self.docs.write().await;

        let id = match doc.id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };
        let current_rev = docs.get(&id).and_then(|d| d.rev()).map(str::to_string);
        if current_rev.as_deref() != doc.rev() {
            return Err(StorageError::Conflict(format!(
                "Document update conflict for {}",
                id
            )));
        }

        let rev = next_rev(current_rev.as_deref());
        let mut stored = doc.clone();
        stored.insert(ID_FIELD, Value::String(id.clone()));
        stored.insert(REV_FIELD, Value::String(rev.clone()));
        docs.insert(id.clone(), stored);

        Ok(SavedDocument { ok: true, id, rev })
    }

    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        self.docs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{} (missing)", id)))
    }

    async fn list(&self, options: &ListOptions) -> Result<DocumentPage, StorageError> {
        let docs = self.docs.read().await;
        let rows = docs
            .iter()
            .skip(options.skip as usize)
            .take(options.limit as usize)
            .map(|(id, doc)| DocumentRow {
                id: id.clone(),
                key: Value::String(id.clone()),
                value: RowValue {
                    rev: doc.rev().unwrap_or_default().to_string(),
                },
                doc: options.include_docs.then(|| doc.clone()),
            })
            .collect();

        Ok(DocumentPage {
            total_rows: docs.len() as u64,
            offset: options.skip as u64,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn database(name: &str) -> Arc<dyn DocumentService> {
        InMemoryConnector::new().connect(name).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_first_revision() {
        let db = database("notes").await;

        let saved = db.insert(&Document::new().with("n", 1)).await.unwrap();

        assert!(saved.ok);
        assert_eq!(saved.id.len(), 32);
        assert!(saved.rev.starts_with("1-"));
        let stored = db.get(&saved.id).await.unwrap();
        assert_eq!(stored.rev(), Some(saved.rev.as_str()));
    }

    #[tokio::test]
    async fn test_update_requires_current_revision() {
        let db = database("notes").await;
        let saved = db.insert(&Document::new().with_id("a")).await.unwrap();

        let stale = db.insert(&Document::new().with_id("a")).await.unwrap_err();
        assert!(matches!(stale, StorageError::Conflict(_)));

        let update = Document::new()
            .with_id("a")
            .with(REV_FIELD, saved.rev.clone())
            .with("posts", json!([{"title": "Test"}]));
        let updated = db.insert(&update).await.unwrap();
        assert!(updated.rev.starts_with("2-"));
    }

    #[tokio::test]
    async fn test_list_orders_by_id_and_pages() {
        let db = database("notes").await;
        for id in ["c", "a", "b"] {
            db.insert(&Document::new().with_id(id)).await.unwrap();
        }

        let page = db
            .list(&ListOptions::default().with_limit(2).with_skip(1))
            .await
            .unwrap();

        assert_eq!(page.total_rows, 3);
        assert_eq!(page.offset, 1);
        let ids: Vec<&str> = page.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated_but_shared_across_connects() {
        let connector = InMemoryConnector::new();
        let first = connector.connect("one").await.unwrap();
        first.insert(&Document::new().with_id("x")).await.unwrap();

        let again = connector.connect("one").await.unwrap();
        let other = connector.connect("two").await.unwrap();

        assert!(again.get("x").await.is_ok());
        assert!(other.get("x").await.unwrap_err().is_not_found());
        assert_eq!(connector.connect_count(), 3);
    }
}
