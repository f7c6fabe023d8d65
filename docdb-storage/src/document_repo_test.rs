//! Unit tests for DocumentRepository.
//!
//! Covers log output (sections, levels, details) and the event published per call.

use std::sync::{Arc, Mutex};

use docdb_core::{LogLevel, LogSink};
use serde_json::json;

use crate::document_repo::DocumentRepository;
use crate::error::StorageError;
use crate::events::RepositoryEvent;
use crate::memory::InMemoryConnector;
use crate::models::{Document, ListOptions};

#[derive(Debug, Clone)]
struct Entry {
    message: String,
    level: LogLevel,
    section: Option<String>,
    details: Option<String>,
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<Entry>>);

impl RecordingSink {
    fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap().clone()
    }

    fn at(&self, level: LogLevel) -> Vec<Entry> {
        self.entries().into_iter().filter(|e| e.level == level).collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, message: &str, level: LogLevel, section: Option<&str>, details: Option<&str>) {
        self.0.lock().unwrap().push(Entry {
            message: message.to_string(),
            level,
            section: section.map(str::to_string),
            details: details.map(str::to_string),
        });
    }
}

fn repo_with_sink(connector: InMemoryConnector) -> (DocumentRepository, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let repo = DocumentRepository::with_sink(Arc::new(connector), "test-database", sink.clone())
        .expect("Failed to create repository");
    (repo, sink)
}

#[tokio::test]
async fn test_save_logs_created_doc_at_info() {
    let (repo, sink) = repo_with_sink(InMemoryConnector::new());

    let saved = repo
        .save(&Document::new().with("title", "Test"))
        .await
        .expect("Failed to save document");

    let infos = sink.at(LogLevel::Info);
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].section.as_deref(), Some("DocumentRepository#save"));
    assert!(infos[0].message.starts_with("In db[test-database] created doc:"));
    assert!(infos[0].message.contains(&saved.id));
}

#[tokio::test]
async fn test_save_does_not_mutate_input() {
    let (repo, _sink) = repo_with_sink(InMemoryConnector::new());
    let doc = Document::new().with("title", "Test");
    let before = doc.clone();

    repo.save(&doc).await.expect("Failed to save document");

    assert_eq!(doc, before);
    assert!(doc.id().is_none());
}

#[tokio::test]
async fn test_get_logs_fetched_doc() {
    let (repo, sink) = repo_with_sink(InMemoryConnector::new());
    repo.save(&Document::new().with_id("p1").with("n", 1))
        .await
        .unwrap();

    repo.get("p1").await.expect("Failed to get document");

    let infos = sink.at(LogLevel::Info);
    let last = infos.last().unwrap();
    assert_eq!(last.section.as_deref(), Some("DocumentRepository#get"));
    assert!(last.message.starts_with("From db[test-database] got doc: {"));
}

#[tokio::test]
async fn test_get_missing_logs_error_and_publishes_get_error() {
    let (repo, sink) = repo_with_sink(InMemoryConnector::new());
    let mut events = repo.subscribe();

    let err = repo.get("nope").await.unwrap_err();

    assert!(err.is_not_found());
    let errors = sink.at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].section.as_deref(), Some("DocumentRepository#get"));
    assert!(errors[0].details.as_deref().unwrap().contains("nope"));

    let event = events.try_recv().unwrap();
    assert_eq!(event.name(), "get-error");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_get_empty_id_is_rejected_without_connecting() {
    let connector = InMemoryConnector::new();
    let (repo, _sink) = repo_with_sink(connector.clone());
    let mut events = repo.subscribe();

    let err = repo.get("  ").await.unwrap_err();

    assert!(matches!(err, StorageError::InvalidArgument(_)));
    assert_eq!(connector.connect_count(), 0);
    assert_eq!(events.try_recv().unwrap().name(), "get-error");
}

#[tokio::test]
async fn test_list_logs_each_row_at_verbose() {
    let (repo, sink) = repo_with_sink(InMemoryConnector::new());
    for id in ["a", "b", "c"] {
        repo.save(&Document::new().with_id(id)).await.unwrap();
    }

    let page = repo.list_all().await.expect("Failed to list documents");

    assert_eq!(page.len(), 3);
    let verbose = sink.at(LogLevel::Verbose);
    assert_eq!(verbose.len(), 3);
    assert!(verbose[0].message.starts_with("Row 0:\n"));
    assert!(verbose[2].message.starts_with("Row 2:\n"));
    assert!(verbose
        .iter()
        .all(|e| e.section.as_deref() == Some("DocumentRepository#list")));
}

#[tokio::test]
async fn test_list_error_event_carries_error() {
    let failure = StorageError::Connection("connection refused".to_string());
    let (repo, _sink) = repo_with_sink(InMemoryConnector::new().failing(failure.clone()));
    let mut events = repo.subscribe();

    let err = repo.list_all().await.unwrap_err();

    assert_eq!(err, failure);
    assert_eq!(
        events.try_recv().unwrap(),
        RepositoryEvent::GetDocsError(failure)
    );
}

#[tokio::test]
async fn test_connection_failure_is_logged_once_per_provider() {
    let failure = StorageError::Connection("ECONNREFUSED".to_string());
    let (repo, sink) = repo_with_sink(InMemoryConnector::new().failing(failure));

    let _ = repo.save(&Document::new()).await;
    let _ = repo.get("x").await;

    let connect_errors: Vec<Entry> = sink
        .at(LogLevel::Error)
        .into_iter()
        .filter(|e| e.section.as_deref() == Some("ConnectionProvider#connect"))
        .collect();
    assert_eq!(connect_errors.len(), 1);
    assert!(connect_errors[0].message.contains("db[test-database]"));
    // one error per failed operation on top of the connect error
    assert_eq!(sink.at(LogLevel::Error).len(), 3);
}

#[tokio::test]
async fn test_list_page_without_docs() {
    let (repo, _sink) = repo_with_sink(InMemoryConnector::new());
    repo.save(&Document::new().with_id("a").with("body", json!({"k": 1})))
        .await
        .unwrap();

    let page = repo
        .list_page(&ListOptions::default().without_docs())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert!(page.rows[0].doc.is_none());
    assert_eq!(page.documents().count(), 0);
}

#[test]
fn test_empty_collection_name_is_rejected() {
    let err = DocumentRepository::new(Arc::new(InMemoryConnector::new()), "").unwrap_err();
    assert!(matches!(err, StorageError::InvalidArgument(_)));
}
