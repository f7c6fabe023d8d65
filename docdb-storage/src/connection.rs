//! Lazily established, memoized connection to one collection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use docdb_core::LogSink;
use tokio::sync::watch;
use tracing::debug;

use crate::error::StorageError;
use crate::repository::{Connector, DocumentService};

const SECTION: &str = "ConnectionProvider#connect";

type Outcome = Result<Arc<dyn DocumentService>, StorageError>;

/// Lifecycle of the shared handle. `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    Failed,
}

/// Connects at most once; every caller shares the same handle or the same error.
///
/// The handshake runs on its own task, so a caller that stops waiting does not cancel it.
pub struct ConnectionProvider {
    connector: Arc<dyn Connector>,
    collection: String,
    outcome: Arc<watch::Sender<Option<Outcome>>>,
    started: AtomicBool,
    sink: Arc<dyn LogSink>,
}

impl ConnectionProvider {
    /// Creates the provider without connecting. `collection` must be non-empty.
    pub fn new(
        connector: Arc<dyn Connector>,
        collection: impl Into<String>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, StorageError> {
        let collection = collection.into();
        if collection.trim().is_empty() {
            return Err(StorageError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }

        let (outcome, _) = watch::channel(None);
        Ok(Self {
            connector,
            collection,
            outcome: Arc::new(outcome),
            started: AtomicBool::new(false),
            sink,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the shared handle, starting the handshake on first use.
    ///
    /// Concurrent callers wait on the same in-flight handshake. A failed handshake is
    /// remembered: later calls get the same error without reconnecting.
    pub async fn handle(&self) -> Outcome {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.spawn_connect();
        }

        let mut updates = self.outcome.subscribe();
        let settled = updates.wait_for(Option::is_some).await.map_err(|_| {
            StorageError::Connection(format!(
                "Connection to db[{}] was dropped before it settled",
                self.collection
            ))
        })?;
        settled.clone().unwrap_or_else(|| {
            Err(StorageError::Connection(format!(
                "Connection to db[{}] has no outcome",
                self.collection
            )))
        })
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.outcome.borrow() {
            Some(Ok(_)) => ConnectionState::Ready,
            Some(Err(_)) => ConnectionState::Failed,
            None if self.started.load(Ordering::SeqCst) => ConnectionState::Connecting,
            None => ConnectionState::Uninitialized,
        }
    }

    fn spawn_connect(&self) {
        let connector = Arc::clone(&self.connector);
        let collection = self.collection.clone();
        let outcome = Arc::clone(&self.outcome);
        let sink = Arc::clone(&self.sink);

        debug!(collection = %collection, "Connecting to document service");
        tokio::spawn(async move {
            let name = collection.clone();
            let attempt = tokio::spawn(async move { connector.connect(&name).await }).await;
            let result = match attempt {
                Ok(result) => result,
                Err(join) => Err(StorageError::Connection(format!(
                    "Handshake for db[{}] aborted: {}",
                    collection, join
                ))),
            };

            match &result {
                Ok(_) => debug!(collection = %collection, "Connection ready"),
                Err(err) => sink.error(
                    &format!("Failed to connect to db[{}]: {}", collection, err),
                    SECTION,
                    Some(err),
                ),
            }
            outcome.send_replace(Some(result));
        });
    }
}

impl std::fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("collection", &self.collection)
            .field("state", &self.state())
            .finish()
    }
}
