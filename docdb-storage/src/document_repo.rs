//! Document repository: save, fetch and list documents in one collection.
//!
//! Uses ConnectionProvider for the shared handle and publishes a RepositoryEvent per call.
//! External: the document service behind the Connector; log output through LogSink.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use docdb_core::{LogSink, TracingLogSink};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::connection::{ConnectionProvider, ConnectionState};
use crate::error::StorageError;
use crate::events::{RepositoryEvent, EVENT_CHANNEL_CAPACITY};
use crate::models::{Document, DocumentPage, ListOptions, SavedDocument};
use crate::repository::{Connector, DocumentService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Save,
    Get,
    List,
}

impl Operation {
    fn section(self) -> &'static str {
        match self {
            Operation::Save => "DocumentRepository#save",
            Operation::Get => "DocumentRepository#get",
            Operation::List => "DocumentRepository#list",
        }
    }

    fn error_event(self, err: StorageError) -> RepositoryEvent {
        match self {
            Operation::Save => RepositoryEvent::SaveError(err),
            Operation::Get => RepositoryEvent::GetError(err),
            Operation::List => RepositoryEvent::GetDocsError(err),
        }
    }
}

/// Successful payload of an operation: knows how to log itself and which event it becomes.
trait Outcome: Clone {
    fn log_success(&self, sink: &dyn LogSink, collection: &str, section: &str);
    fn into_event(self) -> RepositoryEvent;
}

impl Outcome for SavedDocument {
    fn log_success(&self, sink: &dyn LogSink, collection: &str, section: &str) {
        sink.info(
            &format!("In db[{}] created doc: {}", collection, pretty(self)),
            section,
        );
    }

    fn into_event(self) -> RepositoryEvent {
        RepositoryEvent::SaveSuccess(self)
    }
}

impl Outcome for Document {
    fn log_success(&self, sink: &dyn LogSink, collection: &str, section: &str) {
        let compact = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        sink.info(&format!("From db[{}] got doc: {}", collection, compact), section);
    }

    fn into_event(self) -> RepositoryEvent {
        RepositoryEvent::GetSuccess(self)
    }
}

impl Outcome for DocumentPage {
    fn log_success(&self, sink: &dyn LogSink, _collection: &str, section: &str) {
        for (index, row) in self.rows.iter().enumerate() {
            sink.verbose(&format!("Row {}:\n {}", index, pretty(row)), section);
        }
    }

    fn into_event(self) -> RepositoryEvent {
        RepositoryEvent::GetDocsSuccess(self)
    }
}

fn pretty<T: Serialize + Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:?}", value))
}

/// Repository over one collection. Clones share the connection and the event channel.
#[derive(Clone)]
pub struct DocumentRepository {
    connection: Arc<ConnectionProvider>,
    events: broadcast::Sender<RepositoryEvent>,
    sink: Arc<dyn LogSink>,
}

impl DocumentRepository {
    /// Creates a repository logging through tracing. Does not connect yet.
    pub fn new(
        connector: Arc<dyn Connector>,
        collection: impl Into<String>,
    ) -> Result<Self, StorageError> {
        Self::with_sink(connector, collection, Arc::new(TracingLogSink::new()))
    }

    pub fn with_sink(
        connector: Arc<dyn Connector>,
        collection: impl Into<String>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, StorageError> {
        let connection = ConnectionProvider::new(connector, collection, Arc::clone(&sink))?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            connection: Arc::new(connection),
            events,
            sink,
        })
    }

    pub fn collection(&self) -> &str {
        self.connection.collection()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Establishes the connection ahead of the first operation. Publishes no event.
    pub async fn connect(&self) -> Result<(), StorageError> {
        self.connection.handle().await.map(|_| ())
    }

    /// Subscribes to outcome events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent> {
        self.events.subscribe()
    }

    /// Inserts `doc`. The caller's document is left untouched; the result carries the
    /// assigned id and revision. Publishes `save-success` or `save-error`.
    pub async fn save(&self, doc: &Document) -> Result<SavedDocument, StorageError> {
        self.execute(Operation::Save, |db| async move { db.insert(doc).await })
            .await
    }

    /// Fetches a document by id. Publishes `get-success` or `get-error`.
    pub async fn get(&self, id: &str) -> Result<Document, StorageError> {
        if id.trim().is_empty() {
            return Err(self.fail(
                Operation::Get,
                StorageError::InvalidArgument("document id must not be empty".to_string()),
            ));
        }
        self.execute(Operation::Get, |db| async move { db.get(id).await })
            .await
    }

    /// Lists one page of documents with bodies included (at most
    /// [`crate::DEFAULT_PAGE_SIZE`] rows). Later pages are not fetched; see [`Self::list_page`].
    /// Publishes `get-docs-success` or `get-docs-error`.
    pub async fn list_all(&self) -> Result<DocumentPage, StorageError> {
        self.list_page(&ListOptions::default()).await
    }

    /// Lists the page described by `options`. Publishes the same events as [`Self::list_all`].
    pub async fn list_page(&self, options: &ListOptions) -> Result<DocumentPage, StorageError> {
        self.execute(Operation::List, |db| async move { db.list(options).await })
            .await
    }

    /// Awaits the shared connection, runs `call`, then logs, publishes and settles.
    async fn execute<T, F, Fut>(&self, op: Operation, call: F) -> Result<T, StorageError>
    where
        T: Outcome,
        F: FnOnce(Arc<dyn DocumentService>) -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let result = match self.connection.handle().await {
            Ok(db) => call(db).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(value) => {
                value.log_success(self.sink.as_ref(), self.collection(), op.section());
                self.emit(value.clone().into_event());
                Ok(value)
            }
            Err(err) => Err(self.fail(op, err)),
        }
    }

    fn fail(&self, op: Operation, err: StorageError) -> StorageError {
        self.sink.error(
            &format!("db[{}]: {}", self.collection(), err),
            op.section(),
            Some(&err),
        );
        self.emit(op.error_event(err.clone()));
        err
    }

    fn emit(&self, event: RepositoryEvent) {
        let name = event.name();
        // send only fails when nobody is subscribed
        match self.events.send(event) {
            Ok(listeners) => debug!(event = name, listeners, "Published repository event"),
            Err(_) => debug!(event = name, "Published repository event with no listeners"),
        }
    }
}

impl std::fmt::Debug for DocumentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRepository")
            .field("connection", &self.connection)
            .field("listeners", &self.events.receiver_count())
            .finish()
    }
}
