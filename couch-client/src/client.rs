use std::sync::Arc;

use async_trait::async_trait;
use docdb_core::{ConfigError, DbConfig, LogSink, TracingLogSink};
use docdb_storage::{
    Connector, Document, DocumentPage, DocumentService, ListOptions, SavedDocument, StorageError,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::{error_from_response, transport_error};

const SECTION: &str = "CouchConnector#connect";

/// Shared HTTP state: one reqwest client (and its connection pool) per connector.
struct Http {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl std::fmt::Debug for Http {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Http")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Http {
    fn url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StorageError::Config(ConfigError::Invalid {
                    var: "DB_URL",
                    reason: "URL cannot be a base".to_string(),
                })
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        subject: &str,
    ) -> Result<T, StorageError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), subject = %subject, "Document service responded");

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| StorageError::Serialization(e.without_url().to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_from_response(status.as_u16(), &body, subject))
        }
    }
}

/// Connects to a CouchDB/Cloudant endpoint with basic-auth credentials.
#[derive(Clone)]
pub struct CouchConnector {
    http: Arc<Http>,
    sink: Arc<dyn LogSink>,
}

impl CouchConnector {
    /// Builds a connector for the endpoint in `config`. No request is made yet.
    pub fn new(config: &DbConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .user_agent(concat!("docdb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http: Arc::new(Http {
                client,
                base_url: config.url.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
            }),
            sink: Arc::new(TracingLogSink::new()),
        })
    }

    /// Reads `DB_URL`, `DB_USER` and `DB_PASS`; a missing value is `StorageError::Config`.
    pub fn from_env() -> Result<Self, StorageError> {
        let config = DbConfig::from_env()?;
        Self::new(&config)
    }

    /// Routes the ping log line through `sink` instead of tracing.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.http.base_url
    }

    /// Health check: `GET /` returns the service's welcome object.
    pub async fn ping(&self) -> Result<Value, StorageError> {
        let url = self.http.url(&[])?;
        self.http.send(self.http.client.get(url), "ping").await
    }
}

impl std::fmt::Debug for CouchConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouchConnector")
            .field("base_url", &self.http.base_url.as_str())
            .field("username", &self.http.username)
            .finish()
    }
}

#[async_trait]
impl Connector for CouchConnector {
    async fn connect(&self, collection: &str) -> Result<Arc<dyn DocumentService>, StorageError> {
        let pong = self.ping().await.map_err(|err| match err {
            StorageError::Config(e) => StorageError::Config(e),
            other => StorageError::Connection(format!(
                "Failed to initialize {}: {}",
                self.http.base_url.host_str().unwrap_or("document service"),
                other
            )),
        })?;

        let rendered = serde_json::to_string_pretty(&pong).unwrap_or_else(|_| pong.to_string());
        self.sink.info(&format!("Ping Result: {}", rendered), SECTION);

        Ok(Arc::new(CouchDatabase {
            http: Arc::clone(&self.http),
            name: collection.to_string(),
        }))
    }
}

/// Handle to one database on the server.
#[derive(Debug, Clone)]
pub struct CouchDatabase {
    http: Arc<Http>,
    name: String,
}

#[async_trait]
impl DocumentService for CouchDatabase {
    fn collection(&self) -> &str {
        &self.name
    }

    /// `POST /{db}`; the server assigns `_id` when absent.
    async fn insert(&self, doc: &Document) -> Result<SavedDocument, StorageError> {
        let url = self.http.url(&[self.name.as_str()])?;
        let subject = doc.id().unwrap_or("new document");
        self.http
            .send(self.http.client.post(url).json(doc), subject)
            .await
    }

    /// `GET /{db}/{id}`; the id is sent as a single encoded path segment.
    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        let url = self.http.url(&[self.name.as_str(), id])?;
        self.http.send(self.http.client.get(url), id).await
    }

    /// `GET /{db}/_all_docs` with `include_docs`, `limit` and `skip`.
    async fn list(&self, options: &ListOptions) -> Result<DocumentPage, StorageError> {
        let url = self.http.url(&[self.name.as_str(), "_all_docs"])?;
        let mut query = vec![
            ("include_docs", options.include_docs.to_string()),
            ("limit", options.limit.to_string()),
        ];
        if options.skip > 0 {
            query.push(("skip", options.skip.to_string()));
        }
        self.http
            .send(self.http.client.get(url).query(&query), &self.name)
            .await
    }
}
