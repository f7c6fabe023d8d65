//! Storage error types.
//!
//! Returned by repository operations and carried by error events, hence `Clone`.

use docdb_core::ConfigError;
use thiserror::Error;

/// Errors that can occur when talking to the document service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Remote error ({status}) {error}: {reason}")]
    Remote {
        status: u16,
        error: String,
        reason: String,
    },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// True when the failure happened before or while reaching the service.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StorageError::Config(_) | StorageError::Connection(_) | StorageError::Transport(_)
        )
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
