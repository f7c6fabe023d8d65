//! Mapping of HTTP failures onto [`StorageError`].

use docdb_storage::StorageError;
use serde::Deserialize;

/// Error body returned by the service, e.g. `{"error":"not_found","reason":"missing"}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

/// Classifies a non-2xx response. `subject` names the document or database involved.
pub(crate) fn error_from_response(status: u16, body: &str, subject: &str) -> StorageError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let error = if parsed.error.is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown")
            .to_string()
    } else {
        parsed.error
    };
    let reason = if parsed.reason.is_empty() {
        body.trim().to_string()
    } else {
        parsed.reason
    };

    match status {
        404 => StorageError::NotFound(format!("{} ({})", subject, reason)),
        409 => StorageError::Conflict(format!("{} ({})", subject, reason)),
        401 | 403 => StorageError::Unauthorized(reason),
        _ => StorageError::Remote {
            status,
            error,
            reason,
        },
    }
}

/// Network-level failure; the URL is dropped so credentials embedded in it never reach logs.
pub(crate) fn transport_error(err: reqwest::Error) -> StorageError {
    let timeout = err.is_timeout();
    let message = err.without_url().to_string();
    if timeout {
        StorageError::Transport(format!("timed out: {}", message))
    } else {
        StorageError::Transport(message)
    }
}
