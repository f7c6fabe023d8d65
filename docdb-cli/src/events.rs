//! Background task that logs repository events until the repository is dropped.

use docdb_storage::RepositoryEvent;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub fn spawn_event_logger(mut events: Receiver<RepositoryEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(event = event.name(), "Repository event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event listener lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Waits for the logger task; a panic or cancellation is logged and reported as `false`.
pub async fn join_event_logger(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Event listener task failed");
            false
        }
    }
}
