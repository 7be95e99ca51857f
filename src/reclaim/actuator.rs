use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::directory::{DirectoryApi, DirectoryError};

use super::inspector::SessionInspector;
use super::report::ReclamationOutcome;

/// Issues termination requests and verifies they took effect.
pub struct ReclamationActuator {
    api: Arc<dyn DirectoryApi>,
    inspector: SessionInspector,
    grace: Duration,
}

impl ReclamationActuator {
    pub fn new(api: Arc<dyn DirectoryApi>, grace: Duration) -> Self {
        let inspector = SessionInspector::new(Arc::clone(&api));
        Self {
            api,
            inspector,
            grace,
        }
    }

    /// Terminate a session, wait out the grace interval, then re-inspect to
    /// classify what actually happened.
    ///
    /// Termination is asynchronous on the directory side, so the observed
    /// state always wins over the request having been accepted: a session
    /// still in progress after the grace interval is `Failed` even though
    /// the terminate call succeeded. A `SessionNotFound` from the terminate
    /// call means the session was already gone; that is `NotFound`, not a
    /// new error.
    pub async fn reclaim(&self, id: &str) -> Result<ReclamationOutcome, DirectoryError> {
        info!("Requesting termination of session {}", id);

        match self.api.terminate_session(id).await {
            Ok(()) => {}
            Err(DirectoryError::SessionNotFound(_)) => {
                info!("Session {} already gone before termination", id);
                return Ok(ReclamationOutcome::NotFound);
            }
            Err(e) => return Err(e),
        }

        // Give the directory time to process the disconnect.
        tokio::time::sleep(self.grace).await;

        let outcome = match self.inspector.describe(id).await {
            Ok(detail) if detail.completed => ReclamationOutcome::Successful,
            Ok(_) => ReclamationOutcome::Failed,
            Err(DirectoryError::SessionNotFound(_)) => ReclamationOutcome::NotFound,
            Err(e) => return Err(e),
        };

        info!("Termination of session {} verified as {:?}", id, outcome);

        Ok(outcome)
    }
}
