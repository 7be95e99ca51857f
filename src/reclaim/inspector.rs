use std::sync::Arc;

use tracing::info;

use crate::directory::{DirectoryApi, DirectoryError, SessionDetail};

/// Fetches authoritative session detail from the directory.
pub struct SessionInspector {
    api: Arc<dyn DirectoryApi>,
}

impl SessionInspector {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self { api }
    }

    /// Fetch detail for one session.
    ///
    /// The directory never asserts completion directly; it is derived here,
    /// once, from the presence of the disconnect marker. Every downstream
    /// consumer sees the boolean, never the raw marker.
    pub async fn describe(&self, id: &str) -> Result<SessionDetail, DirectoryError> {
        info!("Describing session {}", id);

        let raw = self.api.describe_session(id).await?;

        Ok(SessionDetail {
            connected_at: raw.connected_at,
            last_updated_at: raw.last_updated_at,
            completed: raw.disconnected_at.is_some(),
        })
    }
}
