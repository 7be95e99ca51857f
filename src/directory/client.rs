use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::info;

use super::api::DirectoryApi;
use super::error::DirectoryError;
use super::types::{GroupId, Session};

/// High-level view over the directory: hides pagination tokens and the raw
/// listing shapes from the rest of the crate.
pub struct DirectoryClient {
    api: Arc<dyn DirectoryApi>,
}

impl DirectoryClient {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self { api }
    }

    /// Lazy stream of every group id in the scope.
    ///
    /// Pages are fetched on demand and flattened; the stream is finite and
    /// not restartable. Callers must drain it fully: a partial enumeration
    /// means missed candidates.
    pub fn list_groups(&self) -> impl Stream<Item = Result<GroupId, DirectoryError>> + '_ {
        // State: Some(None) = first page, Some(Some(token)) = continuation,
        // None = drained.
        stream::try_unfold(Some(None::<String>), move |state| async move {
            let token = match state {
                Some(token) => token,
                None => return Ok(None),
            };

            let page = self.api.list_groups_page(token.as_deref()).await?;
            let next = page.next_token.map(Some);

            Ok(Some((
                stream::iter(page.groups.into_iter().map(Ok)),
                next,
            )))
        })
        .try_flatten()
    }

    /// List sessions currently connected across one batch of groups.
    ///
    /// Records without a connection timestamp are silently excluded: they
    /// cannot be evaluated against the active-time threshold.
    pub async fn list_active_sessions(
        &self,
        groups: &[GroupId],
    ) -> Result<Vec<Session>, DirectoryError> {
        info!("Listing active sessions for {} groups", groups.len());

        let records = self.api.list_active_sessions(groups).await?;

        let sessions: Vec<Session> = records
            .into_iter()
            .filter_map(|record| {
                record.connected_at.map(|connected_at| Session {
                    id: record.id,
                    connected_at,
                })
            })
            .collect();

        info!("Found {} connected sessions in batch", sessions.len());

        Ok(sessions)
    }
}
