use super::error::DirectoryError;
use super::types::{GroupId, GroupPage, RawSessionDetail, SessionRecord};

/// Transport seam for the external directory service.
///
/// Implementations are scoped to one deployment at construction time and
/// carry their own credentials; components receive the API by injection so
/// nothing in the crate touches a process-wide client handle.
///
/// Implementations:
/// - `HttpDirectory`: production, talks to the directory over HTTP
/// - in-memory fakes in the integration tests
#[async_trait::async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Fetch one page of group ids for the scope.
    ///
    /// `token` is the continuation token from the previous page, or `None`
    /// for the first page.
    async fn list_groups_page(
        &self,
        token: Option<&str>,
    ) -> Result<GroupPage, DirectoryError>;

    /// List all sessions currently in a connected state across the given
    /// groups. The directory enforces a ceiling on the number of groups per
    /// call; callers are expected to batch accordingly.
    async fn list_active_sessions(
        &self,
        groups: &[GroupId],
    ) -> Result<Vec<SessionRecord>, DirectoryError>;

    /// Fetch authoritative detail for one session.
    async fn describe_session(&self, id: &str) -> Result<RawSessionDetail, DirectoryError>;

    /// Request termination of a session. Termination is asynchronous on the
    /// directory side; a successful return only means the request was
    /// accepted.
    async fn terminate_session(&self, id: &str) -> Result<(), DirectoryError>;
}
