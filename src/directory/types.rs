use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a routing group. Read-only reference data.
pub type GroupId = String;

/// Opaque identifier for a session tracked by the directory.
pub type SessionId = String;

/// One page of group ids from the directory.
///
/// `next_token` is an opaque continuation token; `None` means this was the
/// last page. The token never leaves `DirectoryClient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPage {
    pub groups: Vec<GroupId>,

    #[serde(default)]
    pub next_token: Option<String>,
}

/// Raw entry from the active-session listing.
///
/// `connected_at` is absent when the session has not yet been picked up by
/// a handler; such records cannot be evaluated against the active-time
/// threshold and are dropped at the client boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,

    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,
}

/// An active session with a known connection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,

    /// When the session was connected to a handler.
    pub connected_at: DateTime<Utc>,
}

/// Raw detail payload from the directory.
///
/// `disconnected_at` is the disconnect marker. The directory never reports
/// completion directly; presence of this marker is the only signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSessionDetail {
    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub disconnected_at: Option<DateTime<Utc>>,
}

/// Typed session detail, with completion derived once at the inspector
/// boundary rather than re-inferred at each call site.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub connected_at: Option<DateTime<Utc>>,

    /// Last observed activity on the session.
    pub last_updated_at: Option<DateTime<Utc>>,

    /// True iff the disconnect marker was present in the raw detail.
    pub completed: bool,
}
