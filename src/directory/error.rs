use thiserror::Error;

use super::types::SessionId;

/// Errors surfaced by the directory service.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory could not be reached or returned an unexpected
    /// failure. Fatal when it occurs during enumeration or batch listing.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("not authorized for directory scope: {0}")]
    Unauthorized(String),

    #[error("no directory credentials found")]
    MissingCredentials,
}
