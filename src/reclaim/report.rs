use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::SessionId;

use super::orchestrator::FatalError;

/// Terminal classification recorded for a session in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclamationOutcome {
    /// Termination was requested and the session was observed completed.
    Successful,
    /// Termination was requested but the session was still in progress at
    /// verification time.
    Failed,
    /// The session was gone by the time it was re-inspected (or already
    /// gone when termination was requested).
    NotFound,
    /// A per-session failure during describe, terminate, or verify.
    Error,
    /// The session was a candidate but its last activity was too recent.
    Skipped,
}

/// One evaluated session's entry in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub session_id: SessionId,
    pub outcome: ReclamationOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,

    /// Underlying cause, set only for `Error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate produced once per invocation.
///
/// Every candidate session appears exactly once in `results`, and
/// `reclaimed <= processed` always holds. Field names on the wire keep the
/// legacy `contact_*` keys consumers already parse.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    #[serde(rename = "contact_result")]
    pub results: Vec<SessionResult>,

    #[serde(rename = "contacts_processed")]
    pub processed: usize,

    #[serde(rename = "contacts_disconnected")]
    pub reclaimed: usize,
}

impl RunReport {
    pub fn record(&mut self, result: SessionResult) {
        if result.outcome == ReclamationOutcome::Successful {
            self.reclaimed += 1;
        }
        self.processed += 1;
        self.results.push(result);
    }
}

#[derive(Debug, Serialize)]
pub struct FatalBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// JSON envelope handed back to the external trigger.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RunResponse {
    Success {
        status: u16,
        message: String,
        data: RunReport,
    },
    Fatal {
        #[serde(rename = "statusCode")]
        status_code: u16,
        body: FatalBody,
    },
}

impl RunResponse {
    pub fn from_run(result: Result<RunReport, FatalError>) -> Self {
        match result {
            Ok(report) => RunResponse::Success {
                status: 200,
                message: "Success".to_string(),
                data: report,
            },
            Err(fatal) => {
                let body = match fatal {
                    FatalError::MissingCredentials => FatalBody {
                        error: "No directory credentials found".to_string(),
                        message: None,
                    },
                    FatalError::Unauthorized(message) => FatalBody {
                        error: "Not authorized".to_string(),
                        message: Some(message),
                    },
                    FatalError::Directory(message) => FatalBody {
                        error: "Directory client error".to_string(),
                        message: Some(message),
                    },
                };

                RunResponse::Fatal {
                    status_code: 500,
                    body,
                }
            }
        }
    }
}
