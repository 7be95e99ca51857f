use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::api::DirectoryApi;
use super::error::DirectoryError;
use super::types::{GroupId, GroupPage, RawSessionDetail, SessionRecord};

/// Reason attached to termination requests so the directory's audit trail
/// shows why the session was stopped.
const TERMINATE_REASON: &str = "LONG_RUNNING_SESSION";

/// Production `DirectoryApi` backed by the directory's HTTP API.
///
/// One instance is scoped to a single deployment (`scope`) at construction.
/// Credentials come from the `DIRECTORY_TOKEN` environment variable; absence
/// is reported as `MissingCredentials` before any request is made.
pub struct HttpDirectory {
    http: reqwest::Client,
    base_url: String,
    scope: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SessionListResponse {
    sessions: Vec<SessionRecord>,
}

#[derive(Debug, Serialize)]
struct SessionQuery<'a> {
    groups: &'a [GroupId],
    state: &'static str,
}

#[derive(Debug, Serialize)]
struct TerminateRequest {
    reason: &'static str,
}

impl HttpDirectory {
    pub fn new(base_url: &str, scope: &str) -> Result<Self, DirectoryError> {
        let token =
            std::env::var("DIRECTORY_TOKEN").map_err(|_| DirectoryError::MissingCredentials)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("session-reaper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        info!("Directory client ready for scope {} at {}", scope, base_url);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            scope: scope.to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/scopes/{}/{}", self.base_url, self.scope, path)
    }

    /// Map a response status onto the domain error space. `session_id` is
    /// set for per-session operations, where 404 means the session is gone
    /// rather than the endpoint being wrong.
    fn check(
        resp: reqwest::Response,
        session_id: Option<&str>,
    ) -> Result<reqwest::Response, DirectoryError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DirectoryError::Unauthorized(format!(
                "directory returned {status}"
            )));
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = session_id {
                return Err(DirectoryError::SessionNotFound(id.to_string()));
            }
        }

        Err(DirectoryError::Unavailable(format!(
            "directory returned {status}"
        )))
    }
}

fn transport(e: reqwest::Error) -> DirectoryError {
    DirectoryError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl DirectoryApi for HttpDirectory {
    async fn list_groups_page(
        &self,
        token: Option<&str>,
    ) -> Result<GroupPage, DirectoryError> {
        let mut req = self
            .http
            .get(self.url("groups"))
            .bearer_auth(&self.token);

        if let Some(token) = token {
            req = req.query(&[("next_token", token)]);
        }

        let resp = req.send().await.map_err(transport)?;

        Self::check(resp, None)?
            .json::<GroupPage>()
            .await
            .map_err(transport)
    }

    async fn list_active_sessions(
        &self,
        groups: &[GroupId],
    ) -> Result<Vec<SessionRecord>, DirectoryError> {
        let resp = self
            .http
            .post(self.url("sessions/query"))
            .bearer_auth(&self.token)
            .json(&SessionQuery {
                groups,
                state: "connected",
            })
            .send()
            .await
            .map_err(transport)?;

        let body = Self::check(resp, None)?
            .json::<SessionListResponse>()
            .await
            .map_err(transport)?;

        Ok(body.sessions)
    }

    async fn describe_session(&self, id: &str) -> Result<RawSessionDetail, DirectoryError> {
        let resp = self
            .http
            .get(self.url(&format!("sessions/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;

        Self::check(resp, Some(id))?
            .json::<RawSessionDetail>()
            .await
            .map_err(transport)
    }

    async fn terminate_session(&self, id: &str) -> Result<(), DirectoryError> {
        let resp = self
            .http
            .post(self.url(&format!("sessions/{id}/terminate")))
            .bearer_auth(&self.token)
            .json(&TerminateRequest {
                reason: TERMINATE_REASON,
            })
            .send()
            .await
            .map_err(transport)?;

        Self::check(resp, Some(id))?;

        Ok(())
    }
}
