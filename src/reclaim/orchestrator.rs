use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{StreamExt, TryStreamExt};
use futures::{pin_mut, stream};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::directory::{
    DirectoryApi, DirectoryClient, DirectoryError, GroupId, Session, SessionDetail,
};

use super::actuator::ReclamationActuator;
use super::inspector::SessionInspector;
use super::report::{ReclamationOutcome, RunReport, SessionResult};
use super::thresholds;

/// Top-level failure that invalidates the entire run. Per-session failures
/// never become one of these; they are isolated into `Error` report entries.
#[derive(Debug, Clone, Error)]
pub enum FatalError {
    #[error("no directory credentials found")]
    MissingCredentials,

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("directory error: {0}")]
    Directory(String),
}

impl From<DirectoryError> for FatalError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::MissingCredentials => FatalError::MissingCredentials,
            DirectoryError::Unauthorized(message) => FatalError::Unauthorized(message),
            other => FatalError::Directory(other.to_string()),
        }
    }
}

/// Drives one full reclamation pass:
/// enumerate groups → collect candidates → evaluate each → report.
pub struct RunOrchestrator {
    client: DirectoryClient,
    inspector: SessionInspector,
    actuator: ReclamationActuator,
    active_threshold: Duration,
    idle_threshold: Duration,
    batch_size: usize,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl RunOrchestrator {
    pub fn new(api: Arc<dyn DirectoryApi>, config: &Config) -> Self {
        Self {
            client: DirectoryClient::new(Arc::clone(&api)),
            inspector: SessionInspector::new(Arc::clone(&api)),
            actuator: ReclamationActuator::new(api, config.grace()),
            active_threshold: config.active_threshold(),
            idle_threshold: config.idle_threshold(),
            batch_size: config.batch_size.max(1),
            concurrency: config.concurrency.max(1),
            deadline: config.deadline(),
        }
    }

    /// Run one pass. Always returns a report on the non-fatal path, even if
    /// every session errored; returns `FatalError` only for conditions that
    /// invalidate the whole run.
    pub async fn run(&self) -> Result<RunReport, FatalError> {
        let run_id = Uuid::new_v4();
        info!("Starting reclamation run {}", run_id);

        let deadline = self.deadline.map(|d| Instant::now() + d);

        // The deadline bounds the whole run. A directory call hung during
        // enumeration or listing must not block the invocation past it;
        // abandoning those phases still returns the (empty) report rather
        // than leaving the caller with nothing.
        let groups = match with_deadline(deadline, self.enumerate_groups()).await {
            Some(groups) => groups?,
            None => {
                warn!("Run deadline reached during group enumeration, returning empty report");
                return Ok(RunReport::default());
            }
        };

        let candidates = match with_deadline(deadline, self.collect_candidates(&groups)).await {
            Some(candidates) => candidates?,
            None => {
                warn!("Run deadline reached while collecting candidates, returning empty report");
                return Ok(RunReport::default());
            }
        };

        info!("Evaluating {} candidate sessions", candidates.len());

        let report = self.evaluate_sessions(candidates, deadline).await;

        info!(
            "Reclamation run {} done: {} processed, {} reclaimed",
            run_id, report.processed, report.reclaimed
        );

        Ok(report)
    }

    /// Drain the group stream fully. A partial enumeration is not
    /// acceptable: a missed group means silently missed candidates.
    async fn enumerate_groups(&self) -> Result<Vec<GroupId>, FatalError> {
        let groups: Vec<GroupId> = self.client.list_groups().try_collect().await?;

        info!("Found {} routing groups", groups.len());

        Ok(groups)
    }

    /// List active sessions in batches of at most `batch_size` groups and
    /// keep those connected longer than the active threshold. `now` is
    /// captured once per batch so a long batch does not skew the judgment.
    /// Any batch failure is fatal: there is no meaningful partial session
    /// list without full group coverage.
    async fn collect_candidates(&self, groups: &[GroupId]) -> Result<Vec<Session>, FatalError> {
        let mut candidates = Vec::new();

        for batch in groups.chunks(self.batch_size) {
            let sessions = self.client.list_active_sessions(batch).await?;
            let now = Utc::now();

            for session in sessions {
                if thresholds::exceeds_active_threshold(
                    now,
                    Some(session.connected_at),
                    self.active_threshold,
                ) {
                    info!(
                        "Session {} connected since {}, exceeds active threshold",
                        session.id, session.connected_at
                    );
                    candidates.push(session);
                }
            }
        }

        Ok(candidates)
    }

    /// Evaluate candidates with a bounded worker pool. Entry order in the
    /// report is not significant. When a deadline is set, remaining
    /// sessions are abandoned at the deadline and whatever has accumulated
    /// is returned.
    async fn evaluate_sessions(
        &self,
        candidates: Vec<Session>,
        deadline: Option<Instant>,
    ) -> RunReport {
        let mut report = RunReport::default();

        let results = stream::iter(candidates)
            .map(|session| self.evaluate_one(session))
            .buffer_unordered(self.concurrency);
        pin_mut!(results);

        loop {
            let next = match deadline {
                Some(deadline) => tokio::select! {
                    next = results.next() => next,
                    _ = tokio::time::sleep_until(deadline) => {
                        warn!(
                            "Run deadline reached with {} sessions evaluated, returning partial report",
                            report.processed
                        );
                        break;
                    }
                },
                None => results.next().await,
            };

            match next {
                Some(result) => report.record(result),
                None => break,
            }
        }

        report
    }

    /// Evaluate one candidate. This is the failure-isolation boundary: any
    /// error here becomes an `Error` entry for this session and never stops
    /// the loop.
    async fn evaluate_one(&self, session: Session) -> SessionResult {
        match self.decide_and_reclaim(&session.id).await {
            Ok((outcome, detail)) => SessionResult {
                session_id: session.id,
                outcome,
                connected_at: detail.connected_at,
                last_updated_at: detail.last_updated_at,
                error: None,
            },
            Err(e) => {
                error!("Error processing session {}: {}", session.id, e);
                SessionResult {
                    session_id: session.id,
                    outcome: ReclamationOutcome::Error,
                    connected_at: Some(session.connected_at),
                    last_updated_at: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Describe the session and apply the idle gate. The idle threshold is
    /// the sole gate immediately before termination: a candidate whose last
    /// activity is recent is still being serviced and is skipped.
    async fn decide_and_reclaim(
        &self,
        id: &str,
    ) -> Result<(ReclamationOutcome, SessionDetail), DirectoryError> {
        let detail = self.inspector.describe(id).await?;

        if detail.last_updated_at.is_none() {
            warn!("Session {} detail has no last-activity timestamp", id);
        }

        let now = Utc::now();

        if !thresholds::exceeds_idle_threshold(now, detail.last_updated_at, self.idle_threshold) {
            info!("Session {} still active within idle threshold, skipping", id);
            return Ok((ReclamationOutcome::Skipped, detail));
        }

        let outcome = self.actuator.reclaim(id).await?;

        Ok((outcome, detail))
    }
}

/// Run `fut` to completion, or abandon it once the deadline passes.
async fn with_deadline<T>(
    deadline: Option<Instant>,
    fut: impl Future<Output = T>,
) -> Option<T> {
    match deadline {
        Some(deadline) => tokio::select! {
            out = fut => Some(out),
            _ = tokio::time::sleep_until(deadline) => None,
        },
        None => Some(fut.await),
    }
}
