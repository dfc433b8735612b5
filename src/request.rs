//! Async request tracking for long-running platform changes.
//!
//! Mutating endpoints may answer `202 Accepted` with a `requestId` instead of
//! applying the change inline. The change is confirmed by polling
//! `GET /api/tenant/{tenant}/request/{requestId}` until the backend reports a
//! terminal status:
//!
//! ```text
//!            read ok, status SUCCESS
//!   Pending ───────────────────────────▶ Succeeded
//!     │  ▲
//!     │  │ read failed (non-2xx, empty body, transport error)
//!     │  │ or any other status value
//!     │  └──────────────┘
//!     │
//!     └─ read ok, status FAIL ─────────▶ Failed
//! ```
//!
//! Status reads happen first; the [`Sleeper`] is only awaited *between*
//! reads. Without bounds in [`PollConfig`] the wait is unbounded: a job the
//! backend never finishes keeps the caller waiting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::client::MigrationClient;
use crate::error::{MigrationError, Result};

// ── Sleeping ─────────────────────────────────────────────────────────

/// Suspends the poll loop between status reads and tells it the time.
///
/// `PollConfig::timeout` is measured on [`Sleeper::now`], so an
/// implementation that advances its own clock in `sleep` drives the timeout
/// bound without real delays.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Current instant on the clock `sleep` advances.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

// ── Request types ────────────────────────────────────────────────────

/// Lifecycle status of an async request as reported by the backend.
///
/// Only `SUCCESS` and `FAIL` are terminal. Anything the backend sends that
/// is not one of the three known values maps to `Unknown` and is treated
/// like `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Still being processed.
    Pending,
    /// Applied.
    Success,
    /// Rejected; the status document carries the reason.
    Fail,
    /// Any other or missing value.
    #[serde(other)]
    Unknown,
}

/// One status document for an async request.
#[derive(Debug, Clone)]
pub struct AsyncRequest {
    /// The request id that was polled.
    pub id: String,
    /// Parsed status. A missing or non-string `status` field maps to
    /// `Unknown`.
    pub status: RequestStatus,
    /// The full status document as returned by the backend.
    pub details: Value,
}

impl AsyncRequest {
    /// Parses a status document body for request `id`.
    pub fn from_body(id: &str, body: &str) -> Result<Self> {
        let details: Value = serde_json::from_str(body)?;
        let status = details
            .get("status")
            .cloned()
            .and_then(|s| serde_json::from_value(s).ok())
            .unwrap_or(RequestStatus::Unknown);
        Ok(AsyncRequest {
            id: id.to_string(),
            status,
            details,
        })
    }

    /// The status string exactly as the backend sent it.
    pub fn raw_status(&self) -> String {
        match self.details.get("status") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        }
    }
}

// ── Polling configuration ────────────────────────────────────────────

/// Controls how an async request is polled.
///
/// The default polls every 2 seconds with no bound on attempts or time,
/// which matches how the platform's own tooling waits on requests. Set
/// `max_attempts` or `timeout` to fail with `MigrationError::PollTimeout`
/// instead of waiting forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between consecutive status reads.
    pub interval: Duration,
    /// Give up once the next read would start more than this long after the
    /// first one, as measured by the client's [`Sleeper::now`].
    pub timeout: Option<Duration>,
    /// Give up after this many status reads.
    pub max_attempts: Option<u32>,
}

impl PollConfig {
    /// Unbounded polling at `interval`.
    pub fn new(interval: Duration) -> Self {
        PollConfig {
            interval,
            timeout: None,
            max_attempts: None,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig::new(Duration::from_secs(2))
    }
}

// ── Polling ──────────────────────────────────────────────────────────

#[derive(Debug)]
enum PollState {
    /// Not finished yet. Carries the status document when one was readable.
    Pending(Option<Value>),
    Succeeded(AsyncRequest),
    Failed(AsyncRequest),
}

/// Performs one status read and maps it to the next poll state.
///
/// Unreadable statuses are logged and reported as `Pending`. A 2xx body
/// that is not JSON is still an error.
async fn read_status<S: Sleeper>(
    client: &MigrationClient<S>,
    path: &str,
    request_id: &str,
) -> Result<PollState> {
    let resp = match client.get(path).await {
        Ok(resp) => resp,
        Err(MigrationError::Network(err)) => {
            warn!(request_id, error = %err, "request status undefined: transport error");
            return Ok(PollState::Pending(None));
        }
        Err(err) => return Err(err),
    };

    if !resp.status.is_success() || resp.is_empty() {
        warn!(
            request_id,
            status = %resp.status,
            body = %resp.body,
            "request status undefined"
        );
        return Ok(PollState::Pending(None));
    }

    let request = AsyncRequest::from_body(request_id, &resp.body)?;
    info!(request_id, status = %request.raw_status(), "request status");
    Ok(match request.status {
        RequestStatus::Success => PollState::Succeeded(request),
        RequestStatus::Fail => PollState::Failed(request),
        RequestStatus::Pending | RequestStatus::Unknown => {
            PollState::Pending(Some(request.details))
        }
    })
}

/// Polls async request `request_id` until it succeeds or fails.
///
/// Returns the final status document on `SUCCESS`.
///
/// # Errors
///
/// - `MigrationError::AsyncFailure` — the backend reported `FAIL`. Polling
///   stops at the first `FAIL` observation.
/// - `MigrationError::PollTimeout` — a bound in `config` was reached.
/// - `MigrationError::NotAuthenticated` — no session on `client`.
/// - `MigrationError::Parse` — a 2xx status body was not valid JSON.
pub async fn await_async_operation<S: Sleeper>(
    client: &MigrationClient<S>,
    request_id: &str,
    config: &PollConfig,
) -> Result<AsyncRequest> {
    client.require_session()?;
    let path = client.tenant_path(&format!("request/{request_id}"));
    let started = client.sleeper().now();
    let mut attempts: u32 = 0;
    let mut last_seen = Value::Null;

    info!(request_id, "waiting for request to complete");
    loop {
        attempts += 1;
        match read_status(client, &path, request_id).await? {
            PollState::Succeeded(request) => return Ok(request),
            PollState::Failed(request) => {
                return Err(MigrationError::AsyncFailure {
                    request_id: request.id.clone(),
                    status: request.raw_status(),
                    details: request.details,
                });
            }
            PollState::Pending(Some(details)) => last_seen = details,
            PollState::Pending(None) => {}
        }

        let elapsed = client.sleeper().now().saturating_duration_since(started);
        let out_of_attempts = config.max_attempts.is_some_and(|max| attempts >= max);
        let out_of_time = config
            .timeout
            .is_some_and(|limit| elapsed + config.interval > limit);
        if out_of_attempts || out_of_time {
            return Err(MigrationError::PollTimeout {
                request_id: request_id.to_string(),
                attempts,
                elapsed,
                details: last_seen,
            });
        }

        debug!(request_id, attempts, interval = ?config.interval, "request pending");
        client.sleeper().sleep(config.interval).await;
    }
}
