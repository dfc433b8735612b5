//! Typed error hierarchy for the ap-venue-move crate.
//!
//! Every variant maps to a real boundary of a migration run: the login
//! endpoint, the venue listing, the per-device update, the async request
//! poller, configuration loading, and the transport itself. Variants carry
//! the status code and raw response body wherever the backend produced one,
//! since the platform's error bodies are the only useful diagnostic.

use reqwest::StatusCode;
use std::time::Duration;

/// Unified error type for all ap-venue-move operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The login endpoint rejected the credentials (any non-2xx status).
    #[error("authentication failed ({status}): {body}")]
    Auth {
        /// Status returned by `POST /token`.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// A tenant-scoped call was attempted before `authenticate` succeeded.
    #[error("not authenticated: call authenticate before issuing API requests")]
    NotAuthenticated,

    /// A read endpoint (venue listing) returned a non-success status.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body text.
        body: String,
    },

    /// The device update returned neither a synchronous success nor 202.
    #[error("failed to move AP {device_id} ({status}): {body}")]
    Move {
        /// Serial number of the device that could not be moved.
        device_id: String,
        /// Status returned by the update request.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The async request reached the `FAIL` terminal status.
    #[error("request {request_id} reached terminal status {status}")]
    AsyncFailure {
        /// Backend request id that was polled.
        request_id: String,
        /// Terminal status string as reported by the backend.
        status: String,
        /// Last status document seen from the backend.
        details: serde_json::Value,
    },

    /// The poller hit its configured attempt or time bound.
    #[error("request {request_id} still pending after {attempts} polls ({elapsed:?})")]
    PollTimeout {
        /// Backend request id that was polled.
        request_id: String,
        /// Number of status reads performed.
        attempts: u32,
        /// Wall-clock time spent polling.
        elapsed: Duration,
        /// Last status document seen, or `null` if none was readable.
        details: serde_json::Value,
    },

    /// A record from the backend lacks a field the migration depends on.
    #[error("invalid record: {reason}")]
    InvalidRecord {
        /// What was missing or malformed.
        reason: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description, naming the offending field or file.
        message: String,
    },

    /// JSON deserialization failed when parsing a response body.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport-level failure (DNS, TCP, TLS, request timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, MigrationError>;
