//! HTTP client for the Wi-Fi platform's management API.
//!
//! `MigrationClient` wraps a `reqwest::Client` with an enabled cookie store,
//! so whatever session cookie the login endpoint issues is replayed on every
//! later call without the caller touching it. It also holds the API host,
//! the tenant id, the authenticated `Session` (once `authenticate` succeeds)
//! and the `Sleeper` used between async-request polls.
//!
//! Unlike a typical JSON client, the request helper here does *not* turn
//! non-2xx statuses into errors. Each endpoint interprets status codes
//! differently (202 means "poll me" on update, 500 means "try again" while
//! polling), so `send` returns the raw status and body and leaves the
//! decision to the caller.

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::auth::Session;
use crate::config::ApiConfig;
use crate::error::{MigrationError, Result};
use crate::request::{Sleeper, TokioSleeper};

/// Connect timeout for API calls (TCP + TLS handshake).
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default overall per-request timeout. Individual calls are small JSON
/// documents; long waits happen in the poll loop, not inside a single request.
pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_api_client(request_timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .cookie_store(true)
        .connect_timeout(API_CONNECT_TIMEOUT.min(request_timeout))
        .timeout(request_timeout)
        .build()?)
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body as text. Empty when the backend sent no body.
    pub body: String,
}

impl ApiResponse {
    /// Returns `true` if the body is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Stateful client for one tenant on one API host.
///
/// Generic over the [`Sleeper`] so tests can observe poll intervals without
/// waiting them out. Production code uses the default [`TokioSleeper`].
pub struct MigrationClient<S = TokioSleeper> {
    http: Client,
    host: String,
    tenant_id: String,
    session: Option<Session>,
    sleeper: S,
}

impl MigrationClient<TokioSleeper> {
    /// Creates an unauthenticated client for the configured host and tenant.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        MigrationClient::with_sleeper(api, TokioSleeper)
    }
}

impl<S: Sleeper> MigrationClient<S> {
    /// Creates an unauthenticated client that pauses between polls using
    /// `sleeper` instead of the tokio timer.
    pub fn with_sleeper(api: &ApiConfig, sleeper: S) -> Result<Self> {
        MigrationClient::with_request_timeout(api, sleeper, API_REQUEST_TIMEOUT)
    }

    /// Like [`with_sleeper`](Self::with_sleeper), but every HTTP exchange is
    /// abandoned with a `Network` error after `request_timeout`.
    pub fn with_request_timeout(
        api: &ApiConfig,
        sleeper: S,
        request_timeout: Duration,
    ) -> Result<Self> {
        Ok(MigrationClient {
            http: build_api_client(request_timeout)?,
            host: api.host.trim_end_matches('/').to_string(),
            tenant_id: api.tenant_id.clone(),
            session: None,
            sleeper,
        })
    }

    /// API host without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Tenant every API path is scoped to.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The authenticated session, if `authenticate` has succeeded.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The sleeper used between status polls.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub(crate) fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Fails with `NotAuthenticated` unless a session is established.
    pub(crate) fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(MigrationError::NotAuthenticated)
    }

    /// Builds a tenant-scoped path, e.g. `api/tenant/{tenant}/wifi/ap/{id}`.
    pub fn tenant_path(&self, suffix: &str) -> String {
        format!("api/tenant/{}/{}", self.tenant_id, suffix)
    }

    /// Sends a request and returns its status and body, whatever the status.
    ///
    /// `path` is relative to the host (no leading slash). `body` is sent as
    /// JSON when present. Only transport failures become errors here.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.host, path);
        let mut req = self.http.request(method, &url);
        if let Some(payload) = body {
            req = req.json(payload);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(ApiResponse { status, body })
    }

    /// Sends a GET request with no body.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::PUT, path, Some(body)).await
    }
}
