//! Username/password login against the platform's `/token` endpoint.
//!
//! The endpoint answers with a session cookie rather than a bearer token in
//! the body. The cookie lands in the `MigrationClient`'s cookie store and is
//! replayed automatically, so `authenticate` only has to check the status
//! and record that a session exists.

use serde::Serialize;
use tracing::{error, info};

use crate::client::MigrationClient;
use crate::error::{MigrationError, Result};
use crate::request::Sleeper;

/// Region tag sent with the login request when none is configured.
pub const DEFAULT_REGION: &str = "US";

/// Login credentials for one platform account.
#[derive(Clone)]
pub struct Credentials {
    /// Account login, usually an email address.
    pub username: String,
    /// Account password. Redacted from `Debug` output.
    pub password: String,
    /// Region tag the account lives in (e.g. `"US"`, `"EU"`, `"ASIA"`).
    pub region: String,
}

impl Credentials {
    /// Builds credentials from borrowed strings.
    pub fn new(username: &str, password: &str, region: &str) -> Self {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
            region: region.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// JSON body sent to `POST {host}/token`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    region: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
            region: &credentials.region,
        }
    }
}

/// An established login. The session cookie itself lives in the client's
/// cookie store; this records who is logged in where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// API host the login was made against.
    pub host: String,
    /// Tenant the client is scoped to.
    pub tenant_id: String,
    /// Account that logged in.
    pub username: String,
    /// Region tag sent with the login.
    pub region: String,
}

/// Logs in and attaches the resulting session to `client`.
///
/// Any 2xx status counts as success. Anything else fails with
/// `MigrationError::Auth` carrying the status and body, and leaves the
/// client unauthenticated so later calls fail with `NotAuthenticated`.
pub async fn authenticate<S: Sleeper>(
    client: &mut MigrationClient<S>,
    credentials: &Credentials,
) -> Result<Session> {
    info!(host = client.host(), "logging in");
    let resp = client.post("token", &LoginRequest::from(credentials)).await?;

    if !resp.status.is_success() {
        error!(status = %resp.status, body = %resp.body, "login rejected");
        return Err(MigrationError::Auth {
            status: resp.status,
            body: resp.body,
        });
    }

    let session = Session {
        host: client.host().to_string(),
        tenant_id: client.tenant_id().to_string(),
        username: credentials.username.clone(),
        region: credentials.region.clone(),
    };
    client.set_session(session.clone());
    info!(username = %credentials.username, "logged in");
    Ok(session)
}
