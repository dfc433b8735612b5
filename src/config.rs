//! Run configuration.
//!
//! Values come from an optional TOML file and from CLI flags / environment
//! variables, each layer as a [`PartialConfig`] where every key is optional.
//! Layers are merged (later wins) and then resolved into a complete
//! [`MigrationConfig`], which is passed by value to the client. Nothing is
//! kept in process-wide state.
//!
//! ```toml
//! host = "https://ruckus.cloud"
//! username = "admin@example.com"
//! password = "..."
//! region = "US"
//! tenant_id = "3b1c..."
//! source_venue_id = "a1..."
//! target_venue_id = "b2..."
//! on_failure = "abort"
//!
//! [polling]
//! interval_secs = 2
//! timeout_secs = 600
//! max_attempts = 300
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::auth::{Credentials, DEFAULT_REGION};
use crate::error::{MigrationError, Result};
use crate::migration::FailurePolicy;
use crate::request::PollConfig;

pub const DEFAULT_HOST: &str = "https://ruckus.cloud";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Where and as which tenant to talk to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the API, without the `/api/tenant/...` path.
    pub host: String,
    /// Tenant every API path is scoped to.
    pub tenant_id: String,
}

/// Everything a migration run needs.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Host and tenant.
    pub api: ApiConfig,
    /// Login for the tenant's account.
    pub credentials: Credentials,
    /// Venue whose APs are moved.
    pub source_venue_id: String,
    /// Venue the APs end up in.
    pub target_venue_id: String,
    /// How async update requests are polled.
    pub poll: PollConfig,
    /// What to do when one AP cannot be moved.
    pub on_failure: FailurePolicy,
}

/// The `[polling]` table of a configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartialPolling {
    /// Seconds between status reads; must be at least 1.
    pub interval_secs: Option<u64>,
    /// Overall bound on waiting for one request, in seconds.
    pub timeout_secs: Option<u64>,
    /// Bound on status reads for one request; must be at least 1.
    pub max_attempts: Option<u32>,
}

/// One configuration layer. Unset keys defer to lower layers or defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartialConfig {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub region: Option<String>,
    pub tenant_id: Option<String>,
    pub source_venue_id: Option<String>,
    pub target_venue_id: Option<String>,
    pub on_failure: Option<FailurePolicy>,
    #[serde(default)]
    pub polling: PartialPolling,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MigrationError::Config {
            message: format!("missing required setting `{field}`"),
        }),
    }
}

impl PartialConfig {
    /// Reads a TOML configuration layer from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MigrationError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            MigrationError::Config { message } => MigrationError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MigrationError::Config {
            message: e.to_string(),
        })
    }

    /// Overlays `other` on top of `self`; keys set in `other` win.
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            host: other.host.or(self.host),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            region: other.region.or(self.region),
            tenant_id: other.tenant_id.or(self.tenant_id),
            source_venue_id: other.source_venue_id.or(self.source_venue_id),
            target_venue_id: other.target_venue_id.or(self.target_venue_id),
            on_failure: other.on_failure.or(self.on_failure),
            polling: PartialPolling {
                interval_secs: other.polling.interval_secs.or(self.polling.interval_secs),
                timeout_secs: other.polling.timeout_secs.or(self.polling.timeout_secs),
                max_attempts: other.polling.max_attempts.or(self.polling.max_attempts),
            },
        }
    }

    /// Fills defaults and checks that every required key is present.
    pub fn resolve(self) -> Result<MigrationConfig> {
        let interval_secs = self
            .polling
            .interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(MigrationError::Config {
                message: "polling.interval_secs must be at least 1".to_string(),
            });
        }

        if self.polling.max_attempts == Some(0) {
            return Err(MigrationError::Config {
                message: "polling.max_attempts must be at least 1".to_string(),
            });
        }

        Ok(MigrationConfig {
            api: ApiConfig {
                host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                tenant_id: required(self.tenant_id, "tenant_id")?,
            },
            credentials: Credentials {
                username: required(self.username, "username")?,
                password: required(self.password, "password")?,
                region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            },
            source_venue_id: required(self.source_venue_id, "source_venue_id")?,
            target_venue_id: required(self.target_venue_id, "target_venue_id")?,
            poll: PollConfig {
                interval: Duration::from_secs(interval_secs),
                timeout: self.polling.timeout_secs.map(Duration::from_secs),
                max_attempts: self.polling.max_attempts,
            },
            on_failure: self.on_failure.unwrap_or_default(),
        })
    }
}
