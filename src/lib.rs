//! Async client library for moving access points between venues on a
//! cloud-managed Wi-Fi platform.
//!
//! Logs in with username/password (session cookie), lists the APs of a
//! source venue across its AP groups, and re-points each AP at a target
//! venue. Updates the backend accepts asynchronously (`202` + `requestId`)
//! are polled until the backend reports `SUCCESS` or `FAIL`.
//!
//! # Modules
//!
//! - [`auth`] — credentials and the `/token` login.
//! - [`client`] — cookie-backed HTTP wrapper scoped to one tenant.
//! - [`config`] — layered configuration (TOML file, CLI, environment).
//! - [`device`] — AP records and the reassignment call.
//! - [`error`] — typed error hierarchy (`MigrationError`).
//! - [`migration`] — sequential venue-to-venue orchestration.
//! - [`request`] — async request polling state machine.
//! - [`venue`] — AP-group listing and flattening.
//!
//! # Quick Start
//!
//! ```ignore
//! use ap_venue_move::auth::{Credentials, authenticate};
//! use ap_venue_move::client::MigrationClient;
//! use ap_venue_move::config::ApiConfig;
//! use ap_venue_move::migration::{FailurePolicy, migrate_venue};
//! use ap_venue_move::request::PollConfig;
//!
//! let api = ApiConfig { host: "https://ruckus.cloud".into(), tenant_id: "tenant".into() };
//! let mut client = MigrationClient::new(&api)?;
//! authenticate(&mut client, &Credentials::new("user", "pass", "US")).await?;
//! let report = migrate_venue(&client, "V1", "V2", &PollConfig::default(), FailurePolicy::Abort).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod migration;
pub mod request;
pub mod venue;
