//! CLI entry point for ap-venue-move.
//!
//! Logs in, lists every AP in the source venue, and moves each one to the
//! target venue. Settings come from `--config <file.toml>`, environment
//! variables, and flags (flags and environment override the file).
//!
//! Exit codes:
//! - 0: every AP in the source venue was moved
//! - 1: runtime error (login rejected, API error, failed move, ...) or, with
//!   `--continue-on-error`, at least one AP failed to move
//! - 2: argument validation error (clap handles this automatically)

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ap_venue_move::auth::authenticate;
use ap_venue_move::client::MigrationClient;
use ap_venue_move::config::{MigrationConfig, PartialConfig, PartialPolling};
use ap_venue_move::error::Result;
use ap_venue_move::migration::{FailurePolicy, MigrationReport, migrate_venue};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with any of the settings below. Flags and environment
    /// variables take precedence over values in the file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// API host, e.g. https://ruckus.cloud or https://eu.ruckus.cloud.
    #[arg(long, env = "RUCKUS_HOST")]
    host: Option<String>,

    #[arg(long, env = "RUCKUS_USERNAME")]
    username: Option<String>,

    /// Account password. Prefer setting via the RUCKUS_PASSWORD environment
    /// variable to keep it out of process listings and shell history.
    #[arg(long, env = "RUCKUS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Region tag sent with the login request (default: US).
    #[arg(long, env = "RUCKUS_REGION")]
    region: Option<String>,

    #[arg(long, env = "RUCKUS_TENANT_ID")]
    tenant_id: Option<String>,

    /// Venue to move APs out of.
    #[arg(long, env = "RUCKUS_SOURCE_VENUE")]
    source_venue: Option<String>,

    /// Venue to move APs into.
    #[arg(long, env = "RUCKUS_TARGET_VENUE")]
    target_venue: Option<String>,

    /// Seconds between async request status polls (default: 2).
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up waiting on a single async request after this many seconds.
    #[arg(long)]
    poll_timeout: Option<u64>,

    /// Give up waiting on a single async request after this many polls.
    #[arg(long)]
    max_polls: Option<u32>,

    /// Keep moving the remaining APs when one fails, and report all
    /// failures at the end.
    #[arg(long)]
    continue_on_error: bool,
}

impl Cli {
    /// Settings given on the command line or through the environment.
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            region: self.region.clone(),
            tenant_id: self.tenant_id.clone(),
            source_venue_id: self.source_venue.clone(),
            target_venue_id: self.target_venue.clone(),
            on_failure: self.continue_on_error.then_some(FailurePolicy::Continue),
            polling: PartialPolling {
                interval_secs: self.poll_interval,
                timeout_secs: self.poll_timeout,
                max_attempts: self.max_polls,
            },
        }
    }

    fn resolve(&self) -> Result<MigrationConfig> {
        let base = match &self.config {
            Some(path) => PartialConfig::from_file(path)?,
            None => PartialConfig::default(),
        };
        base.merge(self.overrides()).resolve()
    }
}

async fn run(config: MigrationConfig) -> Result<MigrationReport> {
    let mut client = MigrationClient::new(&config.api)?;
    authenticate(&mut client, &config.credentials).await?;
    migrate_venue(
        &client,
        &config.source_venue_id,
        &config.target_venue_id,
        &config.poll,
        config.on_failure,
    )
    .await
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Cli::parse();
    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(report) if report.is_complete_success() => {
            info!(moved = report.moved.len(), "all APs moved");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            for failure in &report.failed {
                error!(
                    serial = failure.serial_number.as_deref().unwrap_or("<unknown>"),
                    error = %failure.error,
                    "AP not moved"
                );
            }
            eprintln!(
                "Error: {} of {} APs could not be moved",
                report.failed.len(),
                report.total()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
