//! Venue-to-venue migration: list every AP in the source venue and move
//! each one to the target venue, strictly one after another.
//!
//! APs are never moved concurrently. Each reassignment, including any wait
//! on an async request, finishes before the next AP is touched, because
//! moves into the same venue contend on the same server-side group state.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::client::MigrationClient;
use crate::device::{MoveReceipt, reassign_device};
use crate::error::{MigrationError, Result};
use crate::request::{PollConfig, Sleeper};
use crate::venue::list_devices_in_venue;

/// What to do when one AP cannot be moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure and return its error.
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining APs.
    Continue,
}

/// An AP that could not be moved under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct FailedMove {
    /// Serial number, or `None` when the record had none.
    pub serial_number: Option<String>,
    /// Why the move failed.
    pub error: MigrationError,
}

/// Per-AP results of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// APs now in the target venue, in listing order.
    pub moved: Vec<MoveReceipt>,
    /// APs left behind; only filled under [`FailurePolicy::Continue`].
    pub failed: Vec<FailedMove>,
}

impl MigrationReport {
    /// Number of APs attempted.
    pub fn total(&self) -> usize {
        self.moved.len() + self.failed.len()
    }

    /// `true` when no AP failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves every AP in `source_venue_id` to `target_venue_id`.
///
/// With [`FailurePolicy::Abort`] the first listing or move error is
/// returned and no further APs are touched. With
/// [`FailurePolicy::Continue`] move errors are collected in the report;
/// a listing error is still returned directly.
pub async fn migrate_venue<S: Sleeper>(
    client: &MigrationClient<S>,
    source_venue_id: &str,
    target_venue_id: &str,
    poll: &PollConfig,
    policy: FailurePolicy,
) -> Result<MigrationReport> {
    let devices = list_devices_in_venue(client, source_venue_id).await?;
    info!(
        source = source_venue_id,
        target = target_venue_id,
        aps = devices.len(),
        "starting migration"
    );

    let mut report = MigrationReport::default();
    for device in devices {
        let serial = device.serial_number().map(str::to_owned);
        match reassign_device(client, device, target_venue_id, poll).await {
            Ok(receipt) => report.moved.push(receipt),
            Err(err) => match policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Continue => {
                    error!(serial = ?serial, error = %err, "failed to move AP, continuing");
                    report.failed.push(FailedMove {
                        serial_number: serial,
                        error: err,
                    });
                }
            },
        }
    }

    info!(
        moved = report.moved.len(),
        failed = report.failed.len(),
        "migration finished"
    );
    Ok(report)
}
