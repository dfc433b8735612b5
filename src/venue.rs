//! Venue AP-group listing.
//!
//! `GET api/tenant/{tenant}/wifi/venue/{venueId}/ap-group` returns the
//! venue's AP groups, each optionally carrying the APs assigned to it:
//!
//! ```json
//! [
//!   { "id": "g1", "name": "Lobby", "aps": [ { "serialNumber": "..." } ] },
//!   { "id": "g2", "name": "Empty group" }
//! ]
//! ```
//!
//! Groups without an `aps` key are valid and simply contribute no devices.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::client::MigrationClient;
use crate::device::Device;
use crate::error::{MigrationError, Result};
use crate::request::Sleeper;

/// An AP group as returned by the venue listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApGroup {
    /// Group id.
    #[serde(default)]
    pub id: Option<String>,

    /// Display name of the group.
    #[serde(default)]
    pub name: Option<String>,

    /// APs in this group. `None` when the key is absent or `null`.
    #[serde(default)]
    pub aps: Option<Vec<Device>>,

    /// Remaining group attributes (`isDefault`, `venueId`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flattens groups into their devices, in listing order.
pub fn flatten_groups(groups: Vec<ApGroup>) -> Vec<Device> {
    groups.into_iter().filter_map(|g| g.aps).flatten().collect()
}

/// Lists the AP groups of `venue_id`.
///
/// # Errors
///
/// - `MigrationError::Api` — non-success status (e.g. 404 for an unknown
///   venue).
/// - `MigrationError::Parse` — the body is not a group array.
/// - `MigrationError::NotAuthenticated` — no session on `client`.
pub async fn list_ap_groups<S: Sleeper>(
    client: &MigrationClient<S>,
    venue_id: &str,
) -> Result<Vec<ApGroup>> {
    client.require_session()?;
    let path = client.tenant_path(&format!("wifi/venue/{venue_id}/ap-group"));
    let resp = client.get(&path).await?;
    if !resp.status.is_success() {
        return Err(MigrationError::Api {
            status: resp.status,
            body: resp.body,
        });
    }
    resp.json()
}

/// Lists every AP in `venue_id`, across all of its groups.
pub async fn list_devices_in_venue<S: Sleeper>(
    client: &MigrationClient<S>,
    venue_id: &str,
) -> Result<Vec<Device>> {
    let groups = list_ap_groups(client, venue_id).await?;
    let group_count = groups.len();
    let devices = flatten_groups(groups);
    info!(
        venue = venue_id,
        groups = group_count,
        aps = devices.len(),
        "listed venue APs"
    );
    Ok(devices)
}
