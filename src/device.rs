//! Access point records and the venue reassignment call.
//!
//! The platform's AP update endpoint is a full replace: whatever record is
//! PUT becomes the AP's configuration. A [`Device`] therefore keeps every
//! attribute the listing returned, untyped, and [`Device::relocate`] touches
//! exactly two keys (`venueId` and `apGroupId`) before the record goes back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::client::MigrationClient;
use crate::error::{MigrationError, Result};
use crate::request::{PollConfig, Sleeper, await_async_operation};

const SERIAL_FIELD: &str = "serialNumber";
const VENUE_FIELD: &str = "venueId";
const GROUP_FIELD: &str = "apGroupId";

/// An access point record exactly as the backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(Map<String, Value>);

impl Device {
    /// Hardware serial number; the key the update endpoint is addressed by.
    pub fn serial_number(&self) -> Option<&str> {
        self.0.get(SERIAL_FIELD).and_then(Value::as_str)
    }

    /// Venue the AP is assigned to.
    pub fn venue_id(&self) -> Option<&str> {
        self.0.get(VENUE_FIELD).and_then(Value::as_str)
    }

    /// AP group within the venue. `None` when unset or `null`.
    pub fn ap_group_id(&self) -> Option<&str> {
        self.0.get(GROUP_FIELD).and_then(Value::as_str)
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Any attribute by its JSON key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The whole record.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Points the record at `target_venue_id` and clears its AP group.
    ///
    /// AP groups are venue-scoped, so the old membership cannot survive the
    /// move.
    pub fn relocate(&mut self, target_venue_id: &str) {
        self.0.insert(
            VENUE_FIELD.to_string(),
            Value::String(target_venue_id.to_string()),
        );
        self.0.insert(GROUP_FIELD.to_string(), Value::Null);
    }
}

/// Outcome of a successful reassignment.
#[derive(Debug, Clone)]
pub struct MoveReceipt {
    /// Serial number of the moved AP.
    pub serial_number: String,
    /// The record that was sent.
    pub sent: Device,
    /// Set when the backend processed the change asynchronously.
    pub request_id: Option<String>,
    /// For a synchronous update, the response body. For an async update, the
    /// `response` field of the initial 202 body, not the final polled status.
    /// `null` when the backend sent nothing.
    pub payload: Value,
}

/// Moves `device` to `target_venue_id`.
///
/// Sends the full record with `venueId` replaced and `apGroupId` cleared to
/// `PUT api/tenant/{tenant}/wifi/ap/{serialNumber}`. A 202 answer is polled
/// with `poll` until the backend confirms the change.
///
/// # Errors
///
/// - `MigrationError::InvalidRecord` — the record has no `serialNumber`, or a
///   202 body has no `requestId`.
/// - `MigrationError::Move` — any status other than 2xx.
/// - `MigrationError::AsyncFailure` / `PollTimeout` — from polling.
/// - `MigrationError::NotAuthenticated` — no session on `client`.
pub async fn reassign_device<S: Sleeper>(
    client: &MigrationClient<S>,
    mut device: Device,
    target_venue_id: &str,
    poll: &PollConfig,
) -> Result<MoveReceipt> {
    client.require_session()?;
    let serial = device
        .serial_number()
        .ok_or_else(|| MigrationError::InvalidRecord {
            reason: "AP record has no serialNumber".to_string(),
        })?
        .to_string();

    device.relocate(target_venue_id);
    let path = client.tenant_path(&format!("wifi/ap/{serial}"));
    let resp = client.put(&path, &device).await?;

    let status = resp.status;
    if status == reqwest::StatusCode::ACCEPTED {
        let accepted: Value = resp.json()?;
        let request_id = accepted
            .get("requestId")
            .and_then(Value::as_str)
            .ok_or_else(|| MigrationError::InvalidRecord {
                reason: format!("202 response for AP {serial} has no requestId"),
            })?
            .to_string();

        await_async_operation(client, &request_id, poll).await?;

        info!(serial = %serial, venue = target_venue_id, "moved AP to target venue");
        return Ok(MoveReceipt {
            serial_number: serial,
            sent: device,
            request_id: Some(request_id),
            payload: accepted.get("response").cloned().unwrap_or(Value::Null),
        });
    }

    if !status.is_success() {
        return Err(MigrationError::Move {
            device_id: serial,
            status,
            body: resp.body,
        });
    }

    let payload = if resp.is_empty() {
        Value::Null
    } else {
        resp.json()?
    };
    info!(serial = %serial, venue = target_venue_id, "moved AP to target venue");
    Ok(MoveReceipt {
        serial_number: serial,
        sent: device,
        request_id: None,
        payload,
    })
}
