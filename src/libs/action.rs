//! Queued action model.
//!
//! A `QueuedAction` is a durably persisted side-effecting operation awaiting
//! remote application: a screenshot upload or a time-entry mutation that
//! failed due to connectivity. The record shape `(id, kind, payload,
//! enqueued_at, retry_count, max_retries)` is what survives process
//! restarts in the local store; payloads are serialized as JSON with image
//! bytes base64-encoded.

use anyhow::Result;
use base64::prelude::*;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of side-effecting operations the queue can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ScreenshotUpload,
    TimeEntryCreate,
    TimeEntryUpdate,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ScreenshotUpload => "screenshot-upload",
            ActionKind::TimeEntryCreate => "time-entry-create",
            ActionKind::TimeEntryUpdate => "time-entry-update",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "screenshot-upload" => Some(ActionKind::ScreenshotUpload),
            "time-entry-create" => Some(ActionKind::TimeEntryCreate),
            "time-entry-update" => Some(ActionKind::TimeEntryUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `screenshot-upload` action.
///
/// Carries everything the multipart upload needs: the image (base64 so the
/// record round-trips through JSON), the owning employee and session, the
/// permission flag recorded at capture time and the best-effort network
/// identity. Frames captured without permission are still uploaded, flagged,
/// so the server keeps a complete audit trail.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScreenshotPayload {
    pub image_b64: String,
    pub employee_id: i64,
    pub session_id: i64,
    pub permission: bool,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub captured_at: NaiveDateTime,
}

impl ScreenshotPayload {
    pub fn image_bytes(&self) -> Result<Vec<u8>> {
        Ok(BASE64_STANDARD.decode(&self.image_b64)?)
    }

    pub fn set_image_bytes(&mut self, bytes: &[u8]) {
        self.image_b64 = BASE64_STANDARD.encode(bytes);
    }
}

/// Payload of a `time-entry-create` action (clock in).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeEntryCreatePayload {
    pub task_id: i64,
    pub ip: Option<String>,
    pub mac: Option<String>,
}

/// Payload of a `time-entry-update` action (clock out).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeEntryUpdatePayload {
    pub session_id: i64,
    pub end_time: NaiveDateTime,
    pub ip: Option<String>,
    pub mac: Option<String>,
}

/// Typed payload, one variant per [`ActionKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum ActionPayload {
    Screenshot(ScreenshotPayload),
    TimeEntryCreate(TimeEntryCreatePayload),
    TimeEntryUpdate(TimeEntryUpdatePayload),
}

impl ActionPayload {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionPayload::Screenshot(_) => ActionKind::ScreenshotUpload,
            ActionPayload::TimeEntryCreate(_) => ActionKind::TimeEntryCreate,
            ActionPayload::TimeEntryUpdate(_) => ActionKind::TimeEntryUpdate,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(match self {
            ActionPayload::Screenshot(p) => serde_json::to_string(p)?,
            ActionPayload::TimeEntryCreate(p) => serde_json::to_string(p)?,
            ActionPayload::TimeEntryUpdate(p) => serde_json::to_string(p)?,
        })
    }

    pub fn from_json(kind: ActionKind, json: &str) -> Result<Self> {
        Ok(match kind {
            ActionKind::ScreenshotUpload => ActionPayload::Screenshot(serde_json::from_str(json)?),
            ActionKind::TimeEntryCreate => ActionPayload::TimeEntryCreate(serde_json::from_str(json)?),
            ActionKind::TimeEntryUpdate => ActionPayload::TimeEntryUpdate(serde_json::from_str(json)?),
        })
    }
}

/// A durably persisted action as stored in the local queue.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedAction {
    /// Local id, monotonically assigned by the store.
    pub id: i64,
    pub kind: ActionKind,
    pub payload: ActionPayload,
    pub enqueued_at: NaiveDateTime,
    pub retry_count: u32,
    pub max_retries: u32,
}
