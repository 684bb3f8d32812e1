//! Work session model.
//!
//! One `Session` is one continuous interval of tracked work time tied to an
//! employee and a task. The id is assigned by the tracker server when the
//! session is created; the local mirror in [`crate::db::sessions`] stores
//! the same shape for crash-recovery reconciliation.

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The session slot shared between the state machine and the capture
/// scheduler. The scheduler reads it at every trigger, never at arm time, so
/// a session change between ticks is always observed.
pub type SharedSession = Arc<Mutex<Option<Session>>>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub id: i64,
    pub employee_id: i64,
    pub task_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    #[serde(rename = "is_active")]
    pub active: bool,
}

impl Session {
    /// Seconds elapsed since the session started, up to `end_time` when the
    /// session is closed.
    pub fn elapsed_seconds(&self, now: NaiveDateTime) -> i64 {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).num_seconds().max(0)
    }

    /// Elapsed time formatted as `HH:MM:SS` for status display.
    pub fn elapsed_display(&self, now: NaiveDateTime) -> String {
        let total = self.elapsed_seconds(now);
        format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    }
}
