//! Persistent store for the durable action queue.
//!
//! Owns every read and write of `action_queue` records; no other component
//! touches the table directly. The store only persists and retrieves —
//! retry policy and drain orchestration live in
//! [`crate::libs::queue::ActionQueue`].
//!
//! ## Thread Safety
//!
//! The connection is wrapped in an `Arc<Mutex<>>` so an enqueue from the
//! capture scheduler can interleave safely with a drain triggered by the
//! connectivity monitor: every mutation serializes on the connection lock.

use crate::db::db::Db;
use crate::libs::action::{ActionKind, ActionPayload, QueuedAction};
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::sync::Arc;

/// Insert a new pending action with a zero retry count.
const INSERT_ACTION: &str = "INSERT INTO action_queue (kind, payload, enqueued_at, retry_count, max_retries) VALUES (?1, ?2, ?3, 0, ?4)";

/// Select all pending actions, oldest first.
///
/// Later screenshot uploads can logically depend on earlier time-entry
/// mutations existing remotely, so drain order is enqueue order.
const SELECT_ACTIONS: &str = "SELECT id, kind, payload, enqueued_at, retry_count, max_retries FROM action_queue ORDER BY enqueued_at ASC, id ASC";

/// Persist an incremented retry count after a failed delivery attempt.
const UPDATE_RETRY_COUNT: &str = "UPDATE action_queue SET retry_count = ?1 WHERE id = ?2";

/// Remove one action, either applied or retried out.
const DELETE_ACTION: &str = "DELETE FROM action_queue WHERE id = ?1";

/// Count pending actions for status display.
const COUNT_ACTIONS: &str = "SELECT COUNT(*) FROM action_queue";

/// Administrative full wipe.
const CLEAR_ACTIONS: &str = "DELETE FROM action_queue";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Store for pending queue records.
pub struct ActionQueueStore {
    pub conn: Arc<Mutex<Connection>>,
}

impl ActionQueueStore {
    /// Opens the database (running migrations if needed) and wraps the
    /// connection for shared access.
    pub fn new() -> Result<Self> {
        let conn = Db::new()?.conn;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Builds a store over an already opened connection.
    ///
    /// Used when the queue and the session mirror share one database
    /// handle, and by tests that open a scratch database.
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Persists a new action and returns its assigned id.
    pub fn insert(&self, payload: &ActionPayload, max_retries: u32) -> Result<i64> {
        let kind = payload.kind();
        let payload_json = payload.to_json()?;
        let enqueued_at = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();

        let conn = self.conn.lock();
        conn.execute(INSERT_ACTION, params![kind.as_str(), payload_json, enqueued_at, max_retries])?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns all currently stored actions in drain order.
    ///
    /// This is a snapshot: actions enqueued after the call are not part of
    /// it and wait for the next drain cycle.
    pub fn snapshot(&self) -> Result<Vec<QueuedAction>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ACTIONS)?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, u32>(5)?,
            ))
        })?;

        let mut actions = Vec::new();
        for row in rows {
            let (id, kind_str, payload_json, enqueued_at_str, retry_count, max_retries) = row?;
            let kind = ActionKind::parse(&kind_str).ok_or_else(|| anyhow!("unknown action kind in store: {}", kind_str))?;
            let payload = ActionPayload::from_json(kind, &payload_json)?;
            let enqueued_at = NaiveDateTime::parse_from_str(&enqueued_at_str, "%Y-%m-%d %H:%M:%S%.f")?;
            actions.push(QueuedAction {
                id,
                kind,
                payload,
                enqueued_at,
                retry_count,
                max_retries,
            });
        }

        Ok(actions)
    }

    /// Persists a new retry count for one action.
    pub fn set_retry_count(&self, id: i64, retry_count: u32) -> Result<()> {
        self.conn.lock().execute(UPDATE_RETRY_COUNT, params![retry_count, id])?;
        Ok(())
    }

    /// Deletes one action; removing an already absent id is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn.lock().execute(DELETE_ACTION, params![id])?;
        Ok(())
    }

    /// Current number of stored actions.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.lock().query_row(COUNT_ACTIONS, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Deletes every stored action and returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        Ok(self.conn.lock().execute(CLEAR_ACTIONS, [])?)
    }
}
