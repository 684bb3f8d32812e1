//! Local mirror of the tracked session.
//!
//! Keeps at most the latest known session on disk so a crash while tracking
//! leaves evidence for startup reconciliation: if the mirror claims an
//! active session the server no longer reports, local state is corrected to
//! idle; if the server reports one, the mirror adopts it.

use crate::db::db::Db;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const UPSERT_SESSION: &str = "INSERT INTO sessions (id, employee_id, task_id, start_time, end_time, active)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET end_time = excluded.end_time, active = excluded.active";

const SELECT_ACTIVE_SESSION: &str = "SELECT id, employee_id, task_id, start_time, end_time, active FROM sessions WHERE active = 1 ORDER BY id DESC LIMIT 1";

const CLOSE_SESSION: &str = "UPDATE sessions SET active = 0, end_time = COALESCE(end_time, ?2) WHERE id = ?1";

const CLOSE_ALL_SESSIONS: &str = "UPDATE sessions SET active = 0 WHERE active = 1";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub struct Sessions {
    pub conn: Arc<Mutex<Connection>>,
}

impl Sessions {
    pub fn new() -> Result<Sessions> {
        let conn = Db::new()?.conn;
        Ok(Sessions {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Records or refreshes the mirror of a remote session.
    pub fn upsert(&self, session: &Session) -> Result<()> {
        let start = session.start_time.format(TIMESTAMP_FORMAT).to_string();
        let end = session.end_time.map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        self.conn.lock().execute(
            UPSERT_SESSION,
            params![session.id, session.employee_id, session.task_id, start, end, session.active],
        )?;
        Ok(())
    }

    /// Returns the session the mirror believes is active, if any.
    pub fn fetch_active(&self) -> Result<Option<Session>> {
        let conn = self.conn.lock();
        let session = conn
            .query_row(SELECT_ACTIVE_SESSION, [], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            })
            .optional()?;

        match session {
            Some((id, employee_id, task_id, start_str, end_str, active)) => {
                let start_time = NaiveDateTime::parse_from_str(&start_str, "%Y-%m-%d %H:%M:%S%.f")?;
                let end_time = match end_str {
                    Some(s) => Some(NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")?),
                    None => None,
                };
                Ok(Some(Session {
                    id,
                    employee_id,
                    task_id,
                    start_time,
                    end_time,
                    active,
                }))
            }
            None => Ok(None),
        }
    }

    /// Marks one mirrored session inactive, stamping an end time if the
    /// remote never reported one.
    pub fn close(&self, id: i64, end_time: NaiveDateTime) -> Result<()> {
        let end = end_time.format(TIMESTAMP_FORMAT).to_string();
        self.conn.lock().execute(CLOSE_SESSION, params![id, end])?;
        Ok(())
    }

    /// Clears any stale active claim, the stale-recovery correction path.
    pub fn close_all(&self) -> Result<usize> {
        Ok(self.conn.lock().execute(CLOSE_ALL_SESSIONS, [])?)
    }
}
