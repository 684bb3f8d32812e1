//! Session state machine.
//!
//! Owns the `Idle -> Starting -> Active -> Stopping -> Idle` lifecycle of a
//! tracked work session and its coupling to the capture scheduler: entering
//! `Active` arms the scheduler, entering `Idle` disarms it. Start and stop
//! require a live round trip to the tracker server; they are never queued,
//! only screenshot uploads take the asynchronous-retry path.

use crate::api::Gateway;
use crate::db::sessions::Sessions;
use crate::libs::capture::ScreenGrabber;
use crate::libs::config::{MAX_CAPTURE_INTERVAL, MIN_CAPTURE_INTERVAL};
use crate::libs::messages::Message;
use crate::libs::network::NetIdentity;
use crate::libs::scheduler::CaptureScheduler;
use crate::libs::session::{Session, SharedSession};
use crate::{msg_bail_anyhow, msg_debug, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use chrono::Local;
use parking_lot::Mutex;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Starting,
    Active,
    Stopping,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackerState::Idle => "idle",
            TrackerState::Starting => "starting",
            TrackerState::Active => "active",
            TrackerState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

pub struct Tracker<G: Gateway, S: ScreenGrabber> {
    gateway: Rc<G>,
    scheduler: Rc<CaptureScheduler<G, S>>,
    mirror: Sessions,
    session: SharedSession,
    state: Mutex<TrackerState>,
    employee_id: i64,
    interval_minutes: Mutex<u64>,
}

impl<G: Gateway + 'static, S: ScreenGrabber + 'static> Tracker<G, S> {
    pub fn new(
        gateway: Rc<G>,
        scheduler: Rc<CaptureScheduler<G, S>>,
        mirror: Sessions,
        session: SharedSession,
        employee_id: i64,
        interval_minutes: u64,
    ) -> Self {
        Self {
            gateway,
            scheduler,
            mirror,
            session,
            state: Mutex::new(TrackerState::Idle),
            employee_id,
            interval_minutes: Mutex::new(interval_minutes),
        }
    }

    pub fn state(&self) -> TrackerState {
        *self.state.lock()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().clone()
    }

    /// Elapsed time of the current session as `HH:MM:SS`, if one is active.
    pub fn elapsed(&self) -> Option<String> {
        self.session().map(|s| s.elapsed_display(Local::now().naive_local()))
    }

    pub fn interval_minutes(&self) -> u64 {
        *self.interval_minutes.lock()
    }

    /// Changes the capture interval. Only allowed while idle; the new value
    /// takes effect when the scheduler is next armed.
    pub fn set_interval(&self, minutes: u64) -> Result<()> {
        if self.state() != TrackerState::Idle {
            msg_bail_anyhow!(Message::CaptureIntervalChangeWhileActive);
        }
        if !(MIN_CAPTURE_INTERVAL..=MAX_CAPTURE_INTERVAL).contains(&minutes) {
            msg_bail_anyhow!(Message::CaptureIntervalOutOfRange(minutes));
        }
        *self.interval_minutes.lock() = minutes;
        Ok(())
    }

    /// Aligns local session state with the server on startup.
    ///
    /// The server is the source of truth: an active remote session is
    /// adopted (crash recovery, the scheduler is re-armed to preserve
    /// capture continuity), and a local mirror claiming activity the server
    /// does not confirm is corrected back to idle.
    pub async fn reconcile(&self) -> Result<()> {
        match self.gateway.active_session(self.employee_id).await {
            Ok(Some(remote)) => {
                self.mirror.upsert(&remote)?;
                *self.session.lock() = Some(remote.clone());
                *self.state.lock() = TrackerState::Active;
                self.scheduler.start(self.interval_minutes());
                msg_info!(Message::SessionRecovered(remote.id));
            }
            Ok(None) => {
                if self.mirror.fetch_active()?.is_some() {
                    self.mirror.close_all()?;
                    msg_warning!(Message::SessionStaleCorrected);
                }
                *self.session.lock() = None;
                *self.state.lock() = TrackerState::Idle;
            }
            Err(err) => {
                // Offline startup: keep the mirror's view until the server
                // can be reached again.
                msg_debug!(Message::ApiRequestFailed(err.to_string()));
                if let Some(local) = self.mirror.fetch_active()? {
                    *self.session.lock() = Some(local.clone());
                    *self.state.lock() = TrackerState::Active;
                    self.scheduler.start(self.interval_minutes());
                    msg_info!(Message::SessionRecovered(local.id));
                }
            }
        }
        Ok(())
    }

    /// Clock in on a task. Requires a logged-in employee and a task that
    /// resolves to a project; fails without touching state when validation
    /// or the remote create fails.
    pub async fn start(&self, task_id: i64) -> Result<Session> {
        {
            let mut state = self.state.lock();
            match *state {
                TrackerState::Idle => *state = TrackerState::Starting,
                TrackerState::Active | TrackerState::Starting => {
                    let id = self.session().map(|s| s.id).unwrap_or_default();
                    msg_bail_anyhow!(Message::SessionAlreadyActive(id));
                }
                TrackerState::Stopping => msg_bail_anyhow!(Message::SessionNotActive),
            }
        }

        // Task must exist and belong to a project before a session may open.
        let task = match self.gateway.resolve_task(task_id).await {
            Ok(task) => task,
            Err(err) => {
                *self.state.lock() = TrackerState::Idle;
                msg_debug!(Message::ApiRequestFailed(err.to_string()));
                return Err(msg_error_anyhow!(Message::TaskNotFoundRemote(task_id)));
            }
        };
        if task.project_id <= 0 {
            *self.state.lock() = TrackerState::Idle;
            msg_bail_anyhow!(Message::TrackingRequiresProject);
        }

        let net = NetIdentity::discover();
        match self.gateway.create_session(task_id, &net).await {
            Ok(session) => {
                self.mirror.upsert(&session)?;
                *self.session.lock() = Some(session.clone());
                *self.state.lock() = TrackerState::Active;
                self.scheduler.start(self.interval_minutes());
                msg_info!(Message::SessionStarted(session.id));
                Ok(session)
            }
            Err(err) => {
                *self.state.lock() = TrackerState::Idle;
                Err(msg_error_anyhow!(Message::SessionStartFailed(err.to_string())))
            }
        }
    }

    /// Clock out. On remote failure the session stays active and the error
    /// is surfaced for a manual retry.
    pub async fn stop(&self) -> Result<Session> {
        let session = {
            let mut state = self.state.lock();
            match *state {
                TrackerState::Active => *state = TrackerState::Stopping,
                _ => msg_bail_anyhow!(Message::SessionNotActive),
            }
            match self.session() {
                Some(session) => session,
                None => {
                    *state = TrackerState::Idle;
                    msg_bail_anyhow!(Message::SessionNotActive);
                }
            }
        };

        match self.gateway.stop_session(session.id).await {
            Ok(stopped) => {
                let end = stopped.end_time.unwrap_or_else(|| Local::now().naive_local());
                self.mirror.close(stopped.id, end)?;
                *self.session.lock() = None;
                *self.state.lock() = TrackerState::Idle;
                self.scheduler.stop();
                msg_info!(Message::SessionStopped(stopped.id));
                Ok(stopped)
            }
            Err(err) => {
                *self.state.lock() = TrackerState::Active;
                Err(msg_error_anyhow!(Message::SessionStopFailed(err.to_string())))
            }
        }
    }

    /// Logout path: tries to stop the active session but forces idle even
    /// when the remote call fails, so the user is never stranded mid-state.
    pub async fn stop_for_logout(&self) -> Result<()> {
        if self.state() == TrackerState::Active {
            *self.state.lock() = TrackerState::Stopping;
            if let Some(session) = self.session() {
                if let Err(err) = self.gateway.stop_session(session.id).await {
                    msg_warning!(Message::LogoutStopError(err.to_string()));
                }
            }
        }
        self.mirror.close_all()?;
        *self.session.lock() = None;
        *self.state.lock() = TrackerState::Idle;
        self.scheduler.stop();
        Ok(())
    }
}
