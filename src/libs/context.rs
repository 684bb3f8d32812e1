//! Process-scoped application context.
//!
//! One `AppContext` wires the whole pipeline together for the lifetime of a
//! command: configuration, authenticated gateway, durable queue, capture
//! scheduler, connectivity monitor and session state machine, all sharing
//! one database connection. Components hold the context's pieces explicitly
//! instead of reaching for ambient globals.

use crate::api::tracker::{HttpGateway, TOKEN_KEY};
use crate::api::TrackerConfig;
use crate::db::db::Db;
use crate::db::queue::ActionQueueStore;
use crate::db::sessions::Sessions;
use crate::libs::capture::NativeGrabber;
use crate::libs::config::{CaptureConfig, Config};
use crate::libs::connectivity::ConnectivityMonitor;
use crate::libs::messages::Message;
use crate::libs::queue::ActionQueue;
use crate::libs::scheduler::CaptureScheduler;
use crate::libs::secret::TokenStore;
use crate::libs::session::SharedSession;
use crate::libs::tracker::Tracker;
use crate::msg_bail_anyhow;
use anyhow::Result;
use parking_lot::Mutex;
use std::rc::Rc;
use std::sync::Arc;

pub struct AppContext {
    pub tracker_config: TrackerConfig,
    pub capture_config: CaptureConfig,
    pub gateway: Rc<HttpGateway>,
    pub queue: Arc<ActionQueue>,
    pub scheduler: Rc<CaptureScheduler<HttpGateway, NativeGrabber>>,
    pub monitor: Rc<ConnectivityMonitor<HttpGateway>>,
    pub tracker: Tracker<HttpGateway, NativeGrabber>,
}

impl AppContext {
    /// Builds the full pipeline for a logged-in employee.
    ///
    /// Fails early when the tracker server is not configured, no token is
    /// stored, or login never resolved the employee id.
    pub fn build() -> Result<Self> {
        let config = Config::read()?;
        let Some(tracker_config) = config.tracker else {
            msg_bail_anyhow!(Message::TrackerConfigNotFound);
        };
        let Some(employee_id) = tracker_config.employee_id else {
            msg_bail_anyhow!(Message::NotLoggedIn);
        };
        let Some(token) = TokenStore::get(TOKEN_KEY)? else {
            msg_bail_anyhow!(Message::TokenMissing);
        };
        let capture_config = config.capture.unwrap_or_default();
        capture_config.validate()?;

        let conn = Arc::new(Mutex::new(Db::new()?.conn));
        let queue_store = ActionQueueStore::with_connection(Arc::clone(&conn));
        let mirror = Sessions::with_connection(conn);

        let gateway = Rc::new(HttpGateway::new(&tracker_config, &token));
        let queue = ActionQueue::new(queue_store, capture_config.max_retries);
        let session: SharedSession = Arc::new(Mutex::new(None));

        let scheduler = CaptureScheduler::new(
            Rc::clone(&gateway),
            Rc::new(NativeGrabber),
            Arc::clone(&queue),
            Arc::clone(&session),
        );
        let monitor = ConnectivityMonitor::new(
            Rc::clone(&gateway),
            Arc::clone(&queue),
            capture_config.probe_interval_secs,
            capture_config.drain_interval_secs,
        );
        let tracker = Tracker::new(
            Rc::clone(&gateway),
            Rc::clone(&scheduler),
            mirror,
            session,
            employee_id,
            capture_config.interval_minutes,
        );

        Ok(Self {
            tracker_config,
            capture_config,
            gateway,
            queue,
            scheduler,
            monitor,
            tracker,
        })
    }
}
