//! Periodic screenshot capture.
//!
//! While a session is active the scheduler fires on a fixed interval; each
//! tick captures the screen and tries an immediate upload, falling back to
//! the durable queue on failure. The tick reads the shared session slot at
//! trigger time, so a tick that lands after clock-out sees `None` and does
//! nothing. Tick errors never escape the scheduler; they only show up as
//! queue growth or log lines.

use crate::api::Gateway;
use crate::libs::action::{ActionPayload, ScreenshotPayload};
use crate::libs::capture::ScreenGrabber;
use crate::libs::messages::Message;
use crate::libs::network::NetIdentity;
use crate::libs::queue::ActionQueue;
use crate::libs::session::SharedSession;
use crate::{msg_debug, msg_error, msg_warning};
use parking_lot::Mutex;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct CaptureScheduler<G: Gateway, S: ScreenGrabber> {
    gateway: Rc<G>,
    grabber: Rc<S>,
    queue: Arc<ActionQueue>,
    session: SharedSession,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl<G: Gateway + 'static, S: ScreenGrabber + 'static> CaptureScheduler<G, S> {
    pub fn new(gateway: Rc<G>, grabber: Rc<S>, queue: Arc<ActionQueue>, session: SharedSession) -> Rc<Self> {
        Rc::new(Self {
            gateway,
            grabber,
            queue,
            session,
            ticker: Mutex::new(None),
        })
    }

    /// Arms the capture timer. Rescheduling replaces the previous timer, so
    /// at most one ticker exists at any moment; the first capture fires one
    /// full interval after arming.
    pub fn start(self: &Rc<Self>, interval_minutes: u64) {
        let period = Duration::from_secs(interval_minutes * 60);
        let scheduler = Rc::clone(self);
        let handle = tokio::task::spawn_local(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Each tick runs detached: stopping the scheduler aborts the
                // timer but lets an in-flight upload finish.
                let tick = Rc::clone(&scheduler);
                tokio::task::spawn_local(async move {
                    tick.tick().await;
                });
            }
        });

        if let Some(previous) = self.ticker.lock().replace(handle) {
            previous.abort();
        }
        msg_debug!(Message::CaptureSchedulerStarted(interval_minutes));
    }

    /// Disarms the timer. Safe to call when not running.
    pub fn stop(&self) {
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
            msg_debug!(Message::CaptureSchedulerStopped);
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.lock().is_some()
    }

    /// One capture cycle: grab, upload, enqueue on upload failure.
    pub async fn tick(&self) {
        let session = match self.session.lock().clone() {
            Some(session) if session.active => session,
            _ => return,
        };
        msg_debug!(Message::CaptureTick);

        let capture = match self.grabber.grab() {
            Ok(capture) => capture,
            Err(err) => {
                msg_warning!(Message::CaptureFailed(err.to_string()));
                return;
            }
        };
        if !capture.permission_granted {
            msg_warning!(Message::CapturePermissionDenied);
        }

        let net = NetIdentity::discover();
        let mut payload = ScreenshotPayload {
            image_b64: String::new(),
            employee_id: session.employee_id,
            session_id: session.id,
            permission: capture.permission_granted,
            ip: net.ip,
            mac: net.mac,
            captured_at: capture.captured_at,
        };
        payload.set_image_bytes(&capture.image);

        if let Err(err) = self.gateway.upload_screenshot(&payload).await {
            msg_debug!(Message::CaptureUploadFailed(err.to_string()));
            if let Err(err) = self.queue.enqueue(&ActionPayload::Screenshot(payload)) {
                // Local durable storage is down too; the frame is lost and
                // all we can do is say so.
                msg_error!(Message::QueueEnqueueFailed(err.to_string()));
            }
        }
    }
}
