//! Remote gateway for the tracker server.
//!
//! The core components talk to the server only through the [`Gateway`]
//! trait, so the session machine, scheduler and queue can be exercised in
//! tests against mock gateways while `timecap` itself runs over
//! [`tracker::HttpGateway`].
//!
//! All calls are request/response; any transport failure or non-2xx status
//! surfaces as a [`GatewayError`]. What each caller does with that error is
//! its own policy: session start/stop surfaces it to the user, screenshot
//! uploads fall back to the durable queue.

use crate::libs::action::ScreenshotPayload;
use crate::libs::network::NetIdentity;
use crate::libs::session::Session;
use serde::Deserialize;

pub mod tracker;

pub use tracker::{HttpGateway, TrackerConfig};

/// Error returned by any gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connection-level failure: DNS, refused, timeout. The usual shape of
    /// being offline.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx answer whose body did not match the expected shape.
    #[error("invalid response payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// A task as the server reports it; `project_id` is what makes the
/// client-side project resolution possible before a session starts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskRef {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
}

/// Authenticated remote operations the core depends on.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Clock in: creates a session for the authenticated employee on the
    /// given task. The server enforces the one-active-session invariant.
    async fn create_session(&self, task_id: i64, net: &NetIdentity) -> Result<Session, GatewayError>;

    /// Clock out: stops the given session.
    async fn stop_session(&self, session_id: i64) -> Result<Session, GatewayError>;

    /// The employee's currently active session, if the server has one.
    async fn active_session(&self, employee_id: i64) -> Result<Option<Session>, GatewayError>;

    /// Looks up a task so start-time validation can resolve its project.
    async fn resolve_task(&self, task_id: i64) -> Result<TaskRef, GatewayError>;

    /// Uploads one captured frame with its metadata.
    async fn upload_screenshot(&self, shot: &ScreenshotPayload) -> Result<(), GatewayError>;

    /// Cheap reachability probe for the connectivity monitor.
    async fn ping(&self) -> bool;
}
