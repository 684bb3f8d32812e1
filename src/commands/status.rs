//! Status display command.
//!
//! One probe against the server, then a summary of session state, elapsed
//! time, connectivity and pending queue size.

use crate::libs::context::AppContext;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let ctx = AppContext::build()?;
    ctx.tracker.reconcile().await?;

    let online = ctx.monitor.probe_once().await;

    msg_print!(Message::TrackerState(ctx.tracker.state().to_string()));
    if let Some(elapsed) = ctx.tracker.elapsed() {
        msg_print!(Message::SessionElapsed(elapsed));
    }
    msg_print!(Message::ConnectivityStatus(online));
    msg_print!(Message::QueueSize(ctx.queue.size()?));
    Ok(())
}
