//! Start tracking command.
//!
//! One-shot clock-in: reconciles against the server first so an already
//! active session (from another device or a previous crash) is detected
//! before a new one is created. Screenshot capture only runs while the
//! foreground `track` command is active.

use crate::libs::context::AppContext;
use crate::libs::messages::Message;
use crate::libs::tracker::TrackerState;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Task to clock in on
    #[arg(long, short)]
    pub task: i64,
}

pub async fn cmd(args: StartArgs) -> Result<()> {
    let ctx = AppContext::build()?;
    ctx.tracker.reconcile().await?;

    if ctx.tracker.state() == TrackerState::Active {
        let id = ctx.tracker.session().map(|s| s.id).unwrap_or_default();
        msg_bail_anyhow!(Message::SessionAlreadyActive(id));
    }

    ctx.tracker.start(args.task).await?;
    Ok(())
}
