//! Foreground tracking loop command.
//!
//! Runs the full pipeline until interrupted: startup reconciliation, the
//! capture scheduler while a session is active and the connectivity monitor
//! with its probe and safety-drain timers. On Ctrl+C the timers stop, the
//! queue gets one last drain attempt and, with `--stop`, the session is
//! clocked out; otherwise it stays active server-side so tracking can
//! resume later.

use crate::libs::context::AppContext;
use crate::libs::messages::Message;
use crate::libs::tracker::TrackerState;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Task to clock in on when no session is active yet
    #[arg(long, short)]
    task: Option<i64>,

    /// Clock out when the loop exits
    #[arg(long)]
    stop: bool,
}

pub async fn cmd(args: TrackArgs) -> Result<()> {
    let ctx = AppContext::build()?;
    ctx.tracker.reconcile().await?;

    if ctx.tracker.state() == TrackerState::Idle {
        let Some(task_id) = args.task else {
            msg_bail_anyhow!(Message::TrackingRequiresTask);
        };
        ctx.tracker.start(task_id).await?;
    }

    ctx.monitor.start();
    msg_print!(Message::TrackLoopStarting);

    tokio::signal::ctrl_c().await?;
    msg_print!(Message::TrackReceivedCtrlC);

    ctx.scheduler.stop();
    ctx.monitor.stop();
    if ctx.monitor.is_online() {
        let _ = ctx.queue.drain(ctx.gateway.as_ref()).await;
    }
    if args.stop && ctx.tracker.state() == TrackerState::Active {
        ctx.tracker.stop().await?;
    }

    let dropped = ctx.queue.dropped_total();
    if dropped > 0 {
        msg_print!(Message::QueueDroppedTotal(dropped));
    }
    msg_print!(Message::TrackLoopStopped);
    Ok(())
}
