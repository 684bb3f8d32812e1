//! Stop tracking command.
//!
//! One-shot clock-out against the server. Reconciles first so a session
//! started on another device or recovered after a crash can still be
//! stopped from here.

use crate::libs::context::AppContext;
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let ctx = AppContext::build()?;
    ctx.tracker.reconcile().await?;
    ctx.tracker.stop().await?;
    Ok(())
}
