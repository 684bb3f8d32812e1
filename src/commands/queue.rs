//! Pending upload queue inspection command.
//!
//! Lists the durably queued actions awaiting delivery, with an
//! administrative `--clear` escape hatch that wipes the queue after
//! confirmation.

use crate::libs::context::AppContext;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use prettytable::{format, row, Table};

#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Delete all queued actions unconditionally
    #[arg(long)]
    clear: bool,
}

pub async fn cmd(args: QueueArgs) -> Result<()> {
    let ctx = AppContext::build()?;

    if args.clear {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptConfirmClearQueue.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_print!(Message::OperationCancelled);
            return Ok(());
        }
        let removed = ctx.queue.clear()?;
        msg_print!(Message::QueueCleared(removed));
        return Ok(());
    }

    let actions = ctx.queue.snapshot()?;
    if actions.is_empty() {
        msg_print!(Message::QueueEmpty);
        return Ok(());
    }

    msg_print!(Message::QueueListHeader);
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["ID", "Kind", "Enqueued", "Retries"]);
    for action in &actions {
        table.add_row(row![
            action.id,
            action.kind,
            action.enqueued_at.format("%Y-%m-%d %H:%M:%S"),
            format!("{}/{}", action.retry_count, action.max_retries),
        ]);
    }
    table.printstd();

    msg_print!(Message::QueueSize(actions.len()));
    Ok(())
}
