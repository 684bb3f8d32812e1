//! Command-line interface for the timecap application.
//!
//! Each subcommand lives in its own module with a `cmd` entry point;
//! [`Cli::menu`] parses the arguments and dispatches. Commands that talk to
//! the tracker server build an [`AppContext`](crate::libs::context::AppContext)
//! first, so validation of configuration and credentials happens in one
//! place.

pub mod init;
pub mod login;
pub mod logout;
pub mod queue;
pub mod start;
pub mod status;
pub mod stop;
pub mod track;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Log in to the tracker server")]
    Login,
    #[command(about = "Log out, stopping any active session")]
    Logout,
    #[command(about = "Start tracking a task", arg_required_else_help = true)]
    Start(start::StartArgs),
    #[command(about = "Stop the active session")]
    Stop,
    #[command(about = "Show session, connectivity and queue status")]
    Status,
    #[command(about = "Inspect or clear the pending upload queue")]
    Queue(queue::QueueArgs),
    #[command(about = "Track in the foreground with periodic screenshots")]
    Track(track::TrackArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login => login::cmd().await,
            Commands::Logout => logout::cmd().await,
            Commands::Start(args) => start::cmd(args).await,
            Commands::Stop => stop::cmd().await,
            Commands::Status => status::cmd().await,
            Commands::Queue(args) => queue::cmd(args).await,
            Commands::Track(args) => track::cmd(args).await,
        }
    }
}
