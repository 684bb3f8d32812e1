//! # Timecap - employee time-tracking client
//!
//! A command-line client that records work sessions against a remote
//! tracker server and captures periodic screenshots while a session is
//! active.
//!
//! ## Features
//!
//! - **Session Tracking**: Clock in/out against the tracker API with crash
//!   recovery via startup reconciliation
//! - **Periodic Capture**: Screenshots on a configurable interval while a
//!   session is active, uploaded with network identity metadata
//! - **Offline Resilience**: Failed uploads land in a durable sqlite-backed
//!   queue, drained automatically when connectivity returns
//! - **Connectivity Monitoring**: Reachability probes plus a periodic
//!   safety-net drain
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timecap::commands::Cli;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     tokio::task::LocalSet::new().run_until(Cli::menu()).await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
