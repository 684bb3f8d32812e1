//! Local durable storage.
//!
//! Everything that must survive a process restart lives in a single sqlite
//! database in the application data directory: the pending action queue and
//! the local mirror of the current session. Schema evolution goes through
//! the versioned migration manager.

pub mod db;
pub mod migrations;
pub mod queue;
pub mod sessions;
