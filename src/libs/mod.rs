//! Core library modules of the timecap client.
//!
//! The session & capture pipeline lives here: the session state machine
//! ([`tracker`]), the capture scheduler ([`scheduler`]), the durable action
//! queue ([`queue`]) and the connectivity monitor ([`connectivity`]),
//! together with the supporting infrastructure (configuration, encrypted
//! token storage, message catalog, platform data paths).

pub mod action;
pub mod capture;
pub mod config;
pub mod connectivity;
pub mod context;
pub mod data_storage;
pub mod messages;
pub mod network;
pub mod queue;
pub mod scheduler;
pub mod secret;
pub mod session;
pub mod tracker;
