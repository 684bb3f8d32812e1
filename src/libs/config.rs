//! Configuration management for the timecap client.
//!
//! Handles the JSON configuration file stored in the platform data directory
//! and the interactive setup wizard behind `timecap init`. Each module of
//! the configuration is optional, allowing partial setups: the tracker
//! server connection and the capture pipeline are configured independently.
//!
//! ## Storage
//!
//! The configuration lives in `config.json` under the application data
//! directory resolved by [`DataStorage`]:
//!
//! - **Windows**: `%LOCALAPPDATA%\opentrack\timecap\config.json`
//! - **macOS**: `~/Library/Application Support/opentrack/timecap/config.json`
//! - **Linux**: `~/.local/share/opentrack/timecap/config.json`
//!
//! Credentials are never stored here; the auth token uses the encrypted
//! token store in [`crate::libs::secret`].

use super::data_storage::DataStorage;
use crate::api::tracker::TrackerConfig;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Lowest accepted capture interval in minutes.
pub const MIN_CAPTURE_INTERVAL: u64 = 1;
/// Highest accepted capture interval in minutes.
pub const MAX_CAPTURE_INTERVAL: u64 = 60;

/// Represents a configurable module in the application.
///
/// Used during interactive setup to display the available modules and route
/// the selected ones to their specific setup flows.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Capture pipeline configuration.
///
/// Controls the screenshot scheduler and the durable queue's delivery
/// policy. The capture interval is bounded to `[1, 60]` minutes; values
/// outside the range are rejected at configuration time and again by
/// [`CaptureConfig::validate`] before the scheduler starts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    /// Minutes between screenshot captures while a session is active.
    pub interval_minutes: u64,

    /// Delivery attempts per queued action before it is dropped.
    ///
    /// The policy is uniform across action kinds; the per-record
    /// `max_retries` column keeps kind-specific tuning open as an
    /// extension point.
    pub max_retries: u32,

    /// Seconds between safety-net queue drains while online.
    pub drain_interval_secs: u64,

    /// Seconds between connectivity probes against the tracker API.
    pub probe_interval_secs: u64,
}

impl Default for CaptureConfig {
    /// Default capture policy.
    ///
    /// - 5 minute capture interval
    /// - 3 delivery attempts per queued action
    /// - 30 second drain safety net
    /// - 15 second connectivity probe
    fn default() -> Self {
        CaptureConfig {
            interval_minutes: 5,
            max_retries: 3,
            drain_interval_secs: 30,
            probe_interval_secs: 15,
        }
    }
}

impl CaptureConfig {
    /// Rejects capture intervals outside the `[1, 60]` minute range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CAPTURE_INTERVAL..=MAX_CAPTURE_INTERVAL).contains(&self.interval_minutes) {
            msg_bail_anyhow!(Message::CaptureIntervalOutOfRange(self.interval_minutes));
        }
        Ok(())
    }
}

/// Main configuration container for the entire application.
///
/// All module configurations are optional so users configure only what they
/// need; unconfigured modules are omitted from the JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Tracker server connection (API URL, employee identity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,

    /// Screenshot capture and queue delivery policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// Returns the default configuration when no file exists yet, so the
    /// application can run with minimal setup; a present but unparsable
    /// file is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if one exists.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Runs the interactive configuration setup wizard.
    ///
    /// Presents a multi-select of the available modules (tracker server,
    /// capture pipeline), pre-filled with existing values as defaults, and
    /// returns the updated configuration for saving.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let node_descriptions = vec![
            TrackerConfig::module(),
            ConfigModule {
                key: "capture".to_string(),
                name: "Capture".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "tracker" => config.tracker = Some(TrackerConfig::init(&config.tracker)?),
                "capture" => {
                    let default = config.capture.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleCapture);
                    let capture = CaptureConfig {
                        interval_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCaptureInterval.to_string())
                            .default(default.interval_minutes)
                            .interact_text()?,

                        max_retries: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxRetries.to_string())
                            .default(default.max_retries)
                            .interact_text()?,

                        drain_interval_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDrainInterval.to_string())
                            .default(default.drain_interval_secs)
                            .interact_text()?,

                        probe_interval_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptProbeInterval.to_string())
                            .default(default.probe_interval_secs)
                            .interact_text()?,
                    };
                    capture.validate()?;
                    config.capture = Some(capture);
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
