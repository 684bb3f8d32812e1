//! Display implementation for timecap application messages.
//!
//! Converts structured `Message` variants into the human-readable text shown
//! in the terminal. All message wording lives here so the rest of the code
//! never embeds user-facing strings directly.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === SESSION / TRACKER MESSAGES ===
            Message::SessionStarted(id) => format!("Tracking started (session #{}).", id),
            Message::SessionStopped(id) => format!("Tracking stopped (session #{}).", id),
            Message::SessionAlreadyActive(id) => format!("A session is already active (#{}). Stop it first.", id),
            Message::SessionNotActive => "No active session.".to_string(),
            Message::SessionStartFailed(error) => format!("Failed to start tracking: {}. Please try again.", error),
            Message::SessionStopFailed(error) => format!("Failed to stop tracking: {}. Please try again.", error),
            Message::SessionRecovered(id) => format!("Recovered active session #{} from the server.", id),
            Message::SessionStaleCorrected => "Local state claimed an active session, but the server has none. Corrected to idle.".to_string(),
            Message::SessionElapsed(elapsed) => format!("Elapsed: {}", elapsed),
            Message::TrackerState(state) => format!("Tracker state: {}", state),
            Message::TrackingRequiresLogin => "You must be logged in to start tracking. Run 'timecap login' first.".to_string(),
            Message::TrackingRequiresTask => "A task must be selected to start tracking.".to_string(),
            Message::TrackingRequiresProject => "The selected task does not resolve to a project.".to_string(),

            // === QUEUE MESSAGES ===
            Message::QueueSize(count) => format!("{} action(s) pending in the local queue.", count),
            Message::QueueEmpty => "The local queue is empty.".to_string(),
            Message::QueueCleared(count) => format!("Cleared {} queued action(s).", count),
            Message::QueueActionEnqueued(kind) => format!("Queued {} for later delivery.", kind),
            Message::QueueActionApplied(id) => format!("Queued action #{} applied.", id),
            Message::QueueActionRetryScheduled(id, retry, max) => {
                format!("Queued action #{} failed (attempt {}/{}), will retry on next drain.", id, retry, max)
            }
            Message::QueueActionDropped(id, max) => format!("Queued action #{} dropped after {} failed attempts.", id, max),
            Message::QueueDrainStarted(count) => format!("Draining {} queued action(s)...", count),
            Message::QueueDrainFinished(applied, retried, dropped) => {
                format!("Drain finished: {} applied, {} left for retry, {} dropped.", applied, retried, dropped)
            }
            Message::QueueDrainSkipped => "Drain already in progress, skipping.".to_string(),
            Message::QueueEnqueueFailed(error) => format!("Local storage rejected a queued action, data lost: {}", error),
            Message::QueueDrainFailed(error) => format!("Queue drain hit a storage error: {}", error),
            Message::QueueListHeader => "Pending actions:".to_string(),
            Message::QueueDroppedTotal(count) => format!("{} action(s) permanently dropped since start.", count),

            // === CAPTURE MESSAGES ===
            Message::CaptureTick => "Capture tick".to_string(),
            Message::CaptureFailed(error) => format!("Screenshot capture failed, tick skipped: {}", error),
            Message::CapturePermissionDenied => "Screen capture permission denied; uploading flagged frame.".to_string(),
            Message::CaptureUploadFailed(error) => format!("Screenshot upload failed, queued for retry: {}", error),
            Message::CaptureSchedulerStarted(minutes) => format!("Capture scheduler running every {} minute(s).", minutes),
            Message::CaptureSchedulerStopped => "Capture scheduler stopped.".to_string(),
            Message::CaptureIntervalOutOfRange(minutes) => {
                format!("Capture interval {} is out of range, must be between 1 and 60 minutes.", minutes)
            }
            Message::CaptureIntervalChangeWhileActive => {
                "Capture interval can only be changed while idle. Stop tracking first.".to_string()
            }
            Message::CaptureEmptyImage => "Screenshot tool produced an empty image.".to_string(),
            Message::CaptureUnsupportedPlatform => "Screen capture is not supported on this platform.".to_string(),
            Message::CaptureToolFailed(code) => format!("Screenshot tool exited with status {}.", code),

            // === CONNECTIVITY MESSAGES ===
            Message::ConnectivityOnline => "Back online.".to_string(),
            Message::ConnectivityOffline => "Connection lost, buffering locally.".to_string(),
            Message::ConnectivityStatus(online) => format!("Network: {}", if *online { "online" } else { "offline" }),

            // === AUTHENTICATION MESSAGES ===
            Message::LoginSucceeded(email) => format!("Logged in as {}.", email),
            Message::LoginFailed => "Login failed".to_string(),
            Message::LogoutCompleted => "Logged out.".to_string(),
            Message::LogoutStopError(error) => format!("Session stop reported an error during logout: {}", error),
            Message::NotLoggedIn => "Not logged in.".to_string(),
            Message::WrongPassword(count) => format!("You entered the wrong password {} times!", count),
            Message::TokenMissing => "No stored credentials found. Run 'timecap login'.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::ConfigModuleTracker => "Tracker server settings".to_string(),
            Message::ConfigModuleCapture => "Capture settings".to_string(),
            Message::TrackerConfigNotFound => "Tracker server is not configured. Run 'timecap init' first.".to_string(),

            // === API MESSAGES ===
            Message::ApiConnectionFailed => "Failed to connect to the tracker API".to_string(),
            Message::ApiRequestFailed(error) => format!("Tracker API request failed: {}", error),
            Message::TaskNotFoundRemote(id) => format!("Task {} does not exist on the server.", id),

            // === DATABASE MESSAGES ===
            Message::DbConnectionFailed => "Failed to connect to database".to_string(),
            Message::DbQueryFailed => "Database query failed".to_string(),
            Message::DbMigrationFailed => "Database migration failed".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),

            // === TRACK LOOP MESSAGES ===
            Message::TrackLoopStarting => "Tracking loop started. Press Ctrl+C to exit.".to_string(),
            Message::TrackLoopStopped => "Tracking loop stopped.".to_string(),
            Message::TrackReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),

            // === PROMPTS ===
            Message::PromptTrackerApiUrl => "Enter the tracker API URL".to_string(),
            Message::PromptEmployeeEmail => "Enter your work email".to_string(),
            Message::PromptEmployeePassword => "Enter your password".to_string(),
            Message::PromptCaptureInterval => "Capture interval (minutes, 1-60)".to_string(),
            Message::PromptMaxRetries => "Maximum delivery retries per queued action".to_string(),
            Message::PromptDrainInterval => "Queue drain interval (seconds)".to_string(),
            Message::PromptProbeInterval => "Connectivity probe interval (seconds)".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptConfirmClearQueue => "Delete ALL pending actions? This cannot be undone.".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::InvalidInput => "Invalid input provided".to_string(),
        };

        write!(f, "{}", text)
    }
}
