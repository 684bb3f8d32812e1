//! Message catalog for all user-facing timecap output.
//!
//! Every string shown to the user is defined as a variant here and rendered
//! through the `Display` implementation in [`super::display`]. Keeping the
//! catalog in one place gives compile-time checked parameters and a single
//! surface for future localization.

/// All user-facing messages of the application.
///
/// Variants carry their dynamic parameters as typed fields; the text itself
/// lives in the `Display` implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === SESSION / TRACKER MESSAGES ===
    SessionStarted(i64),
    SessionStopped(i64),
    SessionAlreadyActive(i64),
    SessionNotActive,
    SessionStartFailed(String),
    SessionStopFailed(String),
    SessionRecovered(i64),
    SessionStaleCorrected,
    SessionElapsed(String),
    TrackerState(String),
    TrackingRequiresLogin,
    TrackingRequiresTask,
    TrackingRequiresProject,

    // === QUEUE MESSAGES ===
    QueueSize(usize),
    QueueEmpty,
    QueueCleared(usize),
    QueueActionEnqueued(String),
    QueueActionApplied(i64),
    QueueActionRetryScheduled(i64, u32, u32),
    QueueActionDropped(i64, u32),
    QueueDrainStarted(usize),
    QueueDrainFinished(usize, usize, usize),
    QueueDrainSkipped,
    QueueEnqueueFailed(String),
    QueueDrainFailed(String),
    QueueListHeader,
    QueueDroppedTotal(u64),

    // === CAPTURE MESSAGES ===
    CaptureTick,
    CaptureFailed(String),
    CapturePermissionDenied,
    CaptureUploadFailed(String),
    CaptureSchedulerStarted(u64),
    CaptureSchedulerStopped,
    CaptureIntervalOutOfRange(u64),
    CaptureIntervalChangeWhileActive,
    CaptureEmptyImage,
    CaptureUnsupportedPlatform,
    CaptureToolFailed(i32),

    // === CONNECTIVITY MESSAGES ===
    ConnectivityOnline,
    ConnectivityOffline,
    ConnectivityStatus(bool),

    // === AUTHENTICATION MESSAGES ===
    LoginSucceeded(String),
    LoginFailed,
    LogoutCompleted,
    LogoutStopError(String),
    NotLoggedIn,
    WrongPassword(i32),
    TokenMissing,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    ConfigModuleTracker,
    ConfigModuleCapture,
    TrackerConfigNotFound,

    // === API MESSAGES ===
    ApiConnectionFailed,
    ApiRequestFailed(String),
    TaskNotFoundRemote(i64),

    // === DATABASE MESSAGES ===
    DbConnectionFailed,
    DbQueryFailed,
    DbMigrationFailed,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    AllMigrationsCompleted,

    // === TRACK LOOP MESSAGES ===
    TrackLoopStarting,
    TrackLoopStopped,
    TrackReceivedCtrlC,

    // === PROMPTS ===
    PromptTrackerApiUrl,
    PromptEmployeeEmail,
    PromptEmployeePassword,
    PromptCaptureInterval,
    PromptMaxRetries,
    PromptDrainInterval,
    PromptProbeInterval,
    PromptSelectModules,
    PromptConfirmClearQueue,

    // === GENERAL MESSAGES ===
    OperationCancelled,
    InvalidInput,
}
