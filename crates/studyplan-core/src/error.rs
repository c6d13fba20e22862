//! Core error types for studyplan-core.
//!
//! This module defines the error hierarchy using thiserror. Each concern
//! (time rules, card payloads, configuration, page store) owns an enum,
//! and [`CoreError`] wraps them for callers that do not care which one fired.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Time-rule violations (window, duration, date-only periods)
    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// Card payload errors
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Page store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Entity lifecycle errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Violations of the daily window and date-only rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// The start does not sit exactly on the window start for its day.
    #[error("Invalid start time: expected {expected}, got {actual}")]
    InvalidStartTime { expected: String, actual: String },

    /// The session would run past the end of the window.
    #[error("Duration of {requested} minutes exceeds the {available} minutes available")]
    DurationExceeded { requested: i64, available: i64 },

    #[error("Duration must be positive, got {0} minutes")]
    ZeroOrNegativeDuration(i64),

    /// Stored duration text is not `HH:MM:SS` / `HH:MM`.
    #[error("Unparseable duration: '{0}'")]
    UnparseableDuration(String),

    /// A date-only period carries a time of day.
    #[error("{context}: time component not allowed in '{value}'")]
    TimeComponentNotAllowed { context: String, value: String },
}

/// Structural problems in a card payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Card title is missing or empty")]
    MissingTitle,

    #[error("Card title is {len} characters long (max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Unknown status '{status}' for {family} cards")]
    UnknownStatus { family: String, status: String },

    /// Payload names a parent that differs from the one requested.
    #[error("Payload declares parent '{declared}' but '{requested}' was requested")]
    ConflictingParent { declared: String, requested: String },

    #[error("Invalid card payload: {0}")]
    InvalidCardPayload(String),

    /// A container period carries a time of day.
    #[error(transparent)]
    Period(#[from] SchedulingError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Page store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown container: {0}")]
    UnknownContainer(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// Record in the store cannot be interpreted
    #[error("Malformed record '{id}': {message}")]
    MalformedRecord { id: String, message: String },

    /// Backend failure reported by the store implementation
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Entity lifecycle violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A reschedule update targets another session.
    #[error("Update for '{update}' applied to session '{session}'")]
    WrongSession { session: String, update: String },

    /// Reschedule updates must keep the session length.
    #[error("Reschedule changes duration from {expected} to {actual} minutes")]
    DurationMismatch { expected: i64, actual: i64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
