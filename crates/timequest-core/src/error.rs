//! Core error types for timequest-core.
//!
//! This module defines the error hierarchy using thiserror. The `Display`
//! text of [`PlacementError`] and [`ValidationError`] is the notice shown to
//! the student, so keep it short and friendly.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timequest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Placement rule violations on a schedule grid
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// User input validation failures
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Local key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI planner errors
    #[error("AI planner error: {0}")]
    Ai(#[from] AiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A drop onto the schedule grid was refused. No state was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Not enough time in the schedule for this task here!")]
    Overflow {
        task_id: String,
        day: usize,
        start: usize,
        duration: usize,
        slots_per_day: usize,
    },

    #[error("Another task is already scheduled in this spot!")]
    Occupied {
        task_id: String,
        day: usize,
        index: usize,
        occupant: String,
    },

    #[error("That time is locked.")]
    Locked { day: usize, index: usize },

    #[error("That task is part of the fixed schedule and can't be moved.")]
    FixedTask(String),

    #[error("There is no slot at day {day}, position {index}.")]
    UnknownSlot { day: usize, index: usize },

    #[error("There is no slot called '{0}'.")]
    UnknownSlotId(String),

    #[error("There is no task called '{0}' here.")]
    UnknownTask(String),

    #[error("This lesson is already checked. Start a new round to keep playing.")]
    Submitted,
}

/// Validation errors for form-style input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill out all fields for the new event.")]
    MissingEventFields,

    #[error("'{0}' is not a time we understand. Try something like 3:30 PM.")]
    InvalidTime(String),

    #[error("'{0}' is not a valid date. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("You still have tasks to schedule!")]
    TasksRemaining { remaining: usize },

    #[error("There is no list called '{0}'.")]
    UnknownList(String),

    #[error("There is no item '{id}' in '{list}'.")]
    UnknownItem { list: String, id: String },

    #[error("Please write an answer before moving on.")]
    EmptyAnswer,

    #[error("Add {0} to your helpers first.")]
    DelegateUnavailable(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Stored value could not be decoded
    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the external planner model and the prompt flows around it.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("missing API key: environment variable {var} is not set")]
    MissingApiKey { var: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response for '{flow}' does not match the expected shape: {message}")]
    InvalidResponse { flow: String, message: String },

    #[error("invalid input for '{flow}': {message}")]
    InvalidInput { flow: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                StoreError::Locked
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Request(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
