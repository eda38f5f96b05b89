//! Core error types for procrastinus-core.
//!
//! Failures fall into three groups: validation (rejected before any state is
//! touched), not-found (mostly folded into default state by callers) and
//! transient I/O (store or network). None of them is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for procrastinus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Timetable import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// `update` was called on a document that does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Stored document does not match the expected shape
    #[error("Malformed document at {path}: {message}")]
    Malformed { path: String, message: String },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,
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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors. Raised before any state is mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Task title was empty or whitespace
    #[error("Task title must not be empty")]
    EmptyTitle,

    /// Pet name outside the allowed length
    #[error("Pet name must be between 1 and {max} characters")]
    InvalidName { max: usize },

    /// Custom session longer than the allowed ceiling
    #[error("Session of {requested} minutes exceeds the {max}-minute limit")]
    DurationTooLong { requested: u32, max: u32 },

    /// Not enough coins for a purchase
    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    /// Shop item id is not in the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Item id is not in the user's inventory
    #[error("Item not in inventory: {0}")]
    ItemNotOwned(String),

    /// Invalid hour range
    #[error("Invalid hour range: end ({end}) must be greater than start ({start}) within 0..=24")]
    InvalidHourRange { start: f64, end: f64 },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Timetable import errors.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The share link could not be parsed as a URL
    #[error("Invalid timetable link '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Share link names a term with no calendar entry (special terms)
    #[error("Unsupported semester {0}: only semesters 1 and 2 can be imported")]
    UnsupportedSemester(u8),

    /// Transport failure talking to the timetable source
    #[error("Timetable request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Timetable source answered with an error status other than 404
    #[error("Timetable source returned {status} for {module}")]
    Status { module: String, status: u16 },

    /// Lesson time was not in HHMM form
    #[error("Invalid lesson time '{0}'")]
    InvalidTime(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
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

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
