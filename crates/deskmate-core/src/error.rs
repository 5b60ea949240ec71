//! Core error types for deskmate-core.
//!
//! Each concern gets its own thiserror enum; `CoreError` aggregates them so
//! callers that do not care about the origin can use `?` throughout.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for deskmate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Flat-file ledger errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Quiz data and session errors
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// Model client errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded
    #[error("Corrupt row {row}: {message}")]
    CorruptRow { row: i64, message: String },
}

/// Flat-file ledger errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read/write ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed ledger row {line} in {path}: {message}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to access data directory: {0}")]
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Quiz data and session errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The model output could not be turned into questions.
    #[error("Malformed quiz data: {0}")]
    MalformedQuizData(String),

    /// A session needs at least one question.
    #[error("Quiz has no questions")]
    EmptyQuiz,

    /// Answer submitted for a question that does not exist.
    #[error("Question {index} out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    /// Interactive input did not name an option.
    #[error("'{input}' is not one of the {options} options")]
    UnknownChoice { input: String, options: usize },
}

/// Model client errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("No API key configured (set model.api_key or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Invalid model endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no candidate text")]
    EmptyResponse,

    #[error("Unsupported image type: {path} (expected png, jpg, jpeg, webp or gif)")]
    UnsupportedImage { path: PathBuf },

    #[error("Failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Month outside 1..=12
    #[error("Invalid month {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    /// Unparsable date/time/period text
    #[error("Cannot parse '{input}' as {expected}")]
    Unparsable { input: String, expected: &'static str },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
