//! Error types for habitflow-core

use thiserror::Error;

/// Main error type for the habitflow-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected input at the store boundary
    #[error("validation error: {0}")]
    Validation(String),

    /// Habit not found
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// Completion level outside {0, 0.25, 0.5, 0.75, 1}
    #[error("invalid completion level: {0} (expected 0, 0.25, 0.5, 0.75 or 1)")]
    InvalidCompletionLevel(f64),

    /// Month string that is not `YYYY-MM`
    #[error("invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),
}

/// Result type alias for habitflow-core
pub type Result<T> = std::result::Result<T, Error>;
