//! Error types for the feedback service
//!
//! This module provides structured error definitions using thiserror; the
//! binary layers anyhow on top for propagation out of `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for feedback operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record store could not be read or written as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A classifier artifact is missing or unusable
    #[error("Model artifact error at {}: {reason}", .path.display())]
    ModelArtifact { path: PathBuf, reason: String },

    /// Submitted form fields failed validation
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// HTML rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Blocking store task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl FeedbackError {
    /// Shorthand for artifact failures
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FeedbackError::ModelArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Convert anyhow::Error to FeedbackError
impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Other(err.to_string())
    }
}
