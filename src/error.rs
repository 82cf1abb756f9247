//! Error types for Chatline
//!
//! This module defines the error taxonomy used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Invalid UTF-8 in a streamed reply is not an error: it is repaired inside
//! [`crate::decode`] and never reaches this type.

use thiserror::Error;

/// Main error type for Chatline operations
///
/// Every variant is scoped to a single operation. None of them is fatal
/// to an interactive session.
#[derive(Error, Debug)]
pub enum ChatlineError {
    /// Configuration-related errors (missing endpoint, missing backend id,
    /// unknown or duplicate profile)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors while talking to the chat backend (connection
    /// refused, DNS failure, timeout, error status, mid-stream disconnect)
    #[error("Error connecting to API: {0}")]
    Transport(String),

    /// The user submitted an empty or whitespace-only query
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Line editor errors in the interactive front-end
    #[error("Readline error: {0}")]
    Readline(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ChatlineError {
    /// Returns true for errors that only affect the current turn
    ///
    /// The interactive loop reports these and keeps reading input.
    pub fn is_turn_scoped(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::EmptyQuery)
    }
}

/// Result type alias for Chatline operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to classify a failure use `downcast_ref::<ChatlineError>()`.
pub type Result<T> = anyhow::Result<T>;
