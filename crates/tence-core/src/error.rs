//! Error types for the Tence session engine.

use std::path::Path;
use thiserror::Error;

/// A shared error type for every Tence crate.
///
/// Quota denial is deliberately absent: running out of free turns is a normal
/// outcome reported through the transcript, not a failure.
#[derive(Error, Debug, Clone)]
pub enum TenceError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// A persisted record exists but cannot be parsed.
    ///
    /// Never repaired automatically; the operator has to look at the file.
    #[error("Corrupt state in {path}: {message}")]
    CorruptState { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The text-generation backend failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// The text-generation backend did not answer in time
    #[error("Generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// File locking error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl TenceError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a CorruptState error for the given file.
    pub fn corrupt(path: &Path, message: impl Into<String>) -> Self {
        Self::CorruptState {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Check if this is a corrupt persisted record
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }

    /// Check if this error came from the generation backend, including timeouts.
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::Timeout { .. })
    }
}

impl From<std::io::Error> for TenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TenceError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TenceError>`.
pub type Result<T> = std::result::Result<T, TenceError>;
