//! Unified path management for Tence files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tence/             # Config directory
//! ├── config.toml              # Optional application configuration
//! └── logs/                    # REPL logs
//!     └── tence.log.YYYY-MM-DD
//!
//! ~/.local/share/tence/        # Data directory
//! ├── user_data.json           # Entitlement record
//! └── chat_history.json        # Transcript
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "tence";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// No platform config/data directory could be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for tence_core::TenceError {
    fn from(err: PathError) -> Self {
        tence_core::TenceError::config(err.to_string())
    }
}

/// Platform-specific locations (XDG on Linux, Application Support on macOS).
pub struct TencePaths;

impl TencePaths {
    /// Returns the Tence configuration directory (e.g. `~/.config/tence/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Tence data directory (e.g. `~/.local/share/tence/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the optional `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        if let Ok(config_file) = TencePaths::config_file() {
            assert!(config_file.ends_with("tence/config.toml"));
        }
    }

    #[test]
    fn test_logs_dir_under_config_dir() {
        if let (Ok(logs), Ok(config)) = (TencePaths::logs_dir(), TencePaths::config_dir()) {
            assert!(logs.starts_with(&config));
            assert!(logs.ends_with("logs"));
        }
    }

    #[test]
    fn test_path_error_maps_to_config_error() {
        let err: tence_core::TenceError = PathError::HomeDirNotFound.into();
        assert!(matches!(err, tence_core::TenceError::Config(ref m) if m == "Cannot find home directory"));
    }

    #[test]
    fn test_data_dir() {
        if let Ok(data_dir) = TencePaths::data_dir() {
            assert!(data_dir.ends_with("tence"));
        }
    }
}
