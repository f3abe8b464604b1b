//! Configuration loading.
//!
//! Resolution order: built-in defaults, then `config.toml`
//! (`~/.config/tence/config.toml` or `$TENCE_CONFIG`), then environment
//! variables. A malformed file or override is fatal; a missing file is not.

use crate::paths::TencePaths;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tence_core::config::AppConfig;
use tence_core::{Result, TenceError};

pub const ENV_CONFIG: &str = "TENCE_CONFIG";
pub const ENV_UNLOCK_CODE: &str = "TENCE_UNLOCK_CODE";
pub const ENV_MAX_FREE_TURNS: &str = "TENCE_MAX_FREE_TURNS";
pub const ENV_FREE_TOKENS: &str = "TENCE_FREE_TOKENS";
pub const ENV_PREMIUM_TOKENS: &str = "TENCE_PREMIUM_TOKENS";
pub const ENV_DEFAULT_DEPTH: &str = "TENCE_DEFAULT_DEPTH";
pub const ENV_DATA_DIR: &str = "TENCE_DATA_DIR";
pub const ENV_USER_FILE: &str = "TENCE_USER_FILE";
pub const ENV_HISTORY_FILE: &str = "TENCE_HISTORY_FILE";
pub const ENV_BACKEND_URL: &str = "TENCE_BACKEND_URL";
pub const ENV_MODEL: &str = "MODEL_PATH";
pub const ENV_API_KEY: &str = "TENCE_API_KEY";
pub const ENV_GENERATION_TIMEOUT: &str = "TENCE_GENERATION_TIMEOUT";

/// Absolute locations of the two persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub entitlement: PathBuf,
    pub transcript: PathBuf,
}

impl StoragePaths {
    /// Joins relative file names onto the configured (or platform) data dir.
    pub fn resolve(config: &AppConfig) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => TencePaths::data_dir()?,
        };
        Ok(Self {
            entitlement: data_dir.join(&config.entitlement_file),
            transcript: data_dir.join(&config.transcript_file),
        })
    }
}

/// Loads [`AppConfig`] from file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    /// Explicit config file; takes precedence over `$TENCE_CONFIG`.
    config_path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Loads the configuration using the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration with an explicit environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match &self.config_path {
            Some(path) => Some(path.clone()),
            None => match env(ENV_CONFIG) {
                Some(path) => Some(PathBuf::from(path)),
                None => TencePaths::config_file().ok(),
            },
        };

        let mut config = match path {
            Some(path) => Self::read_file(&path)?.unwrap_or_default(),
            None => AppConfig::default(),
        };

        apply_env_overrides(&mut config, env)?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Option<AppConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| {
            TenceError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(Some(config))
    }
}

/// Overlays environment variables onto `config`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(code) = env(ENV_UNLOCK_CODE) {
        config.unlock_code = code;
    }
    if let Some(value) = env(ENV_MAX_FREE_TURNS) {
        config.max_free_turns = parse_var(ENV_MAX_FREE_TURNS, &value)?;
    }
    if let Some(value) = env(ENV_FREE_TOKENS) {
        config.free_tokens = parse_var(ENV_FREE_TOKENS, &value)?;
    }
    if let Some(value) = env(ENV_PREMIUM_TOKENS) {
        config.premium_tokens = parse_var(ENV_PREMIUM_TOKENS, &value)?;
    }
    if let Some(value) = env(ENV_DEFAULT_DEPTH) {
        config.default_depth = parse_var(ENV_DEFAULT_DEPTH, &value)?;
    }
    if let Some(dir) = env(ENV_DATA_DIR) {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(file) = env(ENV_USER_FILE) {
        config.entitlement_file = PathBuf::from(file);
    }
    if let Some(file) = env(ENV_HISTORY_FILE) {
        config.transcript_file = PathBuf::from(file);
    }
    if let Some(url) = env(ENV_BACKEND_URL) {
        config.backend.base_url = url;
    }
    if let Some(model) = env(ENV_MODEL) {
        config.backend.model = model;
    }
    if let Some(key) = env(ENV_API_KEY) {
        config.backend.api_key = Some(key);
    }
    if let Some(value) = env(ENV_GENERATION_TIMEOUT) {
        config.backend.timeout_secs = parse_var(ENV_GENERATION_TIMEOUT, &value)?;
    }
    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TenceError::config(format!("{name} has an invalid value: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_config_path(dir.path().join("config.toml"));

        let config = service.load_with_env(env_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_then_env() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_free_turns = 2\nfree_tokens = 64\n").unwrap();

        let config = ConfigService::with_config_path(&path)
            .load_with_env(env_from(&[
                (ENV_MAX_FREE_TURNS, "9"),
                (ENV_MODEL, "local-model"),
                (ENV_UNLOCK_CODE, "letmein"),
            ]))
            .unwrap();

        assert_eq!(config.max_free_turns, 9);
        assert_eq!(config.free_tokens, 64);
        assert_eq!(config.backend.model, "local-model");
        assert_eq!(config.unlock_code, "letmein");
    }

    #[test]
    fn test_env_selects_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alt.toml");
        std::fs::write(&path, "premium_tokens = 512\n").unwrap();

        let config = ConfigService::new()
            .load_with_env(env_from(&[(ENV_CONFIG, path.to_str().unwrap())]))
            .unwrap();

        assert_eq!(config.premium_tokens, 512);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_free_turns = \"many\"").unwrap();

        let err = ConfigService::with_config_path(&path)
            .load_with_env(env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, TenceError::Config(_)));
    }

    #[test]
    fn test_bad_numeric_override_is_fatal() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env_from(&[(ENV_FREE_TOKENS, "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_FREE_TOKENS));
    }

    #[test]
    fn test_storage_paths_resolve_relative_and_absolute() {
        let dir = TempDir::new().unwrap();
        let absolute = dir.path().join("elsewhere").join("history.json");
        let config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            transcript_file: absolute.clone(),
            ..AppConfig::default()
        };

        let paths = StoragePaths::resolve(&config).unwrap();

        assert_eq!(paths.entitlement, dir.path().join("user_data.json"));
        assert_eq!(paths.transcript, absolute);
    }
}
