//! Application configuration model.
//!
//! Loading (file + environment) lives in `tence-infrastructure`; this module
//! only defines the shape and the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unlock secret shipped with the application.
pub const DEFAULT_UNLOCK_CODE: &str = "TENCEPRO2025";
/// Free-tier turns before the unlock code is required.
pub const DEFAULT_MAX_FREE_TURNS: u64 = 5;
/// Generation budget for free-tier turns.
pub const DEFAULT_FREE_TOKENS: u32 = 50;
/// Generation budget once premium.
pub const DEFAULT_PREMIUM_TOKENS: u32 = 200;
/// Memory depth offered to a fresh front-end.
pub const DEFAULT_MEMORY_DEPTH: usize = 3;

pub const DEFAULT_ENTITLEMENT_FILE: &str = "user_data.json";
pub const DEFAULT_TRANSCRIPT_FILE: &str = "chat_history.json";

/// Root configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub unlock_code: String,
    pub max_free_turns: u64,
    pub free_tokens: u32,
    pub premium_tokens: u32,
    pub default_depth: usize,
    /// Directory holding the persisted records. `None` means the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
    pub entitlement_file: PathBuf,
    pub transcript_file: PathBuf,
    pub backend: BackendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            unlock_code: DEFAULT_UNLOCK_CODE.to_string(),
            max_free_turns: DEFAULT_MAX_FREE_TURNS,
            free_tokens: DEFAULT_FREE_TOKENS,
            premium_tokens: DEFAULT_PREMIUM_TOKENS,
            default_depth: DEFAULT_MEMORY_DEPTH,
            data_dir: None,
            entitlement_file: PathBuf::from(DEFAULT_ENTITLEMENT_FILE),
            transcript_file: PathBuf::from(DEFAULT_TRANSCRIPT_FILE),
            backend: BackendConfig::default(),
        }
    }
}

impl AppConfig {
    /// Returns a copy safe to print: secrets are replaced with a marker.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.unlock_code = REDACTED.to_string();
        if copy.backend.api_key.is_some() {
            copy.backend.api_key = Some(REDACTED.to_string());
        }
        copy
    }
}

const REDACTED: &str = "********";

/// Text-generation backend settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of an OpenAI-compatible completions server.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sampling temperature; the backend always samples.
    pub temperature: f32,
    /// Upper bound on a single `generate` call.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/v1".to_string(),
            model: "ghost-core-lora".to_string(),
            api_key: None,
            temperature: 0.8,
            timeout_secs: 120,
        }
    }
}
