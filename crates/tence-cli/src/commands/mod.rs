pub mod config;
pub mod session;

use std::path::PathBuf;

use anyhow::Result;
use tence_application::{ChatSession, open_session};
use tence_core::config::AppConfig;
use tence_infrastructure::ConfigService;
use tence_interaction::BackendKind;

/// Resolved configuration shared by every subcommand.
pub struct Context {
    pub config: AppConfig,
    pub backend: BackendKind,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, echo: bool) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_config_path(path),
            None => ConfigService::new(),
        };
        Ok(Self {
            config: service.load()?,
            backend: if echo {
                BackendKind::Echo
            } else {
                BackendKind::CompletionApi
            },
        })
    }

    pub async fn open(&self) -> Result<ChatSession> {
        Ok(open_session(&self.config, self.backend).await?)
    }
}
