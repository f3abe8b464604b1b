//! Text-generation backends for the Tence session.

pub mod completion_api_generator;
pub mod echo_generator;
pub mod timeout_generator;

pub use completion_api_generator::CompletionApiGenerator;
pub use echo_generator::EchoGenerator;
pub use timeout_generator::TimeoutGenerator;

use std::sync::Arc;
use std::time::Duration;
use tence_core::Generator;
use tence_core::config::BackendConfig;

/// Which backend a front-end asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// HTTP completion server from [`BackendConfig`].
    #[default]
    CompletionApi,
    /// Offline [`EchoGenerator`].
    Echo,
}

/// Builds the configured backend wrapped in the timeout hook.
pub fn build_generator(kind: BackendKind, config: &BackendConfig) -> Arc<dyn Generator> {
    let limit = Duration::from_secs(config.timeout_secs);
    match kind {
        BackendKind::CompletionApi => {
            tracing::info!(model = %config.model, url = %config.base_url, "Using completion API backend");
            Arc::new(TimeoutGenerator::new(
                CompletionApiGenerator::from_config(config),
                limit,
            ))
        }
        BackendKind::Echo => {
            tracing::info!("Using offline echo backend");
            Arc::new(TimeoutGenerator::new(EchoGenerator::new(), limit))
        }
    }
}
