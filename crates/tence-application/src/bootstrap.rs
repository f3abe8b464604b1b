//! Composition root shared by the front-ends.

use std::sync::Arc;

use tence_core::Result;
use tence_core::config::AppConfig;
use tence_core::entitlement::EntitlementPolicy;
use tence_infrastructure::{JsonEntitlementRepository, JsonTranscriptRepository, StoragePaths};
use tence_interaction::{BackendKind, build_generator};

use crate::chat_session::ChatSession;

/// Wires the JSON stores and the chosen backend into a [`ChatSession`].
pub async fn open_session(config: &AppConfig, backend: BackendKind) -> Result<ChatSession> {
    let paths = StoragePaths::resolve(config)?;
    tracing::info!(
        "[Bootstrap] Entitlement: {}, transcript: {}",
        paths.entitlement.display(),
        paths.transcript.display()
    );

    ChatSession::open(
        EntitlementPolicy::from(config),
        Arc::new(JsonEntitlementRepository::new(paths.entitlement)),
        Arc::new(JsonTranscriptRepository::new(paths.transcript)),
        build_generator(backend, &config.backend),
    )
    .await
}
