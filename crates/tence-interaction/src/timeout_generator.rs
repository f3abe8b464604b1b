//! Timeout hook around any [`Generator`].

use async_trait::async_trait;
use std::time::Duration;
use tence_core::{Generator, Result, TenceError};
use tokio::time::timeout;

/// Fails a `generate` call that does not finish within `limit`.
///
/// The inner future is dropped on timeout; no retry is attempted.
pub struct TimeoutGenerator<G> {
    inner: G,
    limit: Duration,
}

impl<G: Generator> TimeoutGenerator<G> {
    pub fn new(inner: G, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<G: Generator> Generator for TimeoutGenerator<G> {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        match timeout(self.limit, self.inner.generate(prompt, max_new_tokens)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    backend = self.inner.name(),
                    limit_secs = self.limit.as_secs(),
                    "Generation timed out"
                );
                Err(TenceError::Timeout {
                    seconds: self.limit.as_secs(),
                })
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
