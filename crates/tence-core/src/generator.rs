//! Text-generation backend contract.

use crate::error::Result;
use async_trait::async_trait;

/// An opaque text-generation backend.
///
/// Implementations sample (non-deterministic decoding) and may echo the prompt
/// back as part of the output; the session extracts the reply itself.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Continues `prompt` with at most `max_new_tokens` new tokens.
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String>;

    /// Short backend name for logs.
    fn name(&self) -> &str {
        "generator"
    }
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        (**self).generate(prompt, max_new_tokens).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
