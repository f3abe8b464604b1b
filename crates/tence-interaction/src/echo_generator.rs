//! Offline generator that needs no model.
//!
//! Behaves like a causal LM that echoes its prompt: the output is the prompt
//! followed by a canned continuation, so reply extraction runs exactly as it
//! does against a real backend.

use async_trait::async_trait;
use tence_core::session::USER_LABEL;
use tence_core::{Generator, Result};

#[derive(Debug, Clone, Default)]
pub struct EchoGenerator;

impl EchoGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Last user message in the prompt.
    fn last_message(prompt: &str) -> &str {
        prompt
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix(USER_LABEL))
            .map(str::trim)
            .unwrap_or("")
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        let full = format!("You said: {}", Self::last_message(prompt));
        // One word per token is close enough for an offline stand-in.
        let reply: Vec<&str> = full
            .split_whitespace()
            .take(max_new_tokens as usize)
            .collect();
        Ok(format!("{prompt} {}", reply.join(" ")))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tence_core::session::extract_response;

    #[tokio::test]
    async fn test_echo_round_trips_through_extraction() {
        let prompt = "User: hi\nAssistant: hello\nUser: how are you\nAssistant:";
        let raw = EchoGenerator::new().generate(prompt, 50).await.unwrap();

        assert!(raw.starts_with(prompt));
        assert_eq!(extract_response(&raw), "You said: how are you");
    }

    #[tokio::test]
    async fn test_echo_respects_budget() {
        let raw = EchoGenerator::new()
            .generate("User: one two three four\nAssistant:", 3)
            .await
            .unwrap();
        assert_eq!(extract_response(&raw), "You said: one");
    }
}
