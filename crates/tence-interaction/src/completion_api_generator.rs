//! CompletionApiGenerator - HTTP client for OpenAI-compatible completion servers.
//!
//! Works against any server exposing `POST {base_url}/completions` with the
//! classic prompt/choices shape (vLLM, llama.cpp server, text-generation-webui).
//!
//! Servers return only the continuation. The generator prepends the prompt so
//! its output reads like a causal LM's, labels included, and reply extraction
//! behaves the same for every backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tence_core::config::BackendConfig;
use tence_core::{Generator, Result, TenceError};

/// Generator that talks to a completion endpoint over HTTP.
#[derive(Clone)]
pub struct CompletionApiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl CompletionApiGenerator {
    /// Creates a generator for `base_url` (with or without a trailing slash).
    pub fn new(base_url: &str, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key: None,
            temperature: 0.8,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        let generator = Self::new(&config.base_url, config.model.clone())
            .with_temperature(config.temperature);
        match &config.api_key {
            Some(key) => generator.with_api_key(key.clone()),
            None => generator,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, prompt: &'a str, max_new_tokens: u32) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: max_new_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl Generator for CompletionApiGenerator {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        let body = self.build_request(prompt, max_new_tokens);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TenceError::generation(format!("Completion request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|err| {
            TenceError::generation(format!("Failed to parse completion response: {err}"))
        })?;

        let continuation = extract_text(parsed)?;
        Ok(with_prompt(prompt, &continuation))
    }

    fn name(&self) -> &str {
        "completion-api"
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .ok_or_else(|| TenceError::generation("Completion API returned no text"))
}

fn with_prompt(prompt: &str, continuation: &str) -> String {
    format!("{prompt}{continuation}")
}

fn map_http_error(status: StatusCode, body: &str) -> TenceError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    TenceError::generation(format!("Completion API returned {status}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tence_core::session::{TranscriptEntry, assemble, extract_response};

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let generator = CompletionApiGenerator::new("http://localhost:8000/v1/", "m");
        assert_eq!(generator.endpoint(), "http://localhost:8000/v1/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let generator = CompletionApiGenerator::new("http://x/v1", "ghost").with_temperature(0.5);
        let body = serde_json::to_value(generator.build_request("User: hi\nAssistant:", 50)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "ghost",
                "prompt": "User: hi\nAssistant:",
                "max_tokens": 50,
                "temperature": 0.5,
            })
        );
    }

    #[test]
    fn test_extract_first_choice() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"text":" fine"},{"text":"other"}]}"#).unwrap();
        assert_eq!(extract_text(response).unwrap(), " fine");
    }

    #[test]
    fn test_continuation_is_trimmed_after_extraction() {
        let prompt = assemble(&[TranscriptEntry::turn("hi", "hello")], "how are you");
        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"text":" I am fine\n"}]}"#).unwrap();

        let raw = with_prompt(&prompt, &extract_text(response).unwrap());

        assert!(raw.starts_with("User: hi\nAssistant: hello\n"));
        assert_eq!(extract_response(&raw), "I am fine");
    }

    #[test]
    fn test_from_config_carries_key_and_temperature() {
        let config = BackendConfig {
            api_key: Some("sk-test".to_string()),
            temperature: 0.3,
            ..BackendConfig::default()
        };
        let generator = CompletionApiGenerator::from_config(&config);

        assert_eq!(generator.api_key.as_deref(), Some("sk-test"));
        assert_eq!(generator.temperature, 0.3);
        assert_eq!(generator.endpoint(), "http://127.0.0.1:8000/v1/completions");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_text(response).unwrap_err().is_generation());
    }

    #[test]
    fn test_http_error_uses_server_message() {
        let err = map_http_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":{"message":"model loading"}}"#,
        );
        assert!(err.to_string().contains("model loading"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_http_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
    }
}
