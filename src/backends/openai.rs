//! Chat-completion adapter for OpenAI-compatible endpoints.
//!
//! Works against the official API as well as any server speaking the same
//! wire format when given a custom base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::BenchError;
use crate::provider::AnswerProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible chat-completion APIs.
pub struct OpenAiCompatible {
    model_id: String,
    max_new_tokens: u32,
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionChoice {
    message: ChatCompletionMsg,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionMsg {
    content: String,
}

impl OpenAiCompatible {
    /// Creates the adapter from a run configuration. The API key is
    /// resolved once: an explicit key wins over the `OPENAI_API_KEY`
    /// environment variable.
    pub fn new(config: &ModelConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Self {
            model_id: config.model_id.clone(),
            max_new_tokens: config.max_new_tokens,
            api_key: config.resolved_api_key(),
            base_url: config
                .endpoint_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: builder.build().expect("Failed to build reqwest Client"),
        }
    }
}

#[async_trait]
impl AnswerProvider for OpenAiCompatible {
    fn name(&self) -> &str {
        "openAI"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BenchError> {
        let Some(api_key) = &self.api_key else {
            return Err(BenchError::AuthError(
                "Missing OpenAI API key".to_string(),
            ));
        };

        let body = ChatCompletionRequest {
            model: &self.model_id,
            messages: vec![ChatCompletionMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_new_tokens,
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        log::debug!("OpenAI HTTP status: {}", resp.status());
        let resp = resp.error_for_status()?;

        let json_resp: ChatCompletionResponse = resp.json().await?;
        let choice = json_resp
            .choices
            .first()
            .ok_or_else(|| BenchError::ResponseFormatError {
                message: "chat completion returned no choices".to_string(),
                raw_response: format!("{json_resp:?}"),
            })?;

        Ok(choice.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{InferenceResult, ModelAnswer};
    use crate::config::BackendKind;
    use crate::question::OptionLetter;

    fn config(url: &str) -> ModelConfig {
        ModelConfig::new(BackendKind::OpenAiCompatible, "gpt-4")
            .api_key("x")
            .endpoint_url(url)
    }

    #[tokio::test]
    async fn parses_chat_completion_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer x")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"Answer: B\nExplanation: openai explanation"}}]}"#,
            )
            .create_async()
            .await;

        let backend = OpenAiCompatible::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        mock.assert_async().await;
        assert_eq!(result.answer, ModelAnswer::Letter(OptionLetter::B));
        assert_eq!(result.explanation, "openai explanation");
    }

    #[tokio::test]
    async fn upstream_error_status_becomes_the_generation_sentinel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":"Unauthorized"}"#)
            .create_async()
            .await;

        let backend = OpenAiCompatible::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }

    #[tokio::test]
    async fn empty_choices_become_the_generation_sentinel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let backend = OpenAiCompatible::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }

    #[tokio::test]
    async fn missing_api_key_is_recovered_not_propagated() {
        // Built directly so an ambient OPENAI_API_KEY cannot leak in.
        let backend = OpenAiCompatible {
            model_id: "gpt-4".to_string(),
            max_new_tokens: 256,
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            client: Client::new(),
        };
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }
}
