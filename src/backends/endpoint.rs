//! Adapter for hosted text-generation inference endpoints.
//!
//! Speaks the Hugging Face Inference API wire format: a POST with an
//! `inputs` payload, answered by a list of `generated_text` objects. The
//! endpoint URL defaults to the hosted inference route for the configured
//! model id. Decoding is pinned to no sampling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::BenchError;
use crate::provider::AnswerProvider;

fn default_endpoint_url(model_id: &str) -> String {
    format!("https://api-inference.huggingface.co/models/{model_id}")
}

/// Client for hosted inference endpoints.
pub struct InferenceEndpoint {
    max_new_tokens: u32,
    api_key: Option<String>,
    endpoint_url: String,
    client: Client,
}

#[derive(Serialize)]
struct EndpointRequest<'a> {
    inputs: &'a str,
    parameters: EndpointParameters,
}

#[derive(Serialize)]
struct EndpointParameters {
    max_new_tokens: u32,
    do_sample: bool,
}

#[derive(Deserialize, Debug)]
struct EndpointReply {
    generated_text: String,
}

impl InferenceEndpoint {
    /// Creates the adapter from a run configuration. An explicit API key
    /// wins over the `HF_API_TOKEN` environment variable; without either
    /// the request is sent unauthenticated, which self-hosted endpoints
    /// accept.
    pub fn new(config: &ModelConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Self {
            max_new_tokens: config.max_new_tokens,
            api_key: config.resolved_api_key(),
            endpoint_url: config
                .endpoint_url
                .clone()
                .unwrap_or_else(|| default_endpoint_url(&config.model_id)),
            client: builder.build().expect("Failed to build reqwest Client"),
        }
    }
}

#[async_trait]
impl AnswerProvider for InferenceEndpoint {
    fn name(&self) -> &str {
        "hf_api"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BenchError> {
        let body = EndpointRequest {
            inputs: prompt,
            parameters: EndpointParameters {
                max_new_tokens: self.max_new_tokens,
                do_sample: false,
            },
        };

        let mut request = self.client.post(&self.endpoint_url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request.send().await?;
        log::debug!("Inference endpoint HTTP status: {}", resp.status());
        let resp = resp.error_for_status()?;

        let replies: Vec<EndpointReply> = resp.json().await?;
        let reply = replies
            .first()
            .ok_or_else(|| BenchError::ResponseFormatError {
                message: "inference endpoint returned no generations".to_string(),
                raw_response: "[]".to_string(),
            })?;

        Ok(reply.generated_text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{InferenceResult, ModelAnswer};
    use crate::config::BackendKind;
    use crate::question::OptionLetter;

    fn config(url: &str) -> ModelConfig {
        ModelConfig::new(BackendKind::InferenceEndpoint, "mock-model")
            .api_key("z")
            .endpoint_url(url)
    }

    #[test]
    fn default_url_derives_from_the_model_id() {
        assert_eq!(
            default_endpoint_url("org/model"),
            "https://api-inference.huggingface.co/models/org/model"
        );
    }

    #[tokio::test]
    async fn parses_generated_text_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer z")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text":"Answer: D\nExplanation: hf explanation"}]"#)
            .create_async()
            .await;

        let backend = InferenceEndpoint::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        mock.assert_async().await;
        assert_eq!(result.answer, ModelAnswer::Letter(OptionLetter::D));
        assert_eq!(result.explanation, "hf explanation");
    }

    #[tokio::test]
    async fn unreachable_endpoint_becomes_the_generation_sentinel() {
        let backend = InferenceEndpoint::new(&config("http://127.0.0.1:9"));
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }

    #[tokio::test]
    async fn reply_without_generated_text_becomes_the_generation_sentinel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{}]"#)
            .create_async()
            .await;

        let backend = InferenceEndpoint::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }

    #[tokio::test]
    async fn empty_reply_list_becomes_the_generation_sentinel() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let backend = InferenceEndpoint::new(&config(&server.url()));
        let result = backend.ask("prompt").await;

        assert_eq!(result, InferenceResult::generation_error());
    }
}
