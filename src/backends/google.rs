//! Single-turn generation adapter for the Google generative-AI service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::BenchError;
use crate::provider::AnswerProvider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` API.
pub struct GoogleGenerative {
    model_id: String,
    max_new_tokens: u32,
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GoogleGenerative {
    /// Creates the adapter from a run configuration. An explicit API key
    /// wins over the `GOOGLE_API_KEY` environment variable.
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
impl AnswerProvider for GoogleGenerative {
    fn name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BenchError> {
        let Some(api_key) = &self.api_key else {
            return Err(BenchError::AuthError(
                "Missing Google API key".to_string(),
            ));
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_new_tokens,
                temperature: 0.0,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_id
        );
        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        log::debug!("Google HTTP status: {}", resp.status());
        let resp = resp.error_for_status()?;

        let json_resp: GenerateContentResponse = resp.json().await?;
        let candidate = json_resp
            .candidates
            .first()
            .ok_or_else(|| BenchError::ResponseFormatError {
                message: "generateContent returned no candidates".to_string(),
                raw_response: format!("{json_resp:?}"),
            })?;
        let text = candidate
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<String>();

        Ok(text.trim().to_string())
    }
}
