//! Per-run model configuration.
//!
//! A [`ModelConfig`] is constructed once, before the first question, and
//! treated as immutable for the life of the run. The backend tag is parsed
//! into [`BackendKind`] up front so an unsupported backend fails at
//! configuration time rather than per question.

use secrecy::{ExposeSecret, SecretString};

use crate::error::BenchError;

/// Token budget applied when none is configured or the configured value is
/// not a positive integer.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 256;

/// Supported inference backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process text generation against a cached model handle.
    Local,
    /// Chat-completion request to an OpenAI-compatible endpoint.
    OpenAiCompatible,
    /// Single-turn generation request to a managed generative-AI service.
    GenerativeApi,
    /// HTTP POST to a hosted inference endpoint.
    InferenceEndpoint,
}

impl BackendKind {
    /// Environment variable consulted for the API key when the config does
    /// not carry one. The local backend needs no key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            BackendKind::Local => None,
            BackendKind::OpenAiCompatible => Some("OPENAI_API_KEY"),
            BackendKind::GenerativeApi => Some("GOOGLE_API_KEY"),
            BackendKind::InferenceEndpoint => Some("HF_API_TOKEN"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "openai" | "openai-compatible" => Ok(BackendKind::OpenAiCompatible),
            "google" | "generative-api" => Ok(BackendKind::GenerativeApi),
            "hf_api" | "hf-api" | "inference-endpoint" => Ok(BackendKind::InferenceEndpoint),
            _ => Err(BenchError::InvalidRequest(format!(
                "Unsupported inference backend: {s}"
            ))),
        }
    }
}

/// Configuration for a single benchmark run.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Which adapter answers the questions.
    pub backend: BackendKind,
    /// Model name, API identifier or local model id.
    pub model_id: String,
    /// Upper bound on newly generated tokens per answer.
    pub max_new_tokens: u32,
    /// API key for remote backends. Falls back to the backend's
    /// environment variable when absent.
    pub api_key: Option<SecretString>,
    /// Custom endpoint URL. Each remote backend has its own default.
    pub endpoint_url: Option<String>,
    /// 4-bit quantization toggle, consumed by the local backend only.
    pub quantize_4bit: bool,
    /// Per-request timeout for remote backends.
    pub timeout_seconds: Option<u64>,
}

impl ModelConfig {
    pub fn new(backend: BackendKind, model_id: impl Into<String>) -> Self {
        Self {
            backend,
            model_id: model_id.into(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            api_key: None,
            endpoint_url: None,
            quantize_4bit: false,
            timeout_seconds: None,
        }
    }

    /// Sets the token budget for generated answers.
    pub fn max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Sets a custom endpoint URL.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Enables 4-bit quantization for the local backend.
    pub fn quantize_4bit(mut self, quantize: bool) -> Self {
        self.quantize_4bit = quantize;
        self
    }

    /// Sets the per-request timeout for remote backends.
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Resolves the API key: an explicitly configured key wins, otherwise
    /// the backend's environment variable is consulted.
    pub(crate) fn resolved_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.expose_secret().to_string());
        }
        self.backend
            .api_key_env()
            .and_then(|var| std::env::var(var).ok())
    }
}

/// Coerces a raw textual token budget to an integer, defaulting to
/// [`DEFAULT_MAX_NEW_TOKENS`] when the value is absent, non-numeric or
/// zero.
pub fn max_new_tokens_or_default(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|tokens| *tokens != 0)
        .unwrap_or(DEFAULT_MAX_NEW_TOKENS)
}
