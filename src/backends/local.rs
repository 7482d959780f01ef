//! In-process text generation against a cached model handle.
//!
//! Model loading is expensive, so handles are kept in a [`ModelCache`]
//! owned by the run context and shared with the adapter. The actual
//! pipeline construction lives behind [`PipelineLoader`] so the harness
//! core stays independent of any one inference library; embedders plug in
//! a loader for their runtime of choice.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::BenchError;
use crate::provider::AnswerProvider;

/// A loaded in-process text-generation handle.
pub trait TextGenPipeline: Send + Sync {
    /// Generates a continuation for the prompt with deterministic decoding
    /// (no sampling) and at most `max_new_tokens` new tokens.
    fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, BenchError>;
}

/// Constructs pipeline handles for model identifiers.
pub trait PipelineLoader: Send + Sync {
    /// Loads a pipeline for `model_id`, applying 4-bit quantization when
    /// requested.
    fn load(
        &self,
        model_id: &str,
        quantize_4bit: bool,
    ) -> Result<Arc<dyn TextGenPipeline>, BenchError>;
}

/// How cache entries are keyed.
///
/// The historical behavior keys on the model identifier alone: two loads
/// differing only in the quantization flag collide and the first-loaded
/// handle wins. That quirk is kept as the default until confirmed either
/// way with stakeholders; `ModelIdAndQuantization` keys the flag in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheKeyPolicy {
    #[default]
    ModelIdOnly,
    ModelIdAndQuantization,
}

/// Process-wide cache of loaded pipelines.
///
/// Populated lazily on first use of an identifier and never evicted; a run
/// processes one model per invocation, so the cache stays small. The
/// get-or-create path runs under a mutex so load-once semantics hold even
/// if the harness is driven from multiple threads.
pub struct ModelCache {
    entries: Mutex<HashMap<String, Arc<dyn TextGenPipeline>>>,
    key_policy: CacheKeyPolicy,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::with_key_policy(CacheKeyPolicy::default())
    }

    pub fn with_key_policy(key_policy: CacheKeyPolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            key_policy,
        }
    }

    fn cache_key(&self, model_id: &str, quantize_4bit: bool) -> String {
        match self.key_policy {
            CacheKeyPolicy::ModelIdOnly => model_id.to_string(),
            CacheKeyPolicy::ModelIdAndQuantization => {
                format!("{model_id}#q4={quantize_4bit}")
            }
        }
    }

    /// Returns the cached handle for the key, loading and inserting it
    /// first if absent. The lock is held across the load so concurrent
    /// callers cannot load the same model twice.
    pub fn get_or_load(
        &self,
        model_id: &str,
        quantize_4bit: bool,
        loader: &dyn PipelineLoader,
    ) -> Result<Arc<dyn TextGenPipeline>, BenchError> {
        let key = self.cache_key(model_id, quantize_4bit);
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| BenchError::Generic("model cache lock poisoned".to_string()))?;
        if let Some(pipeline) = entries.get(&key) {
            log::debug!("model cache hit for {key}");
            return Ok(pipeline.clone());
        }

        log::info!("loading model {model_id} (quantize_4bit={quantize_4bit})");
        let pipeline = loader.load(model_id, quantize_4bit)?;
        entries.insert(key, pipeline.clone());
        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter answering prompts with an in-process pipeline.
pub struct LocalBackend {
    model_id: String,
    max_new_tokens: u32,
    quantize_4bit: bool,
    cache: Arc<ModelCache>,
    loader: Arc<dyn PipelineLoader>,
}

impl LocalBackend {
    pub fn new(
        config: &ModelConfig,
        cache: Arc<ModelCache>,
        loader: Arc<dyn PipelineLoader>,
    ) -> Self {
        Self {
            model_id: config.model_id.clone(),
            max_new_tokens: config.max_new_tokens,
            quantize_4bit: config.quantize_4bit,
            cache,
            loader,
        }
    }
}

#[async_trait]
impl AnswerProvider for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BenchError> {
        let pipeline =
            self.cache
                .get_or_load(&self.model_id, self.quantize_4bit, self.loader.as_ref())?;
        log::debug!("prompting local model {}", self.model_id);
        let raw_output = pipeline.generate(prompt, self.max_new_tokens)?;
        Ok(raw_output.trim().to_string())
    }
}
