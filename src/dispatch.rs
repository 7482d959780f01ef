//! Routing of a run configuration to its backend adapter.

use std::sync::Arc;

use crate::answer::InferenceResult;
use crate::backends::{
    GoogleGenerative, InferenceEndpoint, LocalBackend, ModelCache, OpenAiCompatible,
    PipelineLoader,
};
use crate::config::{BackendKind, ModelConfig};
use crate::error::BenchError;
use crate::provider::AnswerProvider;

/// Builds the adapter matching a configuration's backend kind.
///
/// Owns the in-process model cache so its lifetime is tied to the run
/// context rather than to ambient module state. The backend tag itself is
/// validated earlier, when the caller parses it into [`BackendKind`];
/// unknown tags never reach this point.
pub struct Dispatcher {
    local_cache: Arc<ModelCache>,
    pipeline_loader: Option<Arc<dyn PipelineLoader>>,
}

impl Dispatcher {
    /// A dispatcher for remote backends only.
    pub fn new() -> Self {
        Self {
            local_cache: Arc::new(ModelCache::new()),
            pipeline_loader: None,
        }
    }

    /// A dispatcher that can also serve the local backend through the
    /// given pipeline loader.
    pub fn with_pipeline_loader(loader: Arc<dyn PipelineLoader>) -> Self {
        Self {
            local_cache: Arc::new(ModelCache::new()),
            pipeline_loader: Some(loader),
        }
    }

    /// Replaces the model cache, e.g. to share one across dispatchers.
    pub fn with_model_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.local_cache = cache;
        self
    }

    pub fn model_cache(&self) -> &Arc<ModelCache> {
        &self.local_cache
    }

    /// Constructs the adapter for the configuration. Called once per run;
    /// the returned provider is reused for every question.
    pub fn provider_for(
        &self,
        config: &ModelConfig,
    ) -> Result<Box<dyn AnswerProvider>, BenchError> {
        match config.backend {
            BackendKind::Local => {
                let Some(loader) = &self.pipeline_loader else {
                    return Err(BenchError::InvalidRequest(
                        "local backend requires a pipeline loader".to_string(),
                    ));
                };
                Ok(Box::new(LocalBackend::new(
                    config,
                    self.local_cache.clone(),
                    loader.clone(),
                )))
            }
            BackendKind::OpenAiCompatible => Ok(Box::new(OpenAiCompatible::new(config))),
            BackendKind::GenerativeApi => Ok(Box::new(GoogleGenerative::new(config))),
            BackendKind::InferenceEndpoint => Ok(Box::new(InferenceEndpoint::new(config))),
        }
    }

    /// One-shot convenience: dispatch and answer a single prompt.
    pub async fn ask_model(
        &self,
        prompt: &str,
        config: &ModelConfig,
    ) -> Result<InferenceResult, BenchError> {
        let provider = self.provider_for(config)?;
        Ok(provider.ask(prompt).await)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
