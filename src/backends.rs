//! Backend adapters, one per [`BackendKind`](crate::config::BackendKind).

pub mod endpoint;
pub mod google;
pub mod local;
pub mod openai;

pub use endpoint::InferenceEndpoint;
pub use google::GoogleGenerative;
pub use local::{CacheKeyPolicy, LocalBackend, ModelCache, PipelineLoader, TextGenPipeline};
pub use openai::OpenAiCompatible;
