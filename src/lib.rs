//! A benchmark harness scoring LLM backends on multiple-choice question
//! sets.
//!
//! The harness builds a fixed prompt for every question, dispatches it to
//! the configured inference backend (an in-process model or one of three
//! remote API styles), parses the raw response into an (answer,
//! explanation) pair and classifies it against the expected option. Label
//! counts are aggregated across the run.
//!
//! ```no_run
//! use mcqbench::{run_benchmark, BackendKind, Dispatcher, ModelConfig};
//!
//! # async fn demo(questions: Vec<mcqbench::QuestionRecord>) -> Result<(), mcqbench::BenchError> {
//! let config = ModelConfig::new(BackendKind::OpenAiCompatible, "gpt-4")
//!     .api_key("sk-...")
//!     .max_new_tokens(256);
//! let dispatcher = Dispatcher::new();
//! let report = run_benchmark(&questions, &config, &dispatcher, None).await?;
//! println!("{:?}", report.aggregate);
//! # Ok(())
//! # }
//! ```

pub mod answer;
pub mod backends;
pub mod config;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod harness;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod question;
pub mod report;
pub mod scorer;

pub use answer::{InferenceResult, ModelAnswer};
pub use backends::{
    CacheKeyPolicy, GoogleGenerative, InferenceEndpoint, LocalBackend, ModelCache,
    OpenAiCompatible, PipelineLoader, TextGenPipeline,
};
pub use config::{max_new_tokens_or_default, BackendKind, ModelConfig, DEFAULT_MAX_NEW_TOKENS};
pub use dataset::load_dataset;
pub use dispatch::Dispatcher;
pub use error::BenchError;
pub use harness::{
    run_benchmark, run_benchmark_with_provider, score_results, QuestionResult, RunReport,
};
pub use parser::parse_output;
pub use prompt::build_prompt;
pub use provider::AnswerProvider;
pub use question::{OptionLetter, QuestionMetadata, QuestionRecord};
pub use report::{save_raw_results, save_results_jsonl, save_summary, RunSummary};
pub use scorer::{classify, tally, EvalLabel, RunAggregate};
