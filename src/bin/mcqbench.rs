use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use mcqbench::{
    load_dataset, max_new_tokens_or_default, run_benchmark, save_raw_results, save_results_jsonl,
    save_summary, BackendKind, Dispatcher, ModelConfig, RunSummary,
};

/// Multiple-choice benchmark runner for LLM backends.
#[derive(Parser, Debug)]
#[command(name = "mcqbench", version, about)]
struct Args {
    /// Path to the test dataset file (.csv)
    #[arg(long)]
    test: PathBuf,

    /// Path to save raw results (.json)
    #[arg(long)]
    results: PathBuf,

    /// Model identifier (local model id or API model name)
    #[arg(long)]
    llm: String,

    /// Friendly model name for reports
    #[arg(long)]
    llm_name: String,

    /// Backend: local | openAI | google | hf_api
    #[arg(long)]
    api: String,

    /// Custom endpoint URL (if applicable)
    #[arg(long)]
    url: Option<String>,

    /// API key (if applicable; falls back to the backend's environment
    /// variable)
    #[arg(long)]
    key: Option<String>,

    /// Maximum number of newly generated tokens per answer; falls back
    /// to 256 when absent or not a positive integer
    #[arg(long)]
    max_length: Option<String>,

    /// Use a 4-bit quantized model (local only)
    #[arg(long)]
    use_q4: bool,

    /// Delay between questions in seconds
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Optional path for the per-line JSONL copy of the results
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// Optional path for the run summary JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let backend: BackendKind = args.api.parse()?;
    let mut config = ModelConfig::new(backend, &args.llm)
        .max_new_tokens(max_new_tokens_or_default(args.max_length.as_deref()))
        .quantize_4bit(args.use_q4);
    if let Some(url) = &args.url {
        config = config.endpoint_url(url);
    }
    if let Some(key) = &args.key {
        config = config.api_key(key);
    }

    let questions = load_dataset(&args.test)
        .with_context(|| format!("loading dataset from {}", args.test.display()))?;
    log::info!("loaded {} questions from {}", questions.len(), args.test.display());

    let delay = (args.interval > 0).then(|| Duration::from_secs(args.interval));
    let dispatcher = Dispatcher::new();
    let report = run_benchmark(&questions, &config, &dispatcher, delay).await?;

    save_raw_results(&report.results, &args.results)?;
    if let Some(jsonl_path) = &args.jsonl {
        save_results_jsonl(&report.results, jsonl_path)?;
    }
    if let Some(summary_path) = &args.summary {
        let summary = RunSummary::from_report(&args.llm_name, &report);
        save_summary(&summary, summary_path)?;
    }

    println!(
        "Finished {} questions in {:.2} seconds. Results saved to: {}",
        report.results.len(),
        report.elapsed.as_secs_f64(),
        args.results.display()
    );
    println!("{}", serde_json::to_string_pretty(&report.aggregate)?);

    Ok(())
}
