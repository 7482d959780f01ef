//! Persistence of run output: raw per-question records and the run
//! summary document.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BenchError;
use crate::harness::{QuestionResult, RunReport};
use crate::scorer::RunAggregate;

fn ensure_parent_dir(path: &Path) -> Result<(), BenchError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Writes the per-question records as pretty-printed JSON, creating
/// parent directories as needed.
pub fn save_raw_results(
    results: &[QuestionResult],
    output_path: impl AsRef<Path>,
) -> Result<(), BenchError> {
    let path = output_path.as_ref();
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    log::info!("results saved to {}", path.display());
    Ok(())
}

/// Writes the per-question records as JSON Lines, one record per line.
pub fn save_results_jsonl(
    results: &[QuestionResult],
    output_path: impl AsRef<Path>,
) -> Result<(), BenchError> {
    let path = output_path.as_ref();
    ensure_parent_dir(path)?;
    let mut file = fs::File::create(path)?;
    for result in results {
        let line = serde_json::to_string(result)?;
        writeln!(file, "{line}")?;
    }
    log::info!("results saved to {}", path.display());
    Ok(())
}

/// Run summary: model identity, counts, timing and the label aggregate,
/// with the answered records attached.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    #[serde(rename = "id_modelu")]
    pub model_id: String,
    #[serde(rename = "liczba_pytań")]
    pub question_count: usize,
    #[serde(rename = "czas_s")]
    pub elapsed_seconds: f64,
    #[serde(rename = "utworzono")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "podsumowanie")]
    pub aggregate: RunAggregate,
    #[serde(rename = "odpowiedzi")]
    pub results: Vec<QuestionResult>,
}

impl RunSummary {
    pub fn from_report(model_id: impl Into<String>, report: &RunReport) -> Self {
        Self {
            model_id: model_id.into(),
            question_count: report.results.len(),
            elapsed_seconds: report.elapsed.as_secs_f64(),
            created_at: Utc::now(),
            aggregate: report.aggregate.clone(),
            results: report.results.clone(),
        }
    }
}

/// Writes the run summary as pretty-printed JSON.
pub fn save_summary(summary: &RunSummary, output_path: impl AsRef<Path>) -> Result<(), BenchError> {
    let path = output_path.as_ref();
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    log::info!("summary saved to {}", path.display());
    Ok(())
}
