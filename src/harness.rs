//! The sequential run loop: one prompt, one backend call, one scored
//! record per question.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::dispatch::Dispatcher;
use crate::error::BenchError;
use crate::prompt::build_prompt;
use crate::provider::AnswerProvider;
use crate::question::{QuestionMetadata, QuestionRecord};
use crate::scorer::{classify, RunAggregate};

/// Per-question output record, emitted in processing order.
///
/// Serialized field names follow the established results format so
/// downstream tooling keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(rename = "numer")]
    pub question_index: usize,
    #[serde(rename = "pytanie")]
    pub question_text: String,
    #[serde(rename = "poprawna")]
    pub correct_answer: String,
    #[serde(rename = "odpowiedź")]
    pub model_answer: String,
    #[serde(rename = "uzasadnienie")]
    pub model_explanation: String,
    #[serde(rename = "meta")]
    pub metadata: QuestionMetadata,
}

/// Everything a finished run produces.
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<QuestionResult>,
    pub aggregate: RunAggregate,
    pub elapsed: Duration,
}

/// Runs the benchmark over a question set with the adapter selected for
/// the configuration.
///
/// The adapter is constructed once and reused for every question.
pub async fn run_benchmark(
    questions: &[QuestionRecord],
    config: &ModelConfig,
    dispatcher: &Dispatcher,
    question_delay: Option<Duration>,
) -> Result<RunReport, BenchError> {
    let provider = dispatcher.provider_for(config)?;
    run_benchmark_with_provider(questions, provider.as_ref(), question_delay).await
}

/// Core run loop over an already-constructed adapter.
///
/// Questions are processed strictly one at a time; the only suspension
/// points are the backend call itself and the optional fixed delay
/// between questions. A recovered generation or parsing failure is
/// recorded as its sentinel and the run moves on; only caller errors
/// (such as a record with a blank option) abort the run.
pub async fn run_benchmark_with_provider(
    questions: &[QuestionRecord],
    provider: &dyn AnswerProvider,
    question_delay: Option<Duration>,
) -> Result<RunReport, BenchError> {
    let started = Instant::now();
    let mut results = Vec::with_capacity(questions.len());
    let mut aggregate = RunAggregate::default();

    for (question_index, record) in questions.iter().enumerate() {
        log::info!("answering question {}", question_index + 1);
        let prompt = build_prompt(record)?;
        let outcome = provider.ask(&prompt).await;
        aggregate.increment(classify(outcome.answer.as_str(), &record.correct_answer));

        results.push(QuestionResult {
            question_index,
            question_text: record.question.clone(),
            correct_answer: record.correct_answer.clone(),
            model_answer: outcome.answer.as_str().to_string(),
            model_explanation: outcome.explanation,
            metadata: record.metadata.clone(),
        });

        if let Some(delay) = question_delay {
            if question_index + 1 < questions.len() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    let elapsed = started.elapsed();
    log::info!(
        "finished {} questions in {:.2} seconds",
        results.len(),
        elapsed.as_secs_f64()
    );
    Ok(RunReport {
        results,
        aggregate,
        elapsed,
    })
}

/// Re-scores persisted per-question records into a fresh aggregate.
pub fn score_results(results: &[QuestionResult]) -> RunAggregate {
    let mut aggregate = RunAggregate::default();
    for result in results {
        aggregate.increment(classify(&result.model_answer, &result.correct_answer));
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn question(text: &str, correct: &str) -> QuestionRecord {
        QuestionRecord {
            question: text.to_string(),
            option_a: "opcja A".to_string(),
            option_b: "opcja B".to_string(),
            option_c: "opcja C".to_string(),
            option_d: "opcja D".to_string(),
            correct_answer: correct.to_string(),
            metadata: QuestionMetadata::default(),
        }
    }

    /// Replays a fixed sequence of raw outputs, one per question.
    struct ReplayProvider {
        outputs: Vec<Result<String, ()>>,
        cursor: AtomicUsize,
    }

    impl ReplayProvider {
        fn new(outputs: Vec<Result<String, ()>>) -> Self {
            Self {
                outputs,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerProvider for ReplayProvider {
        fn name(&self) -> &str {
            "replay"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, BenchError> {
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            match &self.outputs[index] {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(BenchError::HttpError("boom".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn records_are_emitted_in_processing_order() {
        let questions = vec![question("pierwsze", "A"), question("drugie", "B")];
        let provider = ReplayProvider::new(vec![
            Ok("Answer: A\nExplanation: one".to_string()),
            Ok("Answer: C\nExplanation: two".to_string()),
        ]);

        let report = run_benchmark_with_provider(&questions, &provider, None)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].question_index, 0);
        assert_eq!(report.results[0].question_text, "pierwsze");
        assert_eq!(report.results[0].model_answer, "A");
        assert_eq!(report.results[1].question_index, 1);
        assert_eq!(report.results[1].model_answer, "C");
        assert_eq!(report.aggregate.correct, 1);
        assert_eq!(report.aggregate.incorrect, 1);
    }

    #[tokio::test]
    async fn a_failing_question_does_not_abort_the_run() {
        let questions = vec![
            question("pierwsze", "A"),
            question("drugie", "B"),
            question("trzecie", "C"),
        ];
        let provider = ReplayProvider::new(vec![
            Err(()),
            Ok("gibberish without the contract".to_string()),
            Ok("Answer: C\nExplanation: fine".to_string()),
        ]);

        let report = run_benchmark_with_provider(&questions, &provider, None)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].model_answer, "Generation error");
        assert_eq!(report.results[0].model_explanation, "Exception during generation.");
        assert_eq!(report.results[1].model_answer, "Parsing error");
        assert_eq!(report.results[2].model_answer, "C");
        assert_eq!(report.aggregate.no_answer, 2);
        assert_eq!(report.aggregate.correct, 1);
        assert_eq!(report.aggregate.total(), 3);
    }

    #[tokio::test]
    async fn a_record_with_a_blank_option_aborts_the_run() {
        let mut bad = question("pierwsze", "A");
        bad.option_b = String::new();
        let provider = ReplayProvider::new(vec![]);

        let err = run_benchmark_with_provider(&[bad], &provider, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::MissingField(_)));
    }

    #[test]
    fn score_results_rebuilds_the_aggregate_from_records() {
        let results = vec![
            QuestionResult {
                question_index: 0,
                question_text: "q".to_string(),
                correct_answer: "A".to_string(),
                model_answer: "A".to_string(),
                model_explanation: "e".to_string(),
                metadata: QuestionMetadata::default(),
            },
            QuestionResult {
                question_index: 1,
                question_text: "q".to_string(),
                correct_answer: "B".to_string(),
                model_answer: "Parsing error".to_string(),
                model_explanation: "Exception during parsing.".to_string(),
                metadata: QuestionMetadata::default(),
            },
        ];
        let aggregate = score_results(&results);
        assert_eq!(aggregate.correct, 1);
        assert_eq!(aggregate.no_answer, 1);
    }
}
