//! Classification of model answers against ground truth and aggregation
//! of the outcome labels across a run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer::{GENERATION_ERROR_ANSWER, PARSING_ERROR_ANSWER};
use crate::error::BenchError;
use crate::question::OptionLetter;

/// Outcome class assigned to a single question's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalLabel {
    /// Well-formed answer matching the expected option.
    Correct,
    /// Well-formed answer, but not the expected option.
    Incorrect,
    /// One of the two failure sentinels stood in for the answer.
    NoAnswer,
    /// The answer is neither a letter A-D nor a known sentinel.
    Malformed,
}

impl EvalLabel {
    pub const ALL: [EvalLabel; 4] = [
        EvalLabel::Correct,
        EvalLabel::Incorrect,
        EvalLabel::NoAnswer,
        EvalLabel::Malformed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvalLabel::Correct => "correct",
            EvalLabel::Incorrect => "incorrect",
            EvalLabel::NoAnswer => "no-answer",
            EvalLabel::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for EvalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvalLabel {
    type Err = BenchError;

    /// Exact-match parse of the four fixed label strings. Anything else is
    /// treated as upstream corruption.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(EvalLabel::Correct),
            "incorrect" => Ok(EvalLabel::Incorrect),
            "no-answer" => Ok(EvalLabel::NoAnswer),
            "malformed" => Ok(EvalLabel::Malformed),
            other => Err(BenchError::UnexpectedLabel(other.to_string())),
        }
    }
}

/// Classifies a model answer against the expected one.
///
/// Both sides are whitespace-trimmed and compared case-insensitively. The
/// sentinel check runs first so a failure is never misread as a letter.
pub fn classify(model_answer: &str, correct_answer: &str) -> EvalLabel {
    let model = model_answer.trim();
    let correct = correct_answer.trim();

    if model.eq_ignore_ascii_case(GENERATION_ERROR_ANSWER)
        || model.eq_ignore_ascii_case(PARSING_ERROR_ANSWER)
    {
        EvalLabel::NoAnswer
    } else if model.eq_ignore_ascii_case(correct) {
        EvalLabel::Correct
    } else if OptionLetter::from_str(model).is_ok() {
        EvalLabel::Incorrect
    } else {
        EvalLabel::Malformed
    }
}

/// Count of questions per outcome label for one run. All four labels are
/// always present, zero-initialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAggregate {
    pub correct: u64,
    pub incorrect: u64,
    #[serde(rename = "no-answer")]
    pub no_answer: u64,
    pub malformed: u64,
}

impl RunAggregate {
    pub fn increment(&mut self, label: EvalLabel) {
        match label {
            EvalLabel::Correct => self.correct += 1,
            EvalLabel::Incorrect => self.incorrect += 1,
            EvalLabel::NoAnswer => self.no_answer += 1,
            EvalLabel::Malformed => self.malformed += 1,
        }
    }

    pub fn count(&self, label: EvalLabel) -> u64 {
        match label {
            EvalLabel::Correct => self.correct,
            EvalLabel::Incorrect => self.incorrect,
            EvalLabel::NoAnswer => self.no_answer,
            EvalLabel::Malformed => self.malformed,
        }
    }

    pub fn total(&self) -> u64 {
        EvalLabel::ALL
            .iter()
            .map(|label| self.count(*label))
            .sum()
    }
}

/// Tallies textual labels into a [`RunAggregate`].
///
/// Fails on any label outside the fixed four-value set rather than
/// miscounting silently.
pub fn tally<I>(labels: I) -> Result<RunAggregate, BenchError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut aggregate = RunAggregate::default();
    for label in labels {
        aggregate.increment(EvalLabel::from_str(label.as_ref())?);
    }
    Ok(aggregate)
}
