//! The (answer, explanation) pair exchanged between adapters, parser and
//! scorer.
//!
//! Failures recovered inside the adapter or parser layer are represented
//! as tagged variants rather than thrown; their string forms are the two
//! fixed sentinel answers the scorer recognizes.

use crate::question::OptionLetter;

/// Sentinel answer recorded when text generation failed.
pub const GENERATION_ERROR_ANSWER: &str = "Generation error";
/// Sentinel answer recorded when the raw output could not be parsed.
pub const PARSING_ERROR_ANSWER: &str = "Parsing error";
/// Fixed explanation accompanying [`GENERATION_ERROR_ANSWER`].
pub const GENERATION_ERROR_EXPLANATION: &str = "Exception during generation.";
/// Fixed explanation accompanying [`PARSING_ERROR_ANSWER`].
pub const PARSING_ERROR_EXPLANATION: &str = "Exception during parsing.";

/// A model's answer to a single question: either one of the four option
/// letters or a recovered failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelAnswer {
    Letter(OptionLetter),
    GenerationError,
    ParsingError,
}

impl ModelAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelAnswer::Letter(letter) => letter.as_str(),
            ModelAnswer::GenerationError => GENERATION_ERROR_ANSWER,
            ModelAnswer::ParsingError => PARSING_ERROR_ANSWER,
        }
    }

    /// Whether this answer is one of the two failure sentinels.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ModelAnswer::Letter(_))
    }
}

impl std::fmt::Display for ModelAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sole contract between the adapter/parser layer and the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceResult {
    pub answer: ModelAnswer,
    pub explanation: String,
}

impl InferenceResult {
    /// A successfully parsed answer with its explanation.
    pub fn answered(letter: OptionLetter, explanation: impl Into<String>) -> Self {
        Self {
            answer: ModelAnswer::Letter(letter),
            explanation: explanation.into(),
        }
    }

    /// The generation-failure sentinel pair.
    pub fn generation_error() -> Self {
        Self {
            answer: ModelAnswer::GenerationError,
            explanation: GENERATION_ERROR_EXPLANATION.to_string(),
        }
    }

    /// The parsing-failure sentinel pair.
    pub fn parsing_error() -> Self {
        Self {
            answer: ModelAnswer::ParsingError,
            explanation: PARSING_ERROR_EXPLANATION.to_string(),
        }
    }
}
