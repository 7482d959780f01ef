//! Question records as produced by the dataset loader.
//!
//! A record carries the question text, the four answer options keyed A-D,
//! the expected option and a passthrough metadata bag. Records are
//! read-only once constructed.

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// One of the four answer options of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    /// All options in display order.
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        }
    }
}

impl std::fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptionLetter {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(OptionLetter::A),
            "B" => Ok(OptionLetter::B),
            "C" => Ok(OptionLetter::C),
            "D" => Ok(OptionLetter::D),
            _ => Err(BenchError::InvalidRequest(format!(
                "Not an option letter: {s}"
            ))),
        }
    }
}

/// Optional classification columns carried through to the result records
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    #[serde(rename = "domena", default)]
    pub domain: String,
    #[serde(rename = "kategoria", default)]
    pub category: String,
    #[serde(rename = "tagi", default)]
    pub tags: String,
}

/// A single multiple-choice question with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Question text (the dataset's `Pytanie` column).
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    /// Expected option (the dataset's `Pozycja` column). Kept as the raw
    /// dataset string; the scorer normalizes case and whitespace.
    pub correct_answer: String,
    pub metadata: QuestionMetadata,
}

impl QuestionRecord {
    /// Returns the option text for the given letter.
    pub fn option(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
            OptionLetter::C => &self.option_c,
            OptionLetter::D => &self.option_d,
        }
    }
}
