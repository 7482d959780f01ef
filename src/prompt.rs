//! Prompt construction for multiple-choice questions.
//!
//! The instruction text pins the model to a two-line output contract
//! (`Answer: [<letter>]` and `Explanation: <text>`) which the output
//! parser relies on.

use crate::error::BenchError;
use crate::question::{OptionLetter, QuestionRecord};

const PROMPT_HEADER: &str = "\
Wybierz poprawną odpowiedź spośród A, B, C i D. Uzasadnij krótko swój wybór.

Podaj wynik WYŁĄCZNIE w tym formacie:
Answer: [A/B/C/D]
Explanation: [krótka przyczyna]

Przykład:
Answer: [C]
Explanation: Krótko dlaczego C.
";

/// Renders the fixed question template for a record.
///
/// Deterministic and side-effect-free: the same record always produces the
/// same string. Fails when the question text or any of the four options is
/// blank.
pub fn build_prompt(record: &QuestionRecord) -> Result<String, BenchError> {
    if record.question.trim().is_empty() {
        return Err(BenchError::MissingField("Pytanie".to_string()));
    }
    for letter in OptionLetter::ALL {
        if record.option(letter).trim().is_empty() {
            return Err(BenchError::MissingField(letter.as_str().to_string()));
        }
    }

    Ok(format!(
        "{PROMPT_HEADER}\nPytanie: {}\nA: {}\nB: {}\nC: {}\nD: {}\n",
        record.question, record.option_a, record.option_b, record.option_c, record.option_d,
    ))
}
