//! Extraction of a structured answer from unstructured model output.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::answer::InferenceResult;
use crate::question::OptionLetter;

static ANSWER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)answer\s*:\s*\[?\s*([A-D])\s*\]?").expect("answer marker pattern")
});

static BARE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([A-D])\b").expect("bare letter pattern"));

static EXPLANATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)explanation\s*:\s*(.+)").expect("explanation pattern"));

/// Parses raw model output into an answer letter and an explanation.
///
/// The answer is taken from an explicit `Answer: X` marker (brackets
/// optional) or, failing that, from any standalone letter A-D anywhere in
/// the text. The explanation is everything after an `Explanation:` marker,
/// captured greedily across line breaks. Both parts are required; when
/// either is missing the parsing-failure sentinel pair is returned. The
/// letter is uppercased and the explanation trimmed.
pub fn parse_output(raw_output: &str) -> InferenceResult {
    let letter = ANSWER_MARKER
        .captures(raw_output)
        .or_else(|| BARE_LETTER.captures(raw_output))
        .and_then(|captures| captures.get(1));
    let explanation = EXPLANATION_MARKER
        .captures(raw_output)
        .and_then(|captures| captures.get(1));

    match (letter, explanation) {
        (Some(letter), Some(explanation)) => match OptionLetter::from_str(letter.as_str()) {
            Ok(letter) => InferenceResult::answered(letter, explanation.as_str().trim()),
            Err(_) => InferenceResult::parsing_error(),
        },
        _ => InferenceResult::parsing_error(),
    }
}
