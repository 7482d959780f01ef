//! CSV question-set loading with required-column validation.

use std::path::Path;

use crate::error::BenchError;
use crate::question::{QuestionMetadata, QuestionRecord};

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Pytanie", "A", "B", "C", "D", "Pozycja"];

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

/// Loads a UTF-8 CSV question set.
///
/// Validates that all required columns are present (the error names the
/// missing ones) and skips rows where any required field is empty. The
/// optional `Domena`, `Kategoria` and `Tagi` columns are carried into the
/// record metadata when present. Records are returned in file order.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>, BenchError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BenchError::DatasetError(format!(
            "The file {} does not exist.",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match column_index(&headers, name) {
            Some(index) => *slot = index,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(BenchError::DatasetError(format!(
            "The dataset is missing the following required columns: {}",
            missing.join(", ")
        )));
    }
    let [question_idx, a_idx, b_idx, c_idx, d_idx, correct_idx] = indices;

    let domain_idx = column_index(&headers, "Domena");
    let category_idx = column_index(&headers, "Kategoria");
    let tags_idx = column_index(&headers, "Tagi");

    let mut records = Vec::new();
    for (row_number, row) in reader.records().enumerate() {
        let row = row?;
        let field = |index: usize| row.get(index).unwrap_or("").to_string();
        let optional_field = |index: Option<usize>| {
            index.and_then(|i| row.get(i)).unwrap_or("").to_string()
        };

        let record = QuestionRecord {
            question: field(question_idx),
            option_a: field(a_idx),
            option_b: field(b_idx),
            option_c: field(c_idx),
            option_d: field(d_idx),
            correct_answer: field(correct_idx),
            metadata: QuestionMetadata {
                domain: optional_field(domain_idx),
                category: optional_field(category_idx),
                tags: optional_field(tags_idx),
            },
        };

        let incomplete = [
            &record.question,
            &record.option_a,
            &record.option_b,
            &record.option_c,
            &record.option_d,
            &record.correct_answer,
        ]
        .iter()
        .any(|value| value.trim().is_empty());
        if incomplete {
            log::debug!("skipping row {} with empty required fields", row_number + 1);
            continue;
        }

        records.push(record);
    }

    Ok(records)
}
