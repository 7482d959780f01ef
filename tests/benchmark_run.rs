//! End-to-end run: dataset file -> prompts -> mocked backend -> parsed
//! answers -> scored aggregate -> persisted results.

use std::fs;
use std::io::Write;

use mcqbench::{
    load_dataset, run_benchmark, save_raw_results, tally, BackendKind, Dispatcher, ModelConfig,
    QuestionResult,
};

const DATASET: &str = "\
Pytanie,A,B,C,D,Pozycja,Domena,Kategoria,Tagi
Która planeta jest największa?,Mars,Jowisz,Wenus,Merkury,B,astronomia,planety,kosmos
Ile nóg ma pająk?,6,10,8,12,C,biologia,zwierzęta,
Stolica Polski to?,Kraków,Gdańsk,Poznań,Warszawa,D,geografia,,
";

fn write_dataset(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("test.csv");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn full_run_scores_and_persists_every_question() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = write_dataset(&dir);

    let mut server = mockito::Server::new_async().await;
    // One reply per question, matched on the question text inside the
    // prompt: correct, incorrect, unparseable.
    let replies = [
        (
            "planeta",
            r#"{"choices":[{"message":{"content":"Answer: [B]\nExplanation: Jowisz jest gazowym olbrzymem."}}]}"#,
        ),
        (
            "Ile",
            r#"{"choices":[{"message":{"content":"Answer: A\nExplanation: zgaduję"}}]}"#,
        ),
        (
            "Stolica",
            r#"{"choices":[{"message":{"content":"nie wiem"}}]}"#,
        ),
    ];
    for (marker, reply) in replies {
        server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex(marker.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply)
            .expect(1)
            .create_async()
            .await;
    }

    let questions = load_dataset(&dataset_path).unwrap();
    assert_eq!(questions.len(), 3);

    let config = ModelConfig::new(BackendKind::OpenAiCompatible, "gpt-4")
        .api_key("test-key")
        .endpoint_url(server.url());
    let dispatcher = Dispatcher::new();

    let report = run_benchmark(&questions, &config, &dispatcher, None)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.aggregate.correct, 1);
    assert_eq!(report.aggregate.incorrect, 1);
    assert_eq!(report.aggregate.no_answer, 1);
    assert_eq!(report.aggregate.malformed, 0);
    assert_eq!(report.aggregate.total(), 3);

    // Records carry the dataset metadata through unchanged.
    assert_eq!(report.results[0].metadata.domain, "astronomia");
    assert_eq!(report.results[0].model_answer, "B");
    assert_eq!(
        report.results[0].model_explanation,
        "Jowisz jest gazowym olbrzymem."
    );
    assert_eq!(report.results[2].model_answer, "Parsing error");

    let results_path = dir.path().join("results").join("raw.json");
    save_raw_results(&report.results, &results_path).unwrap();
    let restored: Vec<QuestionResult> =
        serde_json::from_str(&fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(restored, report.results);

    // The persisted records re-tally to the same aggregate.
    let labels: Vec<String> = restored
        .iter()
        .map(|result| {
            mcqbench::classify(&result.model_answer, &result.correct_answer)
                .as_str()
                .to_string()
        })
        .collect();
    assert_eq!(tally(&labels).unwrap(), report.aggregate);
}

#[tokio::test]
async fn an_unreachable_backend_yields_a_full_no_answer_run() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = write_dataset(&dir);
    let questions = load_dataset(&dataset_path).unwrap();

    // Nothing listens on this port.
    let config = ModelConfig::new(BackendKind::OpenAiCompatible, "gpt-4")
        .api_key("test-key")
        .endpoint_url("http://127.0.0.1:9")
        .timeout_seconds(1);
    let dispatcher = Dispatcher::new();

    let report = run_benchmark(&questions, &config, &dispatcher, None)
        .await
        .unwrap();

    assert_eq!(report.aggregate.no_answer, 3);
    assert!(report
        .results
        .iter()
        .all(|result| result.model_answer == "Generation error"));
}
