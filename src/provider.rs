//! The capability shared by all backend adapters.

use async_trait::async_trait;

use crate::answer::InferenceResult;
use crate::error::BenchError;
use crate::parser::parse_output;

/// A backend that can answer a prompt with raw text.
///
/// Implementations only obtain text from their backend; converting that
/// text (or a failure) into an [`InferenceResult`] is handled uniformly by
/// [`AnswerProvider::ask`].
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Short backend name used in log output.
    fn name(&self) -> &str;

    /// Obtains raw generated text for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, BenchError>;

    /// Answers a prompt, recovering every generation-layer failure.
    ///
    /// Transport and library errors never escape this call: they are
    /// logged and surfaced as the generation-failure sentinel, so a bad
    /// question cannot abort a run. Successful raw text is handed to the
    /// output parser, which applies the same recovery for malformed text.
    async fn ask(&self, prompt: &str) -> InferenceResult {
        match self.generate(prompt).await {
            Ok(raw_output) => parse_output(raw_output.trim()),
            Err(err) => {
                log::warn!("{} generation failed: {err}", self.name());
                InferenceResult::generation_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::ModelAnswer;
    use crate::question::OptionLetter;

    struct CannedProvider {
        reply: Result<String, BenchError>,
    }

    #[async_trait]
    impl AnswerProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, BenchError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(BenchError::Generic(err.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn ask_parses_successful_generation() {
        let provider = CannedProvider {
            reply: Ok("Answer: [B]\nExplanation: fits".to_string()),
        };
        let result = provider.ask("prompt").await;
        assert_eq!(result.answer, ModelAnswer::Letter(OptionLetter::B));
        assert_eq!(result.explanation, "fits");
    }

    #[tokio::test]
    async fn ask_converts_generation_failure_into_the_sentinel() {
        let provider = CannedProvider {
            reply: Err(BenchError::HttpError("connection refused".to_string())),
        };
        let result = provider.ask("prompt").await;
        assert_eq!(result, InferenceResult::generation_error());
    }

    #[tokio::test]
    async fn ask_converts_unparseable_output_into_the_parsing_sentinel() {
        let provider = CannedProvider {
            reply: Ok("no contract here".to_string()),
        };
        let result = provider.ask("prompt").await;
        assert_eq!(result, InferenceResult::parsing_error());
    }
}
