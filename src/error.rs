use thiserror::Error;

/// Error types that can occur while running a benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or configuration, including unknown
    /// backend tags
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by an inference provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// Upstream response did not have the expected shape
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// A question record is missing a required field
    #[error("Missing field: {0}")]
    MissingField(String),
    /// Dataset file could not be read or fails column validation
    #[error("Dataset error: {0}")]
    DatasetError(String),
    /// An evaluation label outside the fixed four-value set reached the
    /// tally step
    #[error("Unexpected label: {0}")]
    UnexpectedLabel(String),
    /// Filesystem errors while persisting results
    #[error("I/O error: {0}")]
    IoError(String),
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Converts reqwest HTTP errors into BenchErrors
impl From<reqwest::Error> for BenchError {
    fn from(err: reqwest::Error) -> Self {
        BenchError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::IoError(err.to_string())
    }
}

impl From<csv::Error> for BenchError {
    fn from(err: csv::Error) -> Self {
        BenchError::DatasetError(err.to_string())
    }
}
