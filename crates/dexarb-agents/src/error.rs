use thiserror::Error;

/// Failure of a single generator call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Generator transport error: {0}")]
    Transport(String),

    #[error("Generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Claude CLI error: {0}")]
    Cli(String),

    #[error("Generator returned an empty completion")]
    EmptyResponse,

    #[error("Generator timed out after {0} seconds")]
    Timeout(u64),

    #[error("Generator unavailable: {0}")]
    Unavailable(String),
}

/// A parsed reply that does not satisfy the advisory contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected a flat JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be a string, found {found}")]
    NotAString {
        field: &'static str,
        found: &'static str,
    },
}

/// Why one attempt of the advisory pipeline did not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Reply is not valid JSON after sanitizing: {0}")]
    Parse(String),

    #[error("Reply failed validation: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for ExtractionError {
    fn from(e: serde_json::Error) -> Self {
        ExtractionError::Parse(e.to_string())
    }
}
