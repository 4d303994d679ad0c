use thiserror::Error;

/// Core error types for fhirsub operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot extract reference from response: {0}")]
    ResponseExtraction(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Time formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),
}

impl CoreError {
    /// Create a new ResponseExtraction error
    pub fn response_extraction(message: impl Into<String>) -> Self {
        Self::ResponseExtraction(message.into())
    }

    /// Create a new InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
