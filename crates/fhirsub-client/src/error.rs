use fhirsub_core::CoreError;
use thiserror::Error;

/// Error types for transport and submission operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {kind} submission")]
    UnexpectedStatus { kind: String, status: u16 },

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Create a new UnexpectedStatus error
    pub fn unexpected_status(kind: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            kind: kind.into(),
            status,
        }
    }
}

/// Convenience result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = ClientError::unexpected_status("Specimen", 422);
        assert_eq!(
            err.to_string(),
            "Unexpected status 422 from Specimen submission"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: ClientError = CoreError::response_extraction("no id").into();
        assert_eq!(err.to_string(), "Cannot extract reference from response: no id");
    }
}
