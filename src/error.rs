// src/error.rs
// Error types for the emno client

use crate::transport::ErrorEnvelope;
use thiserror::Error;

/// Main error type for the emno library
#[derive(Error, Debug)]
pub enum EmnoError {
    /// The service (or the network path to it) reported a failure.
    /// Only produced when the client is configured to throw.
    #[error("{0}")]
    Api(ErrorEnvelope),

    /// Instance operation on a handle that has no server-assigned id
    #[error("Uninitialized {0} object")]
    Uninitialized(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{status}: response body missing")]
    MissingResponse { status: u16 },

    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience type alias for Result using EmnoError
pub type Result<T> = std::result::Result<T, EmnoError>;

impl EmnoError {
    /// Usage errors are local programming mistakes. They are raised even when
    /// the client is configured to swallow service errors.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Uninitialized(_) | Self::InvalidInput(_))
    }

    /// The classified envelope, when this error came from the service
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Api(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// HTTP status reported by the service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(envelope) => Some(envelope.status),
            Self::MissingResponse { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<ErrorEnvelope> for EmnoError {
    fn from(envelope: ErrorEnvelope) -> Self {
        EmnoError::Api(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FailureKind;

    fn envelope(status: u16, message: &str) -> ErrorEnvelope {
        ErrorEnvelope {
            status,
            kind: FailureKind::Status(status),
            message: message.to_string(),
            detail: None,
            can_retry: false,
            extra: vec!["attempt:0".to_string()],
        }
    }

    #[test]
    fn test_api_error_display() {
        let err = EmnoError::Api(envelope(404, "Collection not found"));
        assert_eq!(err.to_string(), "404: Collection not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_uninitialized_error() {
        let err = EmnoError::Uninitialized("Collection");
        assert_eq!(err.to_string(), "Uninitialized Collection object");
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_invalid_input_is_usage_error() {
        let err = EmnoError::InvalidInput("empty content".to_string());
        assert!(err.is_usage_error());
        assert!(err.to_string().contains("empty content"));
    }

    #[test]
    fn test_api_error_is_not_usage_error() {
        let err: EmnoError = envelope(500, "boom").into();
        assert!(!err.is_usage_error());
        assert!(err.envelope().is_some());
    }

    #[test]
    fn test_missing_response() {
        let err = EmnoError::MissingResponse { status: 204 };
        assert!(err.to_string().contains("missing"));
        assert_eq!(err.status(), Some(204));
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(EmnoError::Config("bad".into()).status(), None);
        assert_eq!(EmnoError::Uninitialized("Vector").status(), None);
    }
}
