// src/policy.rs
// Throw-or-log decision for service failures, applied by every public operation

use crate::config::EmnoConfig;
use crate::error::{EmnoError, Result};
use crate::transport::{CallResult, Success};
use tracing::error;

/// What to do when a call fails after retries, or succeeds without a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub should_throw: bool,
    pub log_errors: bool,
}

impl ErrorPolicy {
    pub fn from_config(config: &EmnoConfig) -> Self {
        Self {
            should_throw: config.should_throw,
            log_errors: config.log_errors,
        }
    }

    /// Unwrap a transport outcome.
    ///
    /// Returns the decoded body on success. On failure either raises
    /// (`should_throw`) or logs and returns `Ok(None)`.
    pub fn resolve<T>(&self, operation: &str, outcome: CallResult<T>) -> Result<Option<T>> {
        let failure = match outcome {
            Ok(Success {
                data: Some(data), ..
            }) => return Ok(Some(data)),
            Ok(Success { status, data: None }) => EmnoError::MissingResponse { status },
            Err(envelope) => EmnoError::Api(envelope),
        };

        if self.should_throw {
            return Err(failure);
        }
        if self.log_errors {
            match failure.envelope() {
                Some(envelope) => error!(
                    operation,
                    status = envelope.status,
                    can_retry = envelope.can_retry,
                    extra = ?envelope.extra,
                    "{}",
                    envelope
                ),
                None => error!(operation, "{}", failure),
            }
        }
        Ok(None)
    }

    /// [`resolve`](Self::resolve), then convert the body
    pub fn resolve_map<T, U, F>(&self, operation: &str, outcome: CallResult<T>, f: F) -> Result<Option<U>>
    where
        F: FnOnce(T) -> U,
    {
        Ok(self.resolve(operation, outcome)?.map(f))
    }
}
