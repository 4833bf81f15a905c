// src/transport/classify.rs
// Failure classification for non-success HTTP responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Statuses worth another attempt. Anything not listed here fails immediately.
const RETRYABLE_STATUSES: &[(u16, &str)] = &[
    (408, "Request Timeout"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
];

const UNKNOWN_MEANING: &str = "Unknown Error";
const UNAUTHORIZED_MESSAGE: &str = "Invalid user or token";

/// What a status code means and whether the request may be repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub meaning: &'static str,
    pub retryable: bool,
}

pub fn classify(status: u16) -> Classification {
    RETRYABLE_STATUSES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|&(_, meaning)| Classification {
            meaning,
            retryable: true,
        })
        .unwrap_or(Classification {
            meaning: UNKNOWN_MEANING,
            retryable: false,
        })
}

/// Where a failed call broke down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "status")]
pub enum FailureKind {
    /// The service answered with a non-success status
    Status(u16),
    /// The request never produced a response (DNS, connect, timeout, reset)
    Network,
    /// A success response whose body could not be decoded
    Decode,
    /// The request body could not be serialized; nothing was sent
    Encode,
}

/// Error body as sent by the service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    detail: Option<Value>,
}

/// Uniform failure report returned by the transport.
///
/// Serializes to the service's error shape extended with `canRetry` and the
/// `extra` diagnostic trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// HTTP status, or 0 when no response was received
    pub status: u16,
    pub kind: FailureKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    pub can_retry: bool,
    pub extra: Vec<String>,
}

impl ErrorEnvelope {
    /// Build an envelope from a non-success response body.
    ///
    /// A JSON `{message, detail}` body is used as-is. Anything else falls back
    /// to the raw text, prefixed with the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let classification = classify(status);

        let (message, detail) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => (parsed.message, parsed.detail),
            Err(_) => {
                let text = if status == 401 {
                    UNAUTHORIZED_MESSAGE
                } else if body.trim().is_empty() {
                    classification.meaning
                } else {
                    body.trim()
                };
                (format!("{}: {}", status, text), None)
            }
        };

        Self {
            status,
            kind: FailureKind::Status(status),
            message,
            detail,
            can_retry: classification.retryable,
            extra: Vec::new(),
        }
    }

    pub fn network(error: &reqwest::Error) -> Self {
        Self {
            status: 0,
            kind: FailureKind::Network,
            message: format!("Request failed: {}", error),
            detail: None,
            can_retry: false,
            extra: Vec::new(),
        }
    }

    pub fn decode(status: u16, error: &serde_json::Error) -> Self {
        Self {
            status,
            kind: FailureKind::Decode,
            message: format!("Failed to decode response: {}", error),
            detail: None,
            can_retry: false,
            extra: Vec::new(),
        }
    }

    pub fn encode(error: &serde_json::Error) -> Self {
        Self {
            status: 0,
            kind: FailureKind::Encode,
            message: format!("Failed to encode request: {}", error),
            detail: None,
            can_retry: false,
            extra: Vec::new(),
        }
    }

    pub(crate) fn note_attempt(&mut self, attempt: u32) {
        self.extra.push(format!("attempt:{}", attempt));
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = format!("{}:", self.status);
        if self.message.starts_with(&prefix) {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} {}", prefix, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retryable_table() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(classify(status).retryable, "{} should be retryable", status);
        }
        assert_eq!(classify(429).meaning, "Too Many Requests");
        assert_eq!(classify(503).meaning, "Service Unavailable");
    }

    #[test]
    fn test_non_retryable_statuses() {
        for status in [400, 401, 403, 404, 409, 422, 501, 505] {
            let c = classify(status);
            assert!(!c.retryable, "{} should not be retryable", status);
            assert_eq!(c.meaning, "Unknown Error");
        }
    }

    #[test]
    fn test_structured_error_body() {
        let env = ErrorEnvelope::from_response(
            404,
            r#"{"message":"Collection not found","detail":{"id":"abc"}}"#,
        );
        assert_eq!(env.message, "Collection not found");
        assert_eq!(env.detail, Some(serde_json::json!({"id": "abc"})));
        assert!(!env.can_retry);
        assert_eq!(env.kind, FailureKind::Status(404));
    }

    #[test]
    fn test_raw_text_fallback() {
        let env = ErrorEnvelope::from_response(502, "upstream connect error");
        assert_eq!(env.message, "502: upstream connect error");
        assert!(env.can_retry);
        assert!(env.detail.is_none());
    }

    #[test]
    fn test_empty_body_uses_meaning() {
        let env = ErrorEnvelope::from_response(503, "");
        assert_eq!(env.message, "503: Service Unavailable");
    }

    #[test]
    fn test_unauthorized_special_case() {
        let env = ErrorEnvelope::from_response(401, "Unauthorized");
        assert_eq!(env.message, "401: Invalid user or token");
        assert!(!env.can_retry);
    }

    #[test]
    fn test_unauthorized_with_json_body_keeps_message() {
        let env = ErrorEnvelope::from_response(401, r#"{"message":"token expired"}"#);
        assert_eq!(env.message, "token expired");
    }

    #[test]
    fn test_display_does_not_repeat_status() {
        let raw = ErrorEnvelope::from_response(502, "bad upstream");
        assert_eq!(raw.to_string(), "502: bad upstream");
        let structured = ErrorEnvelope::from_response(404, r#"{"message":"not found"}"#);
        assert_eq!(structured.to_string(), "404: not found");
    }

    #[test]
    fn test_attempt_trail() {
        let mut env = ErrorEnvelope::from_response(500, "oops");
        env.note_attempt(0);
        env.note_attempt(1);
        assert_eq!(env.extra, vec!["attempt:0", "attempt:1"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut env = ErrorEnvelope::from_response(429, r#"{"message":"slow down"}"#);
        env.note_attempt(3);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["message"], "slow down");
        assert_eq!(json["canRetry"], true);
        assert_eq!(json["extra"][0], "attempt:3");
        assert!(json.get("detail").is_none());
        assert_eq!(json["kind"], json!({"type": "status", "status": 429}));
    }

    #[test]
    fn test_unit_kinds_serialize_without_status() {
        let env = ErrorEnvelope::encode(&serde_json::from_str::<u8>("x").unwrap_err());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["kind"], json!({"type": "encode"}));
        assert_eq!(json["status"], 0);
    }
}
