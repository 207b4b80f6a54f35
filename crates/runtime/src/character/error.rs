//! Failures talking to the character service.

use serde_json::Value;
use thiserror::Error;

/// Error returned by a [`super::CharacterStatsClient`] call.
///
/// Calls are never retried; the caller decides what a failure means.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstreamError {
    #[error("character service responded with status {status}")]
    Status { status: u16, body: Value },

    #[error("character service request timed out")]
    Timeout,

    #[error("character service unreachable: {0}")]
    Transport(String),

    #[error("invalid character service response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Builds a status error, keeping the body as JSON when it parses.
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
        UpstreamError::Status { status, body }
    }

    /// Downstream HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            UpstreamError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            UpstreamError::Timeout
        } else if error.is_decode() {
            UpstreamError::InvalidResponse(error.to_string())
        } else {
            UpstreamError::Transport(error.to_string())
        }
    }
}
