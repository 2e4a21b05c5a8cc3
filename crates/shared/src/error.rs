use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

/// Error body returned by an answer backend on a non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure of the answer-producing step. Atomic: there are no partial answers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("answer service returned {status}: {message}")]
    Service {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    #[error("answer request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed answer payload: {0}")]
    InvalidResponse(String),
    #[error("answer provider unavailable: {0}")]
    Unavailable(String),
}

impl RetrievalError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Could not reach the answer service; check your connection and try again."
                    .to_string()
            }
            Self::Service {
                code: Some(ErrorCode::RateLimited),
                ..
            } => "Too many requests right now; wait a moment and try again.".to_string(),
            Self::Service {
                code: Some(ErrorCode::Validation),
                message,
                ..
            } => format!("The question was rejected: {message}"),
            Self::Service { message, .. } => format!("The answer service failed: {message}"),
            Self::Timeout(after) => format!(
                "No answer after {} seconds; please try again.",
                after.as_secs().max(1)
            ),
            Self::InvalidResponse(_) => {
                "The answer service sent a response that could not be read.".to_string()
            }
            Self::Unavailable(reason) => format!("Answering is unavailable: {reason}"),
        }
    }
}
