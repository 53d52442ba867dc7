//! Shared error types for the services crate.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use quiz_core::model::{OptionId, QuestionId, QuizRequestError};

use crate::sessions::{Failure, SessionPhase};

/// Errors emitted by the HTTP boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Human-readable message supplied by the backend, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::Http(err) => err.is_timeout() || err.is_connect(),
            ApiError::Decode(_) | ApiError::Url(_) => false,
        }
    }
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] QuizRequestError),
    #[error("please answer all questions before submitting ({} unanswered)", unanswered.len())]
    Incomplete { unanswered: Vec<QuestionId> },
    #[error("a quiz is already running in this session")]
    Busy,
    #[error("operation not allowed while the session is {0}")]
    InvalidState(SessionPhase),
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("{}", .0.message)]
    Request(Failure),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("login response did not include a token")]
    MissingToken,
}

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api base url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("api base url must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("invalid request timeout {0:?}, expected a positive number of seconds")]
    InvalidTimeout(String),
}
