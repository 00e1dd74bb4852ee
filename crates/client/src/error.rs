//! Unified error handling for the API client.

use atelier_core::{TransitionError, ValidationError};
use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionError;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No credential, or the backend rejected it.
    Unauthenticated,
    /// Malformed input, refused locally or by the backend.
    Validation,
    /// Unknown id or key.
    NotFound,
    /// Network failure or timeout.
    Transport,
    /// Unexpected backend failure or unreadable response.
    ServerError,
    /// The local credential slot could not be read or written.
    Storage,
}

/// Every failure the API client can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend refused the credential (or its absence).
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The backend refused the request body or parameters.
    #[error("Validation failed: {0}")]
    Rejected(String),

    /// The request was refused before it was sent.
    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationError),

    /// The workflow does not offer this transition.
    #[error("Validation failed: {0}")]
    Transition(#[from] TransitionError),

    /// Unknown id or key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("Server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// The backend answered 2xx with a body that does not match its contract.
    #[error("Server error: invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The credential slot failed.
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    /// The configured base URL cannot have paths appended to it.
    #[error("Invalid API base URL: {0}")]
    BaseUrl(url::Url),
}

impl ApiError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Rejected(_) | Self::Invalid(_) | Self::Transition(_) | Self::BaseUrl(_) => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Server { .. } | Self::Decode(_) => ErrorKind::ServerError,
            Self::Session(_) => ErrorKind::Storage,
        }
    }

    /// Whether the credential should be dropped in response to this error.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthenticated)
    }

    /// Map a non-2xx response to an error.
    ///
    /// `message` is the backend's `detail` text when it sent one.
    #[must_use]
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthenticated(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Rejected(message)
            }
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server { status, message },
        }
    }

    /// Short text suitable for showing to an end user.
    ///
    /// Details of server and transport failures are kept out of it.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unauthenticated => "Your session has expired. Please sign in again.".to_owned(),
            ErrorKind::Validation | ErrorKind::NotFound => self.to_string(),
            ErrorKind::Transport | ErrorKind::ServerError | ErrorKind::Storage => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}
