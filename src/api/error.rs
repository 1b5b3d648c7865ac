//! Classification of failed support API calls.
//!
//! The controller reacts differently to each failure channel: client errors
//! (4xx) are meaningful to the user and carry a server message, server
//! errors (5xx) and transport errors put the ticket in a generic failure
//! state.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Failure channel of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 4xx: the request was understood and refused
    Client,
    /// 5xx: the server failed to process the request
    Server,
    /// The server could not be reached or answered garbage
    Transport,
}

/// A failed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    /// HTTP status code, if a response was received
    pub status: Option<StatusCode>,
    /// Message supplied by the server (`{"error": "..."}`), if any
    pub message: Option<String>,
}

/// Error body rendered by the platform.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiFailure {
    /// Build a failure from an HTTP status and an optional server message.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let kind = if status.is_client_error() {
            FailureKind::Client
        } else if status.is_server_error() {
            FailureKind::Server
        } else {
            FailureKind::Transport
        };
        Self {
            kind,
            status: Some(status),
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Build a failure from a non-success response body.
    ///
    /// The platform answers errors either with `{"error": "<key>"}` or with a
    /// bare text body; both end up in `message`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => {
                let text = body.trim();
                if text.is_empty() || text.starts_with('<') {
                    None
                } else {
                    Some(text.to_string())
                }
            }
        };
        Self::from_status(status, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn client(message: Option<&str>) -> Self {
        Self::from_status(StatusCode::BAD_REQUEST, message.map(String::from))
    }

    pub fn server(message: Option<&str>) -> Self {
        Self::from_status(StatusCode::INTERNAL_SERVER_ERROR, message.map(String::from))
    }

    pub fn is_client_error(&self) -> bool {
        self.kind == FailureKind::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == FailureKind::Server
    }

    /// Translation key shown to the user for this failure.
    pub fn i18n_key(&self) -> String {
        match (&self.kind, &self.message) {
            (FailureKind::Transport, _) => "support.error.network".to_string(),
            (_, Some(message)) => message.clone(),
            (FailureKind::Client, None) => "support.error.unexpected".to_string(),
            (FailureKind::Server, None) => "support.error.server".to_string(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            FailureKind::Client => "request rejected",
            FailureKind::Server => "server error",
            FailureKind::Transport => "transport error",
        };
        match (self.status, &self.message) {
            (Some(status), Some(message)) => {
                write!(f, "{} ({}): {}", label, status.as_u16(), message)
            }
            (Some(status), None) => write!(f, "{} ({})", label, status.as_u16()),
            (None, Some(message)) => write!(f, "{}: {}", label, message),
            (None, None) => write!(f, "{}", label),
        }
    }
}

impl std::error::Error for ApiFailure {}

impl From<reqwest::Error> for ApiFailure {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return ApiFailure::from_status(status, Some(error.to_string()));
        }
        ApiFailure::transport(error.to_string())
    }
}
