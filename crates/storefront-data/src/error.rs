//! HTTP client error types.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the configured bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Could not reach the server.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-2xx response without a usable message.
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    /// Non-2xx response carrying a server message.
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Failed to parse the response body.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The auth endpoint answered something other than `{success: bool}`.
    #[error("Malformed auth response: {0}")]
    MalformedAuth(String),

    /// Input rejected before sending.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request could not be built or sent.
    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Map a transport failure from reqwest.
    pub(crate) fn from_transport(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(timeout)
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }

    /// Build the error for a non-2xx response body.
    ///
    /// The backend reports failures as `{"error": "..."}` (mutations) or
    /// `{"message": "..."}` (auth); either is surfaced verbatim.
    pub fn from_response(status: u16, url: &str, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
            message: Option<String>,
        }

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: Some(message),
                ..
            })
            | Ok(ErrorBody {
                message: Some(message),
                ..
            }) if !message.trim().is_empty() => FetchError::Rejected { status, message },
            _ => FetchError::Http {
                status,
                url: url.to_string(),
            },
        }
    }

    /// Whether this is a network-level failure (timeout or unreachable).
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connection(_))
    }

    /// Text to show the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Rejected { message, .. } => message.clone(),
            FetchError::Validation(message) => message.clone(),
            FetchError::Timeout(_) => "El servidor tardó demasiado en responder.".to_string(),
            FetchError::Connection(_) => {
                "No se pudo establecer conexión con el servidor.".to_string()
            }
            other => other.to_string(),
        }
    }
}
