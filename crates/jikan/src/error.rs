//! Error types for the Jikan client

use crate::types::{Response, HTTP_STATUS};
use serde_json::Value;
use thiserror::Error;

/// Message used when a failure carries no status code at all
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An Unexpected error occurred";

/// Message used when the API gave no `message` or `error` field
pub const UNKNOWN_API_ERROR_MESSAGE: &str = "Unknown API error";

/// Errors raised by a [`Transport`](crate::Transport) before any response exists
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err)
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// An HTTP failure turned into an error
///
/// Carries the full normalized failure response for diagnostics.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    response: Response,
}

impl ApiError {
    /// Build an error from a normalized failure response
    ///
    /// The message is `HTTP Error <status>: <detail>`, where the detail is
    /// the body's `message` field, else its `error` field, else a generic
    /// text. A response without a status gets a fixed generic message.
    pub fn from_response(response: Response) -> Self {
        let message = match response.get(HTTP_STATUS) {
            None | Some(Value::Null) => UNEXPECTED_ERROR_MESSAGE.to_string(),
            Some(status) => {
                let detail = ["message", "error"]
                    .iter()
                    .find_map(|key| response.get(key).and_then(render_detail))
                    .unwrap_or_else(|| UNKNOWN_API_ERROR_MESSAGE.to_string());
                format!("HTTP Error {}: {}", render_scalar(status), detail)
            }
        };
        Self { message, response }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code of the failed response, if any
    pub fn status(&self) -> Option<u16> {
        self.response.status()
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

fn render_detail(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(render_scalar(other)),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Errors that can occur when calling the API
#[derive(Debug, Error)]
pub enum JikanError {
    /// The transport produced no response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with a failure status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The API answered with a success status but an undecodable body
    ///
    /// `body` is the start of the raw text the server sent.
    #[error("Failed to decode response body: {message}")]
    Decode {
        message: String,
        body: String,
        response: Response,
    },

    /// The base URL or the assembled request URL is invalid
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The User-Agent is not a valid header value
    #[error("Invalid User-Agent: {0:?}")]
    InvalidUserAgent(String),

    /// A text path segment was empty
    #[error("Path segments must not be empty")]
    EmptyPathSegment,
}
