//! Success/failure classification of transport results
//!
//! Decides whether an [`Envelope`] is a success before its body is trusted.
//! Bodies a transport left as raw text get one explicit JSON decode here;
//! on the success path a failed decode is reported as its own failure
//! reason rather than as an HTTP failure.

use crate::types::{Body, Envelope};
use serde_json::Value;
use tracing::warn;

/// Statuses at or above this value are failures
pub const DEFAULT_FAILURE_THRESHOLD: u16 = 300;

/// Threshold used by older client releases, which let 3xx through
pub const LEGACY_FAILURE_THRESHOLD: u16 = 400;

/// Characters of an undecodable body kept on the failure reason
pub const DECODE_BODY_SNIPPET_LIMIT: usize = 512;

/// Why an envelope was classified as a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Status missing or at/above the failure threshold
    Http,
    /// Success status, but the body could not be decoded
    ///
    /// `body` holds the start of the raw text, at most
    /// [`DECODE_BODY_SNIPPET_LIMIT`] characters.
    Decode { message: String, body: String },
}

/// Outcome of classifying an envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Success(Envelope),
    Failure(Envelope, FailureReason),
}

/// Returns true if the status counts as a success under `threshold`
pub fn is_success(status: Option<u16>, threshold: u16) -> bool {
    matches!(status, Some(code) if code < threshold)
}

/// Classify an envelope
pub fn classify(envelope: Envelope, threshold: u16) -> Classification {
    if !is_success(envelope.status, threshold) {
        warn!(status = ?envelope.status, url = %envelope.url, "HTTP failure");
        let envelope = decode_lenient(envelope);
        return Classification::Failure(envelope, FailureReason::Http);
    }

    match decode_strict(envelope) {
        Ok(envelope) => Classification::Success(envelope),
        Err((envelope, message)) => {
            warn!(url = %envelope.url, error = %message, "Failed to decode response body");
            let body = match &envelope.body {
                Body::Text(text) => text.chars().take(DECODE_BODY_SNIPPET_LIMIT).collect(),
                _ => String::new(),
            };
            Classification::Failure(envelope, FailureReason::Decode { message, body })
        }
    }
}

/// Decode a raw text body, failing if it is not JSON
fn decode_strict(mut envelope: Envelope) -> Result<Envelope, (Envelope, String)> {
    let Body::Text(text) = &envelope.body else {
        return Ok(envelope);
    };
    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            envelope.body = Body::Json(value);
            Ok(envelope)
        }
        Err(e) => Err((envelope, e.to_string())),
    }
}

/// Decode a raw text body if it happens to be JSON, keeping it otherwise
fn decode_lenient(envelope: Envelope) -> Envelope {
    match decode_strict(envelope) {
        Ok(envelope) => envelope,
        Err((envelope, _)) => envelope,
    }
}
