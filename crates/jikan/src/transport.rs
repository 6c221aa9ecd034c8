//! Transport boundary
//!
//! The client never opens connections itself. It hands a fully encoded URL
//! to a [`Transport`] and gets back an [`Envelope`], or a
//! [`TransportError`] when no response exists at all.

use crate::error::TransportError;
use crate::types::{Body, Envelope, RequestOptions};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Capability to perform an HTTP GET
///
/// Implement this trait to plug in a different HTTP stack or a canned
/// responder for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identifier for logging/debugging
    fn name(&self) -> &'static str;

    /// Perform a GET request
    ///
    /// Returns the envelope for any HTTP response, whatever its status.
    /// Errors are reserved for requests that produced no response.
    async fn get(&self, url: &Url, options: &RequestOptions) -> Result<Envelope, TransportError>;
}

/// Transport backed by `reqwest`
///
/// Follows redirects and decodes the body as JSON when the server labels
/// it as JSON. Anything else comes back as raw text.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default User-Agent
    pub fn new() -> Result<Self, TransportError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a transport sending the given User-Agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
            warn!(user_agent, "Invalid User-Agent, using default");
            HeaderValue::from_static(DEFAULT_USER_AGENT)
        });
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest` client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn get(&self, url: &Url, options: &RequestOptions) -> Result<Envelope, TransportError> {
        let mut request = self.client.get(url.clone());

        for (name, value) in &options.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => request = request.header(name, value),
                _ => warn!(header = %name, "Skipping invalid request header"),
            }
        }

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(TransportError::from_reqwest)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);

        let text = response.text().await.map_err(TransportError::from_reqwest)?;
        debug!(status, url = %final_url, bytes = text.len(), "Received response");

        Ok(Envelope {
            status: Some(status),
            headers,
            url: final_url,
            body: decode_body(text, is_json),
        })
    }
}

/// Check if a content type names JSON (`application/json`, `+json` suffixes)
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Decode JSON-labelled bodies, leaving everything else as text
fn decode_body(text: String, is_json: bool) -> Body {
    if !is_json {
        return Body::from_text(text);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Body::Json(value),
        Err(_) => Body::from_text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_json_content_type() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/problem+json"));

        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type("text/plain; charset=utf-8"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(
            decode_body(r#"{"a":1}"#.to_string(), true),
            Body::Json(json!({"a": 1}))
        );
        assert_eq!(
            decode_body(r#"{"a":1}"#.to_string(), false),
            Body::Text(r#"{"a":1}"#.to_string())
        );
        assert_eq!(
            decode_body("{broken".to_string(), true),
            Body::Text("{broken".to_string())
        );
        assert_eq!(decode_body(String::new(), true), Body::Empty);
    }

    #[test]
    fn test_reqwest_transport_name() {
        let transport = ReqwestTransport::new().unwrap();
        assert_eq!(transport.name(), "reqwest");
    }
}
