//! Core types for the Jikan client

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Reserved key holding the final request URL
pub const HTTP_URL: &str = "http_url";

/// Reserved key holding the HTTP status code
pub const HTTP_STATUS: &str = "http_status";

/// Reserved key holding the response headers as `[name, value]` pairs
pub const HTTP_HEADERS: &str = "http_headers";

/// Response body as handed back by a transport
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No body at all
    #[default]
    Empty,
    /// Raw text the transport did not decode
    Text(String),
    /// Decoded JSON
    Json(Value),
}

impl Body {
    /// Wrap raw text, treating blank text as no body
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Body::Empty
        } else {
            Body::Text(text)
        }
    }
}

/// Raw transport result: status, headers, final URL and body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    /// HTTP status code, if the transport produced one
    pub status: Option<u16>,
    /// Response headers in the order received
    pub headers: Vec<(String, String)>,
    /// Final request URL after redirects
    pub url: String,
    pub body: Body,
}

impl Envelope {
    /// Create an envelope with a status and URL and no headers or body
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Per-request transport options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Request timeout; the transport default applies when unset
    pub timeout: Option<Duration>,
}

/// Normalized response: body fields and `http_*` metadata in one flat map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(Map<String, Value>);

impl Response {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// HTTP status code, if the envelope carried one
    pub fn status(&self) -> Option<u16> {
        self.0
            .get(HTTP_STATUS)
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Final request URL
    pub fn url(&self) -> Option<&str> {
        self.0.get(HTTP_URL).and_then(Value::as_str)
    }

    /// Response headers as `(name, value)` pairs
    pub fn headers(&self) -> Vec<(&str, &str)> {
        self.0
            .get(HTTP_HEADERS)
            .and_then(Value::as_array)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter_map(|pair| match pair.as_array().map(Vec::as_slice) {
                        Some([name, value]) => Some((name.as_str()?, value.as_str()?)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up any field, reserved or from the body
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_from_text() {
        assert_eq!(Body::from_text(""), Body::Empty);
        assert_eq!(Body::from_text("  \n"), Body::Empty);
        assert_eq!(Body::from_text("{}"), Body::Text("{}".to_string()));
    }

    #[test]
    fn test_envelope_builder() {
        let env = Envelope::new(200, "https://api.jikan.moe/v3/anime/1")
            .with_header("content-type", "application/json")
            .with_body(Body::Json(json!({"mal_id": 1})));

        assert_eq!(env.status, Some(200));
        assert_eq!(env.headers.len(), 1);
        assert_eq!(env.body, Body::Json(json!({"mal_id": 1})));
    }

    #[test]
    fn test_response_accessors() {
        let value = json!({
            "http_status": 404,
            "http_url": "https://api.jikan.moe/v3/anime/0",
            "http_headers": [["content-type", "application/json"], ["broken"]],
            "message": "Resource does not exist",
        });
        let resp: Response = serde_json::from_value(value).unwrap();

        assert_eq!(resp.status(), Some(404));
        assert_eq!(resp.url(), Some("https://api.jikan.moe/v3/anime/0"));
        assert_eq!(resp.headers(), vec![("content-type", "application/json")]);
        assert_eq!(resp.get("message"), Some(&json!("Resource does not exist")));
    }

    #[test]
    fn test_response_serializes_flat() {
        let mut map = Map::new();
        map.insert("title".to_string(), json!("X"));
        let json = serde_json::to_string(&Response::from_map(map)).unwrap();
        assert_eq!(json, r#"{"title":"X"}"#);
    }
}
