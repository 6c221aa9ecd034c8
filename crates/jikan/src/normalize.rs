//! Response normalization
//!
//! Flattens an [`Envelope`] into the single map every caller sees. Success
//! and failure envelopes go through the same function, so both paths share
//! one shape.

use crate::types::{Body, Envelope, Response, HTTP_HEADERS, HTTP_STATUS, HTTP_URL};
use serde_json::{Map, Value};

/// Flatten an envelope into a [`Response`]
///
/// Body fields land at the top level when the body is a JSON object; any
/// other body contributes nothing. The reserved `http_*` keys are written
/// last and always win over body fields with the same name.
pub fn normalize(envelope: Envelope) -> Response {
    let mut map = match envelope.body {
        Body::Json(Value::Object(fields)) => fields,
        _ => Map::new(),
    };

    let headers = envelope
        .headers
        .into_iter()
        .map(|(name, value)| Value::Array(vec![Value::String(name), Value::String(value)]))
        .collect();

    map.insert(HTTP_HEADERS.to_string(), Value::Array(headers));
    map.insert(
        HTTP_STATUS.to_string(),
        envelope.status.map(Value::from).unwrap_or(Value::Null),
    );
    map.insert(HTTP_URL.to_string(), Value::String(envelope.url));

    Response::from_map(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_success() {
        let env = Envelope::new(200, "U").with_body(Body::Json(json!({"title": "X"})));
        let resp = normalize(env);

        assert_eq!(
            Value::Object(resp.into_map()),
            json!({
                "http_status": 200,
                "http_url": "U",
                "http_headers": [],
                "title": "X",
            })
        );
    }

    #[test]
    fn test_reserved_keys_win() {
        let env = Envelope::new(200, "real").with_body(Body::Json(json!({
            "http_url": "spoofed",
            "http_status": 999,
            "http_headers": "nope",
            "url": "kept",
        })));
        let resp = normalize(env);

        assert_eq!(resp.url(), Some("real"));
        assert_eq!(resp.status(), Some(200));
        assert_eq!(resp.get("http_headers"), Some(&json!([])));
        assert_eq!(resp.get("url"), Some(&json!("kept")));
    }

    #[test]
    fn test_non_object_body_is_dropped() {
        for body in [
            Body::Empty,
            Body::Text("plain".to_string()),
            Body::Json(json!([1, 2, 3])),
            Body::Json(json!("string")),
        ] {
            let resp = normalize(Envelope::new(500, "U").with_body(body));
            assert_eq!(resp.as_map().len(), 3);
            assert_eq!(resp.status(), Some(500));
        }
    }

    #[test]
    fn test_headers_rendered_as_pairs() {
        let env = Envelope::new(200, "U")
            .with_header("content-type", "application/json")
            .with_header("x-request-hash", "abc");
        let resp = normalize(env);

        assert_eq!(
            resp.get(HTTP_HEADERS),
            Some(&json!([
                ["content-type", "application/json"],
                ["x-request-hash", "abc"]
            ]))
        );
    }

    #[test]
    fn test_missing_status_is_null() {
        let env = Envelope {
            url: "U".to_string(),
            ..Default::default()
        };
        let resp = normalize(env);
        assert_eq!(resp.get(HTTP_STATUS), Some(&Value::Null));
        assert_eq!(resp.status(), None);
    }
}
