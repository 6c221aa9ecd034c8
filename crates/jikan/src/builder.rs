//! Relative URL construction
//!
//! Pure string functions that assemble a relative URL from path segments
//! and query parameters. Nothing here percent-encodes: the client runs
//! [`encode_relative_url`](crate::client::encode_relative_url) over the
//! assembled URL exactly once before joining it onto the base URL, so the
//! builder calls stay composable on their own text.
//!
//! The accumulator's trailing character decides what the next append is:
//! `/` means more path may follow, `&` means at least one parameter has
//! already been written.

use std::fmt;

/// A single path segment, either free text or a numeric identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Text token such as `episodes` or a username
    Text(String),
    /// Numeric identifier such as a MAL id or a page number
    Numeric(u64),
}

impl PathSegment {
    /// Render the segment as it appears in the URL
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// True if the segment renders to empty text
    pub fn is_empty(&self) -> bool {
        matches!(self, PathSegment::Text(text) if text.is_empty())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Text(text) => f.write_str(text),
            PathSegment::Numeric(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Text(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Text(value)
    }
}

impl From<u64> for PathSegment {
    fn from(value: u64) -> Self {
        PathSegment::Numeric(value)
    }
}

impl From<u32> for PathSegment {
    fn from(value: u32) -> Self {
        PathSegment::Numeric(u64::from(value))
    }
}

/// A scalar query parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

/// Query parameters, enumerated in insertion order
///
/// Behaves as a mapping: inserting a name that is already present replaces
/// its value and keeps the position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a parameter by name
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Append one segment followed by `/`
pub fn append_segment(url: &str, segment: &PathSegment) -> String {
    format!("{}{}/", url, segment)
}

/// Append every segment joined by `/`, then one trailing `/`
///
/// An empty list appends just the trailing `/`.
pub fn append_segments(url: &str, segments: &[PathSegment]) -> String {
    let joined = segments
        .iter()
        .map(PathSegment::render)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}{}/", url, joined)
}

/// Append a single `key=value&` pair
///
/// The first parameter opens the query with `?`; later parameters are
/// appended directly after the previous `&`.
pub fn append_param(url: &str, key: &str, value: &ParamValue) -> String {
    if url.ends_with('&') {
        format!("{}{}={}&", url, key, value)
    } else {
        format!("{}?{}={}&", url, key, value)
    }
}

/// Append every parameter in enumeration order
pub fn append_params(url: &str, params: &QueryParams) -> String {
    params
        .iter()
        .fold(url.to_string(), |acc, (key, value)| {
            append_param(&acc, key, value)
        })
}

/// Remove the trailing `/` if present
///
/// Repeated separators are removed together so that `trim` is idempotent.
pub fn trim(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Build the relative URL the client joins onto its base URL
pub fn relative_url(segments: &[PathSegment], params: &QueryParams) -> String {
    let path = append_segments("", segments);
    let url = trim(&append_params(&path, params));
    url.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_segment() {
        assert_eq!(append_segment("", &"anime".into()), "anime/");
        assert_eq!(append_segment("anime/", &PathSegment::from(1u64)), "anime/1/");
    }

    #[test]
    fn test_numeric_segment_matches_text() {
        assert_eq!(
            append_segment("anime/", &PathSegment::from(5u64)),
            append_segment("anime/", &PathSegment::from("5"))
        );
    }

    #[test]
    fn test_append_segments_joins_with_one_trailing_slash() {
        let url = append_segments("", &["anime".into(), 1u64.into(), "episodes".into()]);
        assert_eq!(url, "anime/1/episodes/");
        assert!(!url.ends_with("//"));
        assert_eq!(url.matches('/').count(), 3);
    }

    #[test]
    fn test_append_segments_empty_list() {
        assert_eq!(append_segments("", &[]), "/");
        assert_eq!(append_segments("anime/", &[]), "anime//");
    }

    #[test]
    fn test_append_param_first_and_subsequent() {
        let url = append_param("path/", "year", &ParamValue::from(2019));
        assert_eq!(url, "path/?year=2019&");
        let url = append_param(&url, "airing_status", &ParamValue::from("complete"));
        assert_eq!(url, "path/?year=2019&airing_status=complete&");
    }

    #[test]
    fn test_append_params_follows_enumeration_order() {
        let params = QueryParams::from([
            ("year", ParamValue::from(2019)),
            ("airing_status", ParamValue::from("complete")),
        ]);
        assert_eq!(
            append_params("path/", &params),
            "path/?year=2019&airing_status=complete&"
        );

        let params = QueryParams::from([
            ("airing_status", ParamValue::from("complete")),
            ("year", ParamValue::from(2019)),
        ]);
        assert_eq!(
            append_params("path/", &params),
            "path/?airing_status=complete&year=2019&"
        );
    }

    #[test]
    fn test_append_params_empty_is_noop() {
        assert_eq!(append_params("anime/1/", &QueryParams::new()), "anime/1/");
    }

    #[test]
    fn test_append_params_always_ends_in_ampersand() {
        let params: QueryParams = [("q", "naruto"), ("page", "2"), ("limit", "5")]
            .into_iter()
            .collect();
        for base in ["", "search/anime/", "search/anime", "x?a=1&"] {
            let url = append_params(base, &params);
            assert!(url.ends_with('&'), "{url}");
            assert!(!url.ends_with('?'));
        }
    }

    #[test]
    fn test_trim_is_idempotent() {
        for url in ["", "/", "anime/1/", "anime/1", "anime//", "q?a=1&"] {
            assert_eq!(trim(&trim(url)), trim(url));
        }
        assert_eq!(trim("anime/1/"), "anime/1");
        assert_eq!(trim("anime/1"), "anime/1");
        assert_eq!(trim("anime//"), "anime");
    }

    #[test]
    fn test_query_params_insert_replaces_in_place() {
        let mut params = QueryParams::new();
        params.insert("q", "one");
        params.insert("page", 1);
        params.insert("q", "two");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("q"), Some(&ParamValue::from("two")));
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["q", "page"]);
    }

    #[test]
    fn test_builder_does_not_encode() {
        let params = QueryParams::from([("q", "cowboy bebop")]);
        assert_eq!(
            append_params("search/anime/", &params),
            "search/anime/?q=cowboy bebop&"
        );
    }

    #[test]
    fn test_relative_url() {
        let segments: Vec<PathSegment> = vec!["anime".into(), 1u64.into()];
        assert_eq!(relative_url(&segments, &QueryParams::new()), "anime/1");

        let params = QueryParams::from([("page", 2)]);
        let segments: Vec<PathSegment> = vec!["top".into(), "anime".into()];
        assert_eq!(relative_url(&segments, &params), "top/anime/?page=2&");

        assert_eq!(relative_url(&[], &QueryParams::new()), "");
    }
}
