//! Request descriptions and per-resource constructors
//!
//! An [`ApiRequest`] is the ordered path, the query parameters and the
//! transport options of one call. Resource constructors seed the path with
//! the API's fixed prefix and identifier; callers add sub-resources and
//! parameters with the builder methods.
//!
//! ```
//! use jikan::ApiRequest;
//!
//! let req = ApiRequest::anime(1).segment("episodes").segment(2u64);
//! assert_eq!(req.relative_url(), "anime/1/episodes/2");
//! ```

use crate::builder::{relative_url, ParamValue, PathSegment, QueryParams};
use crate::types::RequestOptions;
use std::fmt;
use std::time::Duration;

macro_rules! path_token {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Token used in the request path
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for PathSegment {
            fn from(value: $name) -> Self {
                PathSegment::Text(value.as_str().to_string())
            }
        }
    };
}

path_token!(
    /// Resource searched by `search/{type}`
    SearchType {
        Anime => "anime",
        Manga => "manga",
        Person => "person",
        Character => "character",
    }
);

path_token!(
    /// Broadcast season
    Season {
        Winter => "winter",
        Spring => "spring",
        Summer => "summer",
        Fall => "fall",
    }
);

path_token!(
    /// Day filter for `schedule/{day}`
    Weekday {
        Monday => "monday",
        Tuesday => "tuesday",
        Wednesday => "wednesday",
        Thursday => "thursday",
        Friday => "friday",
        Saturday => "saturday",
        Sunday => "sunday",
        Other => "other",
        Unknown => "unknown",
    }
);

path_token!(
    /// Ranking kind for `top/{type}`
    TopType {
        Anime => "anime",
        Manga => "manga",
        People => "people",
        Characters => "characters",
    }
);

path_token!(
    /// Catalogue for `genre/{type}/{id}`
    GenreType {
        Anime => "anime",
        Manga => "manga",
    }
);

/// One API call: path, query parameters and transport options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<PathSegment>,
    params: QueryParams,
    options: RequestOptions,
}

impl ApiRequest {
    /// Create a request for an arbitrary path
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self::default().segments(segments)
    }

    /// Append one path segment
    pub fn segment(mut self, segment: impl Into<PathSegment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append several path segments in order
    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Set a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Set several query parameters in order
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (key, value) in params {
            self.params.insert(key, value);
        }
        self
    }

    /// Add a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.push((name.into(), value.into()));
        self
    }

    /// Override the transport timeout for this request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Replace all transport options
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path_segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn query(&self) -> &QueryParams {
        &self.params
    }

    pub fn request_options(&self) -> &RequestOptions {
        &self.options
    }

    /// Relative URL, unencoded, as joined onto the base URL
    pub fn relative_url(&self) -> String {
        relative_url(&self.segments, &self.params)
    }

    /// `anime/{id}`
    pub fn anime(id: u64) -> Self {
        Self::new([PathSegment::from("anime"), id.into()])
    }

    /// `manga/{id}`
    pub fn manga(id: u64) -> Self {
        Self::new([PathSegment::from("manga"), id.into()])
    }

    /// `person/{id}`
    pub fn person(id: u64) -> Self {
        Self::new([PathSegment::from("person"), id.into()])
    }

    /// `character/{id}`
    pub fn character(id: u64) -> Self {
        Self::new([PathSegment::from("character"), id.into()])
    }

    /// `search/{type}`; the query goes in the `q` parameter
    pub fn search(kind: SearchType) -> Self {
        Self::new([PathSegment::from("search"), kind.into()])
    }

    /// `season/{year}/{season}`
    pub fn season(year: u32, season: Season) -> Self {
        Self::new([PathSegment::from("season"), year.into(), season.into()])
    }

    /// `season/archive`
    pub fn season_archive() -> Self {
        Self::new(["season", "archive"])
    }

    /// `season/later`
    pub fn season_later() -> Self {
        Self::new(["season", "later"])
    }

    /// `schedule/{day}`
    pub fn schedule(day: Weekday) -> Self {
        Self::new([PathSegment::from("schedule"), day.into()])
    }

    /// `top/{type}`; page and subtype follow as segments
    pub fn top(kind: TopType) -> Self {
        Self::new([PathSegment::from("top"), kind.into()])
    }

    /// `genre/{type}/{genre_id}`
    pub fn genre(kind: GenreType, genre_id: u64) -> Self {
        Self::new([PathSegment::from("genre"), kind.into(), genre_id.into()])
    }

    /// `producer/{id}`
    pub fn producer(id: u64) -> Self {
        Self::new([PathSegment::from("producer"), id.into()])
    }

    /// `magazine/{id}`
    pub fn magazine(id: u64) -> Self {
        Self::new([PathSegment::from("magazine"), id.into()])
    }

    /// `user/{username}`
    pub fn user(username: impl Into<String>) -> Self {
        Self::new([PathSegment::from("user"), PathSegment::Text(username.into())])
    }

    /// `club/{id}`
    pub fn club(id: u64) -> Self {
        Self::new([PathSegment::from("club"), id.into()])
    }

    /// `meta/{request}`
    pub fn meta(request: impl Into<String>) -> Self {
        Self::new([PathSegment::from("meta"), PathSegment::Text(request.into())])
    }
}
