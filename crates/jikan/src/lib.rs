//! Jikan - thin client for the Jikan anime/manga metadata API
//!
//! Builds request URLs from path segments and query parameters, sends GET
//! requests through a pluggable [`Transport`], and flattens every response
//! into one map holding the decoded body plus `http_url`, `http_status` and
//! `http_headers`.
//!
//! ## Call paths
//!
//! - [`Client::send`] returns a [`Reply`]: HTTP and decode failures come
//!   back as values with the same flat shape as a success.
//! - [`Client::send_or_error`] raises every failure as a [`JikanError`],
//!   with HTTP failures carried by an [`ApiError`].
//!
//! Transport failures (no response at all) are errors on both paths.
//!
//! ```no_run
//! # async fn run() -> Result<(), jikan::JikanError> {
//! use jikan::{ApiRequest, Client};
//!
//! let client = Client::new()?;
//! let anime = client
//!     .send_or_error(&ApiRequest::anime(1).segment("episodes"))
//!     .await?;
//! println!("{:?}", anime.get("episodes"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
mod classify;
pub mod client;
mod endpoints;
mod error;
mod normalize;
mod transport;
mod types;

pub use builder::{ParamValue, PathSegment, QueryParams};
pub use classify::{
    classify, is_success, Classification, FailureReason, DECODE_BODY_SNIPPET_LIMIT,
    DEFAULT_FAILURE_THRESHOLD, LEGACY_FAILURE_THRESHOLD,
};
pub use client::{Client, ClientBuilder, Config, Failure, Reply};
pub use endpoints::{ApiRequest, GenreType, SearchType, Season, TopType, Weekday};
pub use error::{
    ApiError, JikanError, TransportError, UNEXPECTED_ERROR_MESSAGE, UNKNOWN_API_ERROR_MESSAGE,
};
pub use normalize::normalize;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Body, Envelope, RequestOptions, Response, HTTP_HEADERS, HTTP_STATUS, HTTP_URL};

/// Default base URL of the public API
pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v3/";

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "jikan-rs/0.1";

/// Environment variable the CLI reads to override the base URL
pub const BASE_URL_ENV: &str = "JIKAN_BASE_URL";
