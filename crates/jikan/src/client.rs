//! API client
//!
//! [`Client`] holds an immutable [`Config`] and a shared [`Transport`]. It
//! carries no other state, so clones can be used from concurrent tasks.
//!
//! Every call goes through the same pipeline: the request's relative URL is
//! percent-encoded once and joined onto the base URL, the transport performs
//! the GET, the envelope is classified and then normalized.

use crate::builder::PathSegment;
use crate::classify::{classify, Classification, FailureReason, DEFAULT_FAILURE_THRESHOLD};
use crate::endpoints::ApiRequest;
use crate::error::{ApiError, JikanError};
use crate::normalize::normalize;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::Response;
use crate::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::HeaderValue;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Bytes escaped in the assembled relative URL
///
/// Keeps `/ ? & =` so the builder's separators survive; non-ASCII is always
/// escaped by `utf8_percent_encode`.
const RELATIVE_URL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a relative URL produced by the builder
pub fn encode_relative_url(relative: &str) -> String {
    utf8_percent_encode(relative, RELATIVE_URL_ENCODE_SET).to_string()
}

/// Client configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL every relative request URL is joined onto; always ends in `/`
    pub base_url: Url,
    /// Statuses at or above this value are failures
    pub failure_threshold: u16,
    /// User-Agent sent by the default transport
    pub user_agent: String,
}

/// A failure-side result from the non-raising call path
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub reason: FailureReason,
    /// Normalized failure response, same shape as a success
    pub response: Response,
}

/// Result of a call that reached the API
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Response),
    Failure(Failure),
}

impl Reply {
    fn from_classification(classification: Classification) -> Self {
        match classification {
            Classification::Success(envelope) => Reply::Success(normalize(envelope)),
            Classification::Failure(envelope, reason) => Reply::Failure(Failure {
                reason,
                response: normalize(envelope),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    /// The normalized response, whichever side it came from
    pub fn response(&self) -> &Response {
        match self {
            Reply::Success(response) => response,
            Reply::Failure(failure) => &failure.response,
        }
    }

    /// Return the success response or raise the failure as an error
    ///
    /// HTTP failures become [`JikanError::Api`]; undecodable bodies become
    /// [`JikanError::Decode`].
    pub fn into_result(self) -> Result<Response, JikanError> {
        match self {
            Reply::Success(response) => Ok(response),
            Reply::Failure(Failure {
                reason: FailureReason::Http,
                response,
            }) => Err(JikanError::Api(ApiError::from_response(response))),
            Reply::Failure(Failure {
                reason: FailureReason::Decode { message, body },
                response,
            }) => Err(JikanError::Decode {
                message,
                body,
                response,
            }),
        }
    }
}

/// Builder for configuring a [`Client`]
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    failure_threshold: Option<u16>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL (default `https://api.jikan.moe/v3/`)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the failure threshold
    pub fn failure_threshold(mut self, threshold: u16) -> Self {
        self.failure_threshold = Some(threshold);
        self
    }

    /// Set a custom User-Agent for the default transport
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Use a custom transport instead of the `reqwest` one
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(transport);
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Client, JikanError> {
        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let config = Config {
            base_url,
            failure_threshold: self
                .failure_threshold
                .unwrap_or(DEFAULT_FAILURE_THRESHOLD),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };

        if HeaderValue::from_str(&config.user_agent).is_err() {
            return Err(JikanError::InvalidUserAgent(config.user_agent));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_user_agent(&config.user_agent)?),
        };

        Ok(Client { config, transport })
    }
}

/// Parse a base URL, requiring http(s) and a trailing `/`
fn parse_base_url(raw: &str) -> Result<Url, JikanError> {
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(JikanError::InvalidUrl(format!(
            "base URL must start with http:// or https://: {}",
            raw
        )));
    }
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| JikanError::InvalidUrl(e.to_string()))
}

/// Jikan API client
#[derive(Clone)]
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Client {
    /// Create a client with the default configuration and transport
    pub fn new() -> Result<Self, JikanError> {
        ClientBuilder::new().build()
    }

    /// Create a client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute, percent-encoded URL for a request
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, JikanError> {
        if request.path_segments().iter().any(PathSegment::is_empty) {
            return Err(JikanError::EmptyPathSegment);
        }

        let relative = encode_relative_url(&request.relative_url());
        let url = self
            .config
            .base_url
            .join(&relative)
            .map_err(|e| JikanError::InvalidUrl(e.to_string()))?;

        // A relative URL with a scheme or a leading `//` would replace the base
        if !url.as_str().starts_with(self.config.base_url.as_str()) {
            return Err(JikanError::InvalidUrl(format!(
                "request path escapes the base URL: {}",
                relative
            )));
        }
        Ok(url)
    }

    /// Send a request, returning HTTP and decode failures as a [`Reply`]
    ///
    /// Only transport failures and invalid requests are errors here.
    pub async fn send(&self, request: &ApiRequest) -> Result<Reply, JikanError> {
        let url = self.url_for(request)?;
        debug!(transport = self.transport.name(), url = %url, "Sending request");

        let envelope = self
            .transport
            .get(&url, request.request_options())
            .await?;

        Ok(Reply::from_classification(classify(
            envelope,
            self.config.failure_threshold,
        )))
    }

    /// Send a request, raising every failure as a [`JikanError`]
    pub async fn send_or_error(&self, request: &ApiRequest) -> Result<Response, JikanError> {
        self.send(request).await?.into_result()
    }
}
