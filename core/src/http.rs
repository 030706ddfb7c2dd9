//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; an
//! `HttpTransport` performs the single round trip in between. The default
//! transport lives in `transport.rs`; tests lend the client a spy instead.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// HTTP method for a request. The provider only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Request body as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// Serialized JSON document.
    Json(String),
    /// `application/x-www-form-urlencoded` pairs, encoded by the transport.
    Form(Vec<(String, String)>),
}

/// An HTTP request described as plain data.
///
/// `url` is the absolute URL without query string; `query` pairs are
/// unencoded and appended by the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The JSON body, if this request carries one.
    pub fn json_body(&self) -> Option<&str> {
        match &self.body {
            Some(HttpBody::Json(json)) => Some(json),
            _ => None,
        }
    }

    /// The form pairs, if this request carries a form body.
    pub fn form_body(&self) -> Option<&[(String, String)]> {
        match &self.body {
            Some(HttpBody::Form(pairs)) => Some(pairs),
            _ => None,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: the request never produced an HTTP response.
#[derive(Debug)]
pub struct TransportError {
    message: String,
    timed_out: bool,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: None,
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self {
            message: format!("request timed out after {}s", after.as_secs_f64()),
            timed_out: true,
            source: None,
        }
    }

    /// Wrap the underlying transport error unchanged.
    pub fn from_source<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            timed_out: false,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn mark_timed_out(mut self) -> Self {
        self.timed_out = true;
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

/// Executes one `HttpRequest` and returns the raw response.
///
/// Implementations must return non-2xx responses as data, not as errors;
/// status interpretation belongs to the client.
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
