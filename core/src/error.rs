//! Error types for the Delhivery API client.
//!
//! # Design
//! Five closed kinds, matching the points where a call can fail: missing
//! configuration, an invalid request, a failure status from the provider, a
//! malformed success body, and a transport failure. `Http` and `Decode` are
//! kept apart so callers can tell "the provider rejected the request" from
//! "the provider's success response was malformed". Provider-specific error
//! codes are never interpreted; the raw status and body are handed back.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::TransportError;
use crate::schema::ValidationError;

/// Errors returned by every `DelhiveryClient` operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required configuration (the auth token) is absent. Raised before any
    /// request is built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request value failed its schema constraints.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The provider answered with a failure status, or with a success status
    /// whose body reports the request as rejected.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Connection failure, timeout or other transport-level failure.
    #[error("network error: {0}")]
    Network(#[from] TransportError),
}

impl ApiError {
    /// Status code of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of an `Http` error.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}
