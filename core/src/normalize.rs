//! Response normalization: one place where raw responses become typed
//! values or typed errors.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Fail with `ApiError::Http` unless the status is 2xx. The body is kept
/// verbatim.
pub(crate) fn ensure_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(rejected(response))
}

/// Check the status, then decode the body as `T`.
pub(crate) fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    ensure_success(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// A 2xx response whose body says the provider refused the request.
pub(crate) fn rejected(response: &HttpResponse) -> ApiError {
    ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    }
}
