//! Blocking `HttpTransport` backed by ureq.
//!
//! Status-as-error is disabled on the agent so 4xx/5xx responses come back as
//! data and reach the response normalizer. The request's own timeout is
//! applied per call; there is no retry.

use ureq::RequestBuilder;

use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("delhivery-core/", env!("CARGO_PKG_VERSION"));

/// Default transport used by `DelhiveryClient::new`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(USER_AGENT)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&request.url), request).call(),
            (HttpMethod::Post, Some(HttpBody::Json(json))) => {
                prepare(self.agent.post(&request.url), request).send(json.as_bytes())
            }
            (HttpMethod::Post, Some(HttpBody::Form(pairs))) => {
                prepare(self.agent.post(&request.url), request)
                    .send_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(&request.url), request).send_empty(),
        };

        let mut response = result.map_err(|err| match err {
            ureq::Error::Timeout(_) => TransportError::from_source(err).mark_timed_out(),
            other => TransportError::from_source(other),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        // Bodies need not be UTF-8; invalid sequences become U+FFFD.
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(TransportError::from_source)?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Attach query pairs, headers and the per-call timeout.
fn prepare<B>(builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    let mut builder =
        builder.query_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .config()
        .timeout_global(Some(request.timeout))
        .build()
}
