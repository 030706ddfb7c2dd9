//! Typed blocking client for the Delhivery logistics REST API.
//!
//! # Overview
//! Pincode serviceability, client warehouses, shipping cost quotes, forward
//! orders (create, edit, cancel), pickups, labels and tracking. Each
//! operation is one HTTP round trip; nothing is cached or retried.
//!
//! # Design
//! - Request values in `schema` validate at construction, so an invalid
//!   request never reaches the wire.
//! - `DelhiveryClient` splits every operation into a pure `build_*` and
//!   `parse_*` pair around an `HttpTransport`. The default transport is
//!   `UreqTransport`; tests substitute their own.
//! - Every failure is one of the five `ApiError` kinds. A failure status or a
//!   rejection inside a 2xx body is `Http` with the body verbatim; a body that
//!   does not decode is `Decode`.
//! - The shipping cost endpoint is the only one answering in XML; that
//!   decoding is confined to `xml`.
//!
//! ```no_run
//! use delhivery_core::DelhiveryClient;
//!
//! let client = DelhiveryClient::from_env();
//! let result = client.check_pincode_serviceability("560001")?;
//! println!("serviceable: {}", result.serviceable);
//! # Ok::<(), delhivery_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
mod normalize;
pub mod schema;
pub mod transport;
pub mod xml;

pub use client::{DelhiveryClient, Operation};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use schema::ValidationError;
pub use transport::UreqTransport;
