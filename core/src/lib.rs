//! Typed request executor for a single REST API.
//!
//! # Overview
//! Builds a URL from a configured base and an endpoint path, encodes query
//! parameters and headers, performs one HTTP exchange, and decodes the JSON
//! body into a caller-chosen type. Every failure is reported as one
//! `ServiceError` category; nothing is retried or cached.
//!
//! # Design
//! - `Service` is stateless. `build_request` produces an `HttpRequest` and
//!   `parse_response` consumes an `HttpResponse`, so the I/O boundary is
//!   explicit and both halves are deterministic.
//! - `HttpTransport` is the only place network I/O happens. `ReqwestTransport`
//!   is the default; `UreqTransport` runs a blocking agent off the async
//!   thread; tests substitute recording doubles.
//! - `RequestExecutor` composes the two and offers `execute` (await the
//!   result), `spawn` (own task), and `execute_with` (completion callback).
//!
//! ```no_run
//! use serde::Deserialize;
//! use service_core::{Request, RequestExecutor, ServiceConfig};
//!
//! #[derive(Deserialize)]
//! struct Page {
//!     count: u64,
//! }
//!
//! # async fn run() -> Result<(), service_core::ServiceError> {
//! let executor = RequestExecutor::new(ServiceConfig::default())?;
//! let page: Page = executor
//!     .execute(Request::get("/games").parameter("page", 2).parameter("page_size", 10))
//!     .await?;
//! println!("{} games", page.count);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{Service, SUCCESS_STATUS};
pub use config::{EncodingPolicy, ServiceConfig, DEFAULT_BASE_URL};
pub use error::{ErrorKind, ServiceError, TransportError};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::Request;
pub use transport::{HttpTransport, ReqwestTransport, UreqTransport};
pub use types::{Headers, KeyValues, Parameters, Value};
