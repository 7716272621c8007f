//! Stateless request builder and response parser.
//!
//! # Design
//! `Service` holds only its `ServiceConfig` and carries no mutable state
//! between calls. `build_request` turns a caller-facing `Request` into a wire
//! `HttpRequest` (URL construction, query encoding, header encoding);
//! `parse_response` validates an `HttpResponse` and decodes its JSON body.
//! Neither touches the network, so both are deterministic and tested
//! directly; `RequestExecutor` runs the transport in between.

use std::ops::Range;

use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::config::{EncodingPolicy, ServiceConfig};
use crate::error::ServiceError;
use crate::http::{HttpRequest, HttpResponse};
use crate::request::Request;
use crate::types::{Parameters, Value};

/// Statuses accepted as success. The upper bound is exclusive, so 299 is
/// rejected along with every non-2xx code.
pub const SUCCESS_STATUS: Range<u16> = 200..299;

#[derive(Debug, Clone, Default)]
pub struct Service {
    config: ServiceConfig,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the wire request for `request`.
    ///
    /// An invalid endpoint always fails. Parameter and header failures fail
    /// under `EncodingPolicy::Strict`; under `BestEffort` they are logged and
    /// the failing step is skipped.
    pub fn build_request(&self, request: &Request) -> Result<HttpRequest, ServiceError> {
        let mut url = self.endpoint_url(&request.endpoint)?;

        if let Some(parameters) = &request.parameters {
            if let Err(e) = encode_parameters(&mut url, parameters) {
                self.recover(e)?;
            }
        }

        let mut headers: Vec<(String, String)> = Vec::new();
        if let Some(fields) = &request.headers {
            for (name, value) in fields.iter() {
                match encode_header(name, value) {
                    Ok(field) => set_header(&mut headers, name, field),
                    Err(e) => self.recover(e)?,
                }
            }
        }

        Ok(HttpRequest {
            method: request.method,
            url: url.into(),
            headers,
            body: request.body.clone(),
        })
    }

    /// Validate `response` and decode its body into `T`.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ServiceError> {
        check_status(&response)?;
        if response.body.is_empty() {
            return Err(ServiceError::NoData);
        }
        serde_json::from_slice(&response.body).map_err(|e| ServiceError::DecoderError(e.to_string()))
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ServiceError> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = format!("{base}{endpoint}");
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ServiceError::InvalidEndpoint(format!(
                "{raw:?} contains whitespace or control characters"
            )));
        }
        Url::parse(&raw).map_err(|e| ServiceError::InvalidEndpoint(format!("{raw:?}: {e}")))
    }

    fn recover(&self, error: ServiceError) -> Result<(), ServiceError> {
        match self.config.encoding_policy {
            EncodingPolicy::Strict => Err(error),
            EncodingPolicy::BestEffort => {
                warn!(
                    error = %error,
                    detail = error.detail().unwrap_or_default(),
                    "continuing past encoding failure"
                );
                Ok(())
            }
        }
    }
}

/// Replace the URL's query with `parameters`, in mapping order. An empty map
/// leaves the URL untouched.
fn encode_parameters(url: &mut Url, parameters: &Parameters) -> Result<(), ServiceError> {
    if parameters.is_empty() {
        return Ok(());
    }
    if url.cannot_be_a_base() {
        return Err(ServiceError::EncodingParametersError(format!(
            "{url} cannot carry a query"
        )));
    }
    url.set_query(None);
    let mut pairs = url.query_pairs_mut();
    for (key, value) in parameters.iter() {
        pairs.append_pair(key, &value.to_string());
    }
    Ok(())
}

/// Validate one header entry. Non-string values yield `None`, which clears
/// the field instead of setting it.
fn encode_header(name: &str, value: &Value) -> Result<Option<String>, ServiceError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ServiceError::EncodingHeadersError(format!("{name:?}: {e}")))?;
    let Some(text) = value.as_str() else {
        return Ok(None);
    };
    HeaderValue::from_str(text)
        .map_err(|e| ServiceError::EncodingHeadersError(format!("{name:?}: {e}")))?;
    Ok(Some(text.to_string()))
}

/// Set or clear `name`, replacing any earlier field with the same name.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: Option<String>) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    if let Some(value) = value {
        headers.push((name.to_string(), value));
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ServiceError> {
    if SUCCESS_STATUS.contains(&response.status) {
        return Ok(());
    }
    Err(ServiceError::InvalidResponse {
        status: response.status,
    })
}
