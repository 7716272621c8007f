//! Caller-facing description of one API call.

use serde::Serialize;

use crate::error::ServiceError;
use crate::http::HttpMethod;
use crate::types::{Headers, Parameters, Value};

/// Endpoint, method, parameters, headers, and body for a single request.
///
/// `parameters` and `headers` distinguish "absent" (`None`) from "present
/// but empty"; neither mutates the request, but only `Some` runs the
/// encoding step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub endpoint: String,
    pub method: HttpMethod,
    pub parameters: Option<Parameters>,
    pub headers: Option<Headers>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            ..Self::default()
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(key, value);
        self
    }

    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.get_or_insert_with(Headers::new).insert(key, value);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Raw body bytes, sent verbatim.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set `Content-Type` to match.
    pub fn json_body<B: Serialize + ?Sized>(self, value: &B) -> Result<Self, ServiceError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| ServiceError::EncodingError(e.to_string()))?;
        Ok(self.header("Content-Type", "application/json").body(bytes))
    }
}
