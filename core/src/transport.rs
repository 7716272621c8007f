//! Network transports that execute an `HttpRequest`.
//!
//! # Design
//! `HttpTransport` is the single I/O seam of the crate. Implementations hand
//! back every status code as data; deciding what counts as success is left to
//! `Service::parse_response`. Only failures that produce no response at all
//! (DNS, refused connection, TLS, timeout) are `TransportError`s.

use async_trait::async_trait;
use tracing::trace;

use crate::config::ServiceConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Minimal async HTTP client.
///
/// Implement this to run requests through another HTTP stack, or to record
/// requests in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one HTTP exchange.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Async transport backed by a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();
        trace!(status, bytes = body.len(), "reqwest exchange complete");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Blocking transport backed by `ureq`, run on Tokio's blocking pool so the
/// calling task is never blocked.
///
/// `GET` and `DELETE` carry a body only when the request has one.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ServiceConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    fn call(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let url = url.as_str();

        let mut response = match method {
            HttpMethod::Get if body.is_some() => {
                send_with_body(with_headers(agent.get(url), &headers).force_send_body(), body)
            }
            HttpMethod::Get => with_headers(agent.get(url), &headers).call(),
            HttpMethod::Delete if body.is_some() => {
                send_with_body(with_headers(agent.delete(url), &headers).force_send_body(), body)
            }
            HttpMethod::Delete => with_headers(agent.delete(url), &headers).call(),
            HttpMethod::Post => send_with_body(with_headers(agent.post(url), &headers), body),
            HttpMethod::Put => send_with_body(with_headers(agent.put(url), &headers), body),
            HttpMethod::Patch => send_with_body(with_headers(agent.patch(url), &headers), body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<Vec<u8>>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes.as_slice()),
        None => builder.send_empty(),
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || UreqTransport::call(&agent, request))
            .await
            .map_err(|e| TransportError(e.to_string()))?
    }
}
