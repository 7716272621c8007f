//! Async request execution.
//!
//! # Design
//! `RequestExecutor` pairs a stateless `Service` with an `HttpTransport`.
//! Each call builds its own `HttpRequest`, performs one exchange, and yields
//! exactly one `Result`. Nothing is shared between calls except the
//! immutable config and the transport handle, so independent requests may
//! run concurrently and complete in any order.

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::Service;
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::request::Request;
use crate::transport::{HttpTransport, ReqwestTransport};

#[derive(Debug, Clone)]
pub struct RequestExecutor<T = ReqwestTransport> {
    service: Service,
    transport: T,
}

impl RequestExecutor<ReqwestTransport> {
    /// Executor over a fresh `reqwest` client configured from `config`.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> RequestExecutor<T> {
    pub fn with_transport(config: ServiceConfig, transport: T) -> Self {
        Self {
            service: Service::new(config),
            transport,
        }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build, send, and decode one request.
    ///
    /// Build failures return before anything is sent.
    pub async fn execute<D: DeserializeOwned>(&self, request: Request) -> Result<D, ServiceError> {
        let http_request = self.service.build_request(&request)?;
        let method = http_request.method;
        let url = http_request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = match self.transport.send(http_request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(%method, %url, error = %e, "transport failed");
                return Err(e.into());
            }
        };
        debug!(%method, %url, status = response.status, "response received");

        self.service.parse_response(response)
    }
}

impl<T: HttpTransport + Clone + 'static> RequestExecutor<T> {
    /// Run `execute` on its own Tokio task.
    pub fn spawn<D>(&self, request: Request) -> JoinHandle<Result<D, ServiceError>>
    where
        D: DeserializeOwned + Send + 'static,
    {
        let executor = self.clone();
        tokio::spawn(async move { executor.execute(request).await })
    }

    /// Run `execute` on its own Tokio task and hand the result to
    /// `completion`, which is called exactly once.
    pub fn execute_with<D, F>(&self, request: Request, completion: F) -> JoinHandle<()>
    where
        D: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<D, ServiceError>) + Send + 'static,
    {
        let executor = self.clone();
        tokio::spawn(async move { completion(executor.execute(request).await) })
    }
}
