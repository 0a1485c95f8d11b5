use crate::core::addressing::ResourceEndpoint;
use crate::core::fault;
use crate::core::reader::PortReader;
use crate::domain::ports::{HttpMethod, Transport, TransportRequest, TransportResponse};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

/// Handle on one Gluon server: where it lives and how to reach it.
///
/// Built once at process start and passed by reference to whatever needs
/// to talk to Gluon. Every exchange it performs is routed through the
/// fault mapper.
#[derive(Debug, Clone)]
pub struct GluonClient<T: Transport> {
    endpoint: ResourceEndpoint,
    transport: T,
}

impl<T: Transport> GluonClient<T> {
    pub fn new(endpoint: ResourceEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &ResourceEndpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read-side view over this server.
    pub fn ports(&self) -> PortReader<'_, T> {
        PortReader::new(self)
    }

    pub async fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.exchange(HttpMethod::Get, path, None).await?;
        fault::decode(response)
    }

    pub async fn submit(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<TransportResponse> {
        let response = self.exchange(method, path, body).await?;
        fault::acknowledge(response)
    }

    async fn exchange(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<TransportResponse> {
        let url = self.endpoint.url(path);
        tracing::debug!(%method, %url, "Sending Gluon request");

        let response = self
            .transport
            .send(TransportRequest { method, url, body })
            .await?;

        tracing::debug!(%method, path, status = response.status, "Gluon response received");
        Ok(response)
    }
}
