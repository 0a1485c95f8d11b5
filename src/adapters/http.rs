use crate::core::addressing::ResourceEndpoint;
use crate::core::client::GluonClient;
use crate::domain::ports::{
    ConfigProvider, HttpMethod, Transport, TransportRequest, TransportResponse,
};
use crate::utils::error::{GluonError, Result};
use crate::utils::validation::validate_endpoint;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::error::Error as StdError;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_fault)?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_fault)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_fault)?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

/// Builds the process-wide client handle from validated configuration.
pub fn connect(config: &impl ConfigProvider) -> Result<GluonClient<ReqwestTransport>> {
    validate_endpoint("endpoint", config.endpoint())?;
    let transport = ReqwestTransport::with_timeout(config.request_timeout())?;
    tracing::debug!(endpoint = config.endpoint(), "Gluon client configured");
    Ok(GluonClient::new(
        ResourceEndpoint::new(config.endpoint()),
        transport,
    ))
}

fn transport_fault(err: reqwest::Error) -> GluonError {
    let reason = describe(&err);
    if is_certificate_error(&err) {
        GluonError::SslCertificateValidation { reason }
    } else if err.is_timeout() {
        GluonError::ConnectionFailed {
            reason: format!("request timed out: {}", reason),
        }
    } else {
        GluonError::ConnectionFailed { reason }
    }
}

fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}
