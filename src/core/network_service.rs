use crate::core::addressing;
use crate::core::client::GluonClient;
use crate::core::reader::PortReader;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{BackendRegistration, PortEvent};
use crate::domain::ports::{HttpMethod, Transport};
use crate::utils::error::{GluonError, Result};
use crate::utils::validation::{validate_argument, validate_path_segment};
use serde_json::json;

const CREATED: u16 = 201;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkServiceOptions {
    /// Treat a 404 from `notify_delete` as success: the port is already gone.
    pub ignore_already_absent: bool,
    /// Treat a 409 from `register` or `notify_create` as success: the
    /// backend or port is already there.
    pub ignore_already_present: bool,
    /// Single attempt unless a caller opts into backoff.
    pub registration_retry: RetryPolicy,
}

impl Default for NetworkServiceOptions {
    fn default() -> Self {
        Self {
            ignore_already_absent: false,
            ignore_already_present: false,
            registration_retry: RetryPolicy::none(),
        }
    }
}

/// The network-service side of the protocol: registers this service as a
/// Gluon backend and announces port lifecycle changes under its name.
///
/// Registration is attempted lazily before the first notification and
/// again only after a failure that suggests Gluon forgot about us.
pub struct NetworkServiceApi<T: Transport> {
    client: GluonClient<T>,
    name: String,
    url: String,
    registered: bool,
    options: NetworkServiceOptions,
}

impl<T: Transport> NetworkServiceApi<T> {
    pub fn new(client: GluonClient<T>, name: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        Self::with_options(client, name, url, NetworkServiceOptions::default())
    }

    pub fn with_options(
        client: GluonClient<T>,
        name: impl Into<String>,
        url: impl Into<String>,
        options: NetworkServiceOptions,
    ) -> Result<Self> {
        let name = name.into();
        let url = url.into();
        validate_path_segment("name", &name)?;
        validate_argument("url", &url)?;

        Ok(Self {
            client,
            name,
            url,
            registered: false,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the last registration attempt succeeded. Gluon is the
    /// source of truth; this is only what we last heard.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn options(&self) -> &NetworkServiceOptions {
        &self.options
    }

    pub fn ports(&self) -> PortReader<'_, T> {
        self.client.ports()
    }

    /// Creates (or re-creates) this service's backend record.
    ///
    /// Safe to repeat. Transient faults are retried only when the options
    /// carry a multi-attempt policy. The local flag is only set on 201 Created, or on 409 when
    /// `ignore_already_present` is on.
    pub async fn register(&mut self) -> Result<()> {
        let body = serde_json::to_value(BackendRegistration::new(&self.name, &self.url))?;
        let client = &self.client;
        let path = addressing::backends_path();
        let path = path.as_str();

        let outcome = self
            .options
            .registration_retry
            .run("Backend registration", move || {
                client.submit(HttpMethod::Post, path, Some(body.clone()))
            })
            .await;

        match outcome {
            Ok(response) if response.status == CREATED => {
                tracing::info!(backend = %self.name, url = %self.url, "Registered with Gluon");
                self.registered = true;
                Ok(())
            }
            Ok(response) => {
                tracing::warn!(
                    backend = %self.name,
                    status = response.status,
                    "Registration accepted without 201 Created; will register again"
                );
                self.registered = false;
                Ok(())
            }
            Err(GluonError::Conflict { reason }) if self.options.ignore_already_present => {
                tracing::debug!(backend = %self.name, ?reason, "Backend already registered");
                self.registered = true;
                Ok(())
            }
            Err(e) => {
                self.registered = false;
                Err(e)
            }
        }
    }

    /// Registers if the local flag is clear.
    ///
    /// Only a transient fault (Gluon unreachable or unavailable) is
    /// returned. Any other registration fault is logged and the caller
    /// goes on to announce anyway, with the flag left clear.
    pub async fn ensure_registered(&mut self) -> Result<()> {
        if self.registered {
            return Ok(());
        }
        match self.register().await {
            Err(e) if !e.is_transient() => {
                tracing::warn!(backend = %self.name, "Registration failed, announcing anyway: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    /// Announces that a port exists under this backend.
    pub async fn notify_create(&mut self, port_id: &str) -> Result<()> {
        validate_path_segment("port_id", port_id)?;
        self.ensure_registered().await?;

        let result = self
            .client
            .submit(
                HttpMethod::Post,
                &addressing::backend_ports_path(&self.name),
                Some(json!({ "id": port_id })),
            )
            .await;

        match result {
            Ok(_) => {
                tracing::info!(backend = %self.name, port_id, "Announced port");
                Ok(())
            }
            Err(GluonError::Conflict { reason }) if self.options.ignore_already_present => {
                tracing::debug!(port_id, ?reason, "Port already announced");
                Ok(())
            }
            Err(e) => Err(self.observe_failure(e)),
        }
    }

    /// Withdraws a port from this backend.
    pub async fn notify_delete(&mut self, port_id: &str) -> Result<()> {
        validate_path_segment("port_id", port_id)?;
        self.ensure_registered().await?;

        let result = self
            .client
            .submit(
                HttpMethod::Delete,
                &addressing::backend_port_path(&self.name, port_id),
                None,
            )
            .await;

        match result {
            Ok(_) => {
                tracing::info!(backend = %self.name, port_id, "Withdrew port");
                Ok(())
            }
            Err(GluonError::NotFound { reason }) if self.options.ignore_already_absent => {
                tracing::debug!(port_id, ?reason, "Port already absent");
                Ok(())
            }
            Err(e) => Err(self.observe_failure(e)),
        }
    }

    /// Signals a lifecycle transition for a device/port pair. Nothing in the
    /// reply is interpreted beyond success or fault.
    pub async fn notify_event(&mut self, device_id: &str, port_id: &str, event: PortEvent) -> Result<()> {
        validate_path_segment("port_id", port_id)?;
        validate_argument("device_id", device_id)?;
        self.ensure_registered().await?;

        let result = self
            .client
            .submit(
                HttpMethod::Put,
                &addressing::port_action_path(port_id, "notify"),
                Some(json!({ "device_id": device_id, "event": event })),
            )
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(port_id, device_id, %event, "Sent port event");
                Ok(())
            }
            Err(e) => Err(self.observe_failure(e)),
        }
    }

    fn observe_failure(&mut self, err: GluonError) -> GluonError {
        if matches!(
            err,
            GluonError::Unauthorized { .. } | GluonError::Conflict { .. }
        ) {
            tracing::warn!(backend = %self.name, "Registration may have been lost: {}", err);
            self.registered = false;
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::addressing::ResourceEndpoint;
    use crate::domain::ports::{TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replays canned statuses and records what was sent.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        statuses: Arc<Mutex<VecDeque<u16>>>,
        sent: Arc<Mutex<Vec<TransportRequest>>>,
    }

    impl ScriptedTransport {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
                sent: Arc::default(),
            }
        }

        fn sent(&self) -> Vec<TransportRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
            self.sent.lock().unwrap().push(request);
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
            Ok(TransportResponse {
                status,
                body: Vec::new(),
            })
        }
    }

    fn api(transport: ScriptedTransport, options: NetworkServiceOptions) -> NetworkServiceApi<ScriptedTransport> {
        let client = GluonClient::new(ResourceEndpoint::new("http://gluon/"), transport);
        NetworkServiceApi::with_options(client, "neutron", "http://svc/", options).unwrap()
    }

    fn no_retry() -> NetworkServiceOptions {
        NetworkServiceOptions {
            registration_retry: RetryPolicy::none(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_sets_flag_only_on_created() {
        let transport = ScriptedTransport::new(&[200]);
        let mut service = api(transport.clone(), no_retry());
        service.register().await.unwrap();
        assert!(!service.is_registered());

        let transport = ScriptedTransport::new(&[201]);
        let mut service = api(transport.clone(), no_retry());
        service.register().await.unwrap();
        assert!(service.is_registered());

        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, "http://gluon/backends");
        assert_eq!(
            sent[0].body,
            Some(json!({"name": "neutron", "service_type": "neutron", "url": "http://svc/"}))
        );
    }

    #[tokio::test]
    async fn test_register_retries_while_gluon_starts() {
        let transport = ScriptedTransport::new(&[503, 503, 201]);
        let options = NetworkServiceOptions {
            registration_retry: RetryPolicy::default()
                .with_max_attempts(3)
                .with_backoff(Duration::ZERO, Duration::ZERO),
            ..Default::default()
        };
        let mut service = api(transport.clone(), options);

        service.register().await.unwrap();
        assert!(service.is_registered());
        assert_eq!(transport.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_default_options_register_once() {
        let transport = ScriptedTransport::new(&[503]);
        let mut service = api(transport.clone(), NetworkServiceOptions::default());

        assert!(matches!(
            service.register().await,
            Err(GluonError::ServiceUnavailable { .. })
        ));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_registration_still_announces() {
        let transport = ScriptedTransport::new(&[409, 201, 403, 204]);
        let mut service = api(transport.clone(), no_retry());

        service.notify_create("123").await.unwrap();
        assert!(!service.is_registered());

        service.notify_delete("123").await.unwrap();

        let sent: Vec<(HttpMethod, String)> = transport
            .sent()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect();
        assert_eq!(
            sent,
            vec![
                (HttpMethod::Post, "http://gluon/backends".to_string()),
                (HttpMethod::Post, "http://gluon/backends/neutron/ports".to_string()),
                (HttpMethod::Post, "http://gluon/backends".to_string()),
                (HttpMethod::Delete, "http://gluon/backends/neutron/ports/123".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_register_conflict_is_benign_when_configured() {
        let transport = ScriptedTransport::new(&[409]);
        let mut service = api(transport, no_retry());
        assert!(matches!(
            service.register().await,
            Err(GluonError::Conflict { .. })
        ));
        assert!(!service.is_registered());

        let transport = ScriptedTransport::new(&[409]);
        let options = NetworkServiceOptions {
            ignore_already_present: true,
            ..no_retry()
        };
        let mut service = api(transport, options);
        service.register().await.unwrap();
        assert!(service.is_registered());
    }

    #[tokio::test]
    async fn test_notify_registers_once() {
        let transport = ScriptedTransport::new(&[201, 201, 201]);
        let mut service = api(transport.clone(), no_retry());

        service.notify_create("123").await.unwrap();
        service.notify_create("124").await.unwrap();

        let urls: Vec<String> = transport.sent().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://gluon/backends",
                "http://gluon/backends/neutron/ports",
                "http://gluon/backends/neutron/ports",
            ]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_rearms_registration() {
        let transport = ScriptedTransport::new(&[201, 401, 201, 200]);
        let mut service = api(transport.clone(), no_retry());

        let err = service.notify_delete("123").await.unwrap_err();
        assert!(matches!(err, GluonError::Unauthorized { .. }));
        assert!(!service.is_registered());

        service.notify_delete("123").await.unwrap();
        let sent = transport.sent();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2].url, "http://gluon/backends");
        assert_eq!(sent[3].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_delete_not_found_depends_on_option() {
        let transport = ScriptedTransport::new(&[201, 404]);
        let mut service = api(transport, no_retry());
        assert!(matches!(
            service.notify_delete("gone").await,
            Err(GluonError::NotFound { .. })
        ));
        assert!(service.is_registered());

        let transport = ScriptedTransport::new(&[201, 404]);
        let options = NetworkServiceOptions {
            ignore_already_absent: true,
            ..no_retry()
        };
        let mut service = api(transport, options);
        service.notify_delete("gone").await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_event_body() {
        let transport = ScriptedTransport::new(&[201, 200]);
        let mut service = api(transport.clone(), no_retry());

        service
            .notify_event("vm1", "456", PortEvent::VifPlugged)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[1].method, HttpMethod::Put);
        assert_eq!(sent[1].url, "http://gluon/ports/456/notify");
        assert_eq!(
            sent[1].body,
            Some(json!({"device_id": "vm1", "event": "network-vif-plugged"}))
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_issue_no_request() {
        let transport = ScriptedTransport::new(&[]);
        let mut service = api(transport.clone(), no_retry());

        assert!(matches!(
            service.notify_create("").await,
            Err(GluonError::InvalidArgument { .. })
        ));
        assert!(matches!(
            service.notify_event("", "456", PortEvent::VifDeleted).await,
            Err(GluonError::InvalidArgument { .. })
        ));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_rejects_bad_service_name() {
        let client = GluonClient::new(
            ResourceEndpoint::new("http://gluon/"),
            ScriptedTransport::default(),
        );
        assert!(NetworkServiceApi::new(client.clone(), "a/b", "http://svc/").is_err());
        assert!(matches!(
            NetworkServiceApi::new(client, "neutron", " "),
            Err(GluonError::InvalidArgument { .. })
        ));
    }
}
