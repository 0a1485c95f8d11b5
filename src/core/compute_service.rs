use crate::core::addressing;
use crate::core::client::GluonClient;
use crate::core::reader::PortReader;
use crate::domain::model::{Binding, Port, VnicDetails};
use crate::domain::ports::{HttpMethod, Transport};
use crate::utils::error::{GluonError, Result};
use crate::utils::validation::{validate_argument, validate_path_segment};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
struct BindPayload<'a> {
    device_owner: &'a str,
    zone: &'a str,
    device_id: &'a str,
    host_id: &'a str,
    /// JSON-encoded `BindingProfile`; absent when there are no hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<String>,
}

/// The compute-service side of the protocol: binds ports to hosts on
/// behalf of the devices (VMs) this service manages.
pub struct ComputeServiceApi<T: Transport> {
    client: GluonClient<T>,
    name: String,
}

impl<T: Transport> ComputeServiceApi<T> {
    pub fn new(client: GluonClient<T>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_argument("name", &name)?;
        Ok(Self { client, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ports(&self) -> PortReader<'_, T> {
        self.client.ports()
    }

    /// Binds a port to `binding.host_id` with this service as owner.
    pub async fn bind(&self, port_id: &str, binding: &Binding) -> Result<()> {
        validate_path_segment("port_id", port_id)?;
        validate_argument("zone", &binding.zone)?;
        validate_argument("device_id", &binding.device_id)?;
        validate_argument("host_id", &binding.host_id)?;
        if let Some(factor) = binding.profile.rxtx_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(GluonError::InvalidArgument {
                    field: "rxtx_factor".to_string(),
                    reason: format!("must be a positive number, got {}", factor),
                });
            }
        }

        let profile = if binding.profile.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&binding.profile)?)
        };
        let payload = BindPayload {
            device_owner: &self.name,
            zone: &binding.zone,
            device_id: &binding.device_id,
            host_id: &binding.host_id,
            profile,
        };

        self.client
            .submit(
                HttpMethod::Put,
                &addressing::port_action_path(port_id, "bind"),
                Some(serde_json::to_value(&payload)?),
            )
            .await?;

        tracing::info!(
            port_id,
            device_id = %binding.device_id,
            host_id = %binding.host_id,
            "Bound port"
        );
        Ok(())
    }

    pub async fn unbind(&self, port_id: &str) -> Result<()> {
        validate_path_segment("port_id", port_id)?;
        self.client
            .submit(
                HttpMethod::Put,
                &addressing::port_action_path(port_id, "unbind"),
                Some(json!({})),
            )
            .await?;

        tracing::info!(port_id, "Unbound port");
        Ok(())
    }

    pub async fn get_port(&self, port_id: &str) -> Result<Port> {
        self.ports().get_port(port_id, None).await
    }

    pub async fn is_unbound(&self, port_id: &str) -> Result<bool> {
        self.ports().is_unbound(port_id).await
    }

    /// Vnic type (default `normal`) and physical network of a port.
    pub async fn get_vnic_details(&self, port_id: &str) -> Result<VnicDetails> {
        let port = self.get_port(port_id).await?;
        Ok(VnicDetails::from(&port))
    }

    /// Ports attached to a device through this service.
    ///
    /// Not implemented yet: always returns an empty list without
    /// contacting Gluon, and says so in the log.
    pub async fn ports_by_device(&self, device_id: &str) -> Result<Vec<Port>> {
        validate_argument("device_id", device_id)?;
        tracing::warn!(device_id, "ports_by_device is not implemented; returning no ports");
        Ok(Vec::new())
    }
}
