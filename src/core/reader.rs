use crate::core::addressing;
use crate::core::client::GluonClient;
use crate::core::fault;
use crate::domain::model::{Backend, Port, PortFilter};
use crate::domain::ports::Transport;
use crate::utils::error::Result;
use crate::utils::validation::validate_path_segment;

/// Read API over ports and backends.
///
/// Borrowed from a [`GluonClient`]; both service roles hand out the same
/// view instead of re-implementing lookups.
pub struct PortReader<'a, T: Transport> {
    client: &'a GluonClient<T>,
}

impl<'a, T: Transport> PortReader<'a, T> {
    pub fn new(client: &'a GluonClient<T>) -> Self {
        Self { client }
    }

    /// Fetches one port, optionally from a backend's own namespace.
    ///
    /// A 404 surfaces as `PortNotFound`.
    pub async fn get_port(&self, port_id: &str, backend: Option<&str>) -> Result<Port> {
        validate_path_segment("port_id", port_id)?;
        let path = match backend {
            Some(backend) => {
                validate_path_segment("backend", backend)?;
                addressing::backend_port_path(backend, port_id)
            }
            None => addressing::port_path(port_id),
        };

        self.client
            .fetch(&path)
            .await
            .map_err(|e| fault::port_lookup(e, port_id))
    }

    pub async fn get_backend(&self, name: &str) -> Result<Backend> {
        validate_path_segment("backend", name)?;
        self.client.fetch(&addressing::backend_path(name)).await
    }

    /// Fetches every port and filters on the client side, keeping order.
    pub async fn list_ports(&self, filter: &PortFilter) -> Result<Vec<Port>> {
        if let Some(backend) = &filter.backend {
            tracing::debug!(backend = %backend, "Backend filter has no effect on port listing");
        }

        let ports: Vec<Port> = self.client.fetch(&addressing::ports_path()).await?;
        let total = ports.len();
        let matching: Vec<Port> = ports.into_iter().filter(|p| filter.matches(p)).collect();

        tracing::debug!("Listed {} ports, {} after filtering", total, matching.len());
        Ok(matching)
    }

    pub async fn list_all_ports(&self) -> Result<Vec<Port>> {
        self.list_ports(&PortFilter::all()).await
    }

    pub async fn list_backends(&self) -> Result<Vec<Backend>> {
        self.client.fetch(&addressing::backends_path()).await
    }

    pub async fn is_unbound(&self, port_id: &str) -> Result<bool> {
        Ok(self.get_port(port_id, None).await?.is_unbound())
    }
}
