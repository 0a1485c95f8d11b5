//! Read-only queries behind the diagnostic CLI. Results are rendered as
//! pretty-printed JSON.

use crate::core::client::GluonClient;
use crate::domain::model::PortFilter;
use crate::domain::ports::Transport;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticQuery {
    PortShow { port_id: String },
    PortUnbound { port_id: String },
    PortList { filter: PortFilter },
    BackendShow { name: String },
    BackendList,
}

pub async fn run_query<T: Transport>(client: &GluonClient<T>, query: &DiagnosticQuery) -> Result<String> {
    let ports = client.ports();
    let rendered = match query {
        DiagnosticQuery::PortShow { port_id } => {
            serde_json::to_string_pretty(&ports.get_port(port_id, None).await?)?
        }
        DiagnosticQuery::PortUnbound { port_id } => {
            serde_json::to_string_pretty(&ports.is_unbound(port_id).await?)?
        }
        DiagnosticQuery::PortList { filter } => {
            serde_json::to_string_pretty(&ports.list_ports(filter).await?)?
        }
        DiagnosticQuery::BackendShow { name } => {
            serde_json::to_string_pretty(&ports.get_backend(name).await?)?
        }
        DiagnosticQuery::BackendList => serde_json::to_string_pretty(&ports.list_backends().await?)?,
    };
    Ok(rendered)
}
