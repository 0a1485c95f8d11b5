use crate::app::diagnostics::DiagnosticQuery;
use crate::config::{ClientSettings, TomlConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::model::PortFilter;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "gluon")]
#[command(about = "Connect to a Gluon server and retrieve information.")]
pub struct CliConfig {
    /// Base URL of the Gluon server, ending with '/'
    #[arg(long, env = "GLUON_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the details of one port.
    PortShow {
        /// The UUID of the port.
        #[arg(value_name = "port-id")]
        port_id: String,
    },
    /// Show if a port is not bound to a VM.
    PortUnbound {
        /// The UUID of the port.
        #[arg(value_name = "port-id")]
        port_id: String,
    },
    /// List all the ports in the system or for one backend.
    PortList {
        /// The name of the backend.
        #[arg(long)]
        backend: Option<String>,
        /// The name of the owner (for bound ports).
        #[arg(long)]
        owner: Option<String>,
        /// The id of the device using the port.
        #[arg(long)]
        device: Option<String>,
    },
    /// Show the details of a backend.
    BackendShow {
        /// The name of the backend.
        backend: String,
    },
    /// List all the backends registered with the system.
    BackendList,
}

impl CliConfig {
    /// Flags and environment win over the configuration file, which wins
    /// over built-in defaults.
    pub fn settings(&self) -> Result<ClientSettings> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| file.as_ref().map(|f| f.gluon.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout_seconds = self
            .timeout_seconds
            .or_else(|| file.as_ref().and_then(|f| f.gluon.timeout_seconds))
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        let settings = ClientSettings {
            endpoint,
            timeout_seconds,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl From<&Command> for DiagnosticQuery {
    fn from(command: &Command) -> Self {
        match command {
            Command::PortShow { port_id } => DiagnosticQuery::PortShow {
                port_id: port_id.clone(),
            },
            Command::PortUnbound { port_id } => DiagnosticQuery::PortUnbound {
                port_id: port_id.clone(),
            },
            Command::PortList {
                backend,
                owner,
                device,
            } => DiagnosticQuery::PortList {
                filter: PortFilter {
                    backend: backend.clone(),
                    owner: owner.clone(),
                    device: device.clone(),
                },
            },
            Command::BackendShow { backend } => DiagnosticQuery::BackendShow {
                name: backend.clone(),
            },
            Command::BackendList => DiagnosticQuery::BackendList,
        }
    }
}
