pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::{ClientSettings, TomlConfig};

pub use adapters::http::{connect, ReqwestTransport};
pub use crate::core::{
    addressing::ResourceEndpoint,
    client::GluonClient,
    compute_service::ComputeServiceApi,
    network_service::{NetworkServiceApi, NetworkServiceOptions},
    reader::PortReader,
    retry::RetryPolicy,
};
pub use domain::model::{
    Backend, Binding, BindingProfile, Port, PortEvent, PortFilter, VnicDetails,
};
pub use utils::error::{GluonError, Result};
