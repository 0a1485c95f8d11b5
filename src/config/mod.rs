#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_endpoint, validate_positive_number, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2704/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Where the Gluon server is and how long to wait for it, after merging
/// flags, environment and configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_endpoint("endpoint", &self.endpoint)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)
    }
}
