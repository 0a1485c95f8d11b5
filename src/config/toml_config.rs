use crate::config::{ClientSettings, DEFAULT_TIMEOUT_SECONDS};
use crate::core::network_service::NetworkServiceOptions;
use crate::core::retry::RetryPolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GluonError, Result};
use crate::utils::validation::{
    validate_endpoint, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub gluon: GluonSection,
    pub network_service: Option<NetworkServiceSection>,
    pub compute_service: Option<ComputeServiceSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GluonSection {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkServiceSection {
    pub name: String,
    /// Callback URL Gluon uses to reach the network service.
    pub url: String,
    pub ignore_already_absent: Option<bool>,
    pub ignore_already_present: Option<bool>,
    pub registration: Option<RegistrationSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationSection {
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeServiceSection {
    pub name: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GluonError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${NAME}` from the environment. A reference to an unset
    /// variable stays in the text so validation reports it verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let reference = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            GluonError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            }
        })?;

        let expanded = reference.replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        });
        Ok(expanded.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_endpoint("gluon.endpoint", &self.gluon.endpoint)?;
        if let Some(timeout) = self.gluon.timeout_seconds {
            validate_positive_number("gluon.timeout_seconds", timeout, 1)?;
        }

        if let Some(network) = &self.network_service {
            validate_non_empty_string("network_service.name", &network.name)?;
            validate_url("network_service.url", &network.url)?;
            if let Some(attempts) = network.registration.as_ref().and_then(|r| r.max_attempts) {
                validate_positive_number(
                    "network_service.registration.max_attempts",
                    u64::from(attempts),
                    1,
                )?;
            }
        }

        if let Some(compute) = &self.compute_service {
            validate_non_empty_string("compute_service.name", &compute.name)?;
        }

        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.gluon.endpoint.clone(),
            timeout_seconds: self.gluon.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn network_service_options(&self) -> NetworkServiceOptions {
        let Some(network) = &self.network_service else {
            return NetworkServiceOptions::default();
        };

        // Backoff is opt-in: without a [network_service.registration] table
        // registration is tried once per call.
        let retry = match &network.registration {
            None => RetryPolicy::none(),
            Some(registration) => {
                let defaults = RetryPolicy::default();
                RetryPolicy {
                    max_attempts: registration.max_attempts.unwrap_or(defaults.max_attempts),
                    initial_backoff: registration
                        .initial_backoff_ms
                        .map_or(defaults.initial_backoff, Duration::from_millis),
                    max_backoff: registration
                        .max_backoff_ms
                        .map_or(defaults.max_backoff, Duration::from_millis),
                    ..defaults
                }
            }
        };

        NetworkServiceOptions {
            ignore_already_absent: network.ignore_already_absent.unwrap_or(false),
            ignore_already_present: network.ignore_already_present.unwrap_or(false),
            registration_retry: retry,
        }
    }

    pub fn require_network_service(&self) -> Result<&NetworkServiceSection> {
        self.network_service
            .as_ref()
            .ok_or_else(|| GluonError::MissingConfig {
                field: "network_service".to_string(),
            })
    }

    pub fn require_compute_service(&self) -> Result<&ComputeServiceSection> {
        self.compute_service
            .as_ref()
            .ok_or_else(|| GluonError::MissingConfig {
                field: "compute_service".to_string(),
            })
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.gluon.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.gluon.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
