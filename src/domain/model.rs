use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VNIC_TYPE_NORMAL: &str = "normal";

/// A virtual network attachment point as reported by Gluon.
///
/// Ports are created and destroyed by the backend; this client only
/// observes them and changes their binding sub-state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnic_type: Option<String>,
    /// Binding-time parameters, opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    #[serde(
        rename = "provider:physical_network",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_physical_network: Option<String>,
    /// Fields this client does not interpret, kept for display.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Port {
    /// A port is unbound iff nobody owns it.
    pub fn is_unbound(&self) -> bool {
        self.device_owner.as_deref().map_or(true, str::is_empty)
    }

    pub fn owner(&self) -> &str {
        self.device_owner.as_deref().unwrap_or("")
    }

    pub fn device(&self) -> &str {
        self.device_id.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Body of `POST backends`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendRegistration {
    pub name: String,
    pub service_type: String,
    pub url: String,
}

impl BackendRegistration {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            service_type: name.clone(),
            name,
            url: url.into(),
        }
    }
}

/// Lifecycle transitions a network service can signal for a device/port pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortEvent {
    #[serde(rename = "network-vif-unplugged")]
    VifUnplugged,
    #[serde(rename = "network-vif-plugged")]
    VifPlugged,
    #[serde(rename = "network-vif-deleted")]
    VifDeleted,
}

impl PortEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortEvent::VifUnplugged => "network-vif-unplugged",
            PortEvent::VifPlugged => "network-vif-plugged",
            PortEvent::VifDeleted => "network-vif-deleted",
        }
    }
}

impl std::fmt::Display for PortEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding hints passed through to the backend.
///
/// `pci_profile` and `rxtx_factor` are the keys compute services send
/// today. A PCI profile is usually a mapping but any JSON value passes
/// through untouched. Anything else a backend understands goes in `extra`, which is
/// merged into the same JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pci_profile: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rxtx_factor: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BindingProfile {
    pub fn is_empty(&self) -> bool {
        self.pci_profile.is_none() && self.rxtx_factor.is_none() && self.extra.is_empty()
    }
}

/// Arguments of a bind request, minus the owner (always the calling service).
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub zone: String,
    pub device_id: String,
    pub host_id: String,
    pub profile: BindingProfile,
}

impl Binding {
    pub fn new(
        zone: impl Into<String>,
        device_id: impl Into<String>,
        host_id: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            device_id: device_id.into(),
            host_id: host_id.into(),
            profile: BindingProfile::default(),
        }
    }

    pub fn with_pci_profile(mut self, pci_profile: impl Into<serde_json::Value>) -> Self {
        self.profile.pci_profile = Some(pci_profile.into());
        self
    }

    pub fn with_rxtx_factor(mut self, rxtx_factor: f64) -> Self {
        self.profile.rxtx_factor = Some(rxtx_factor);
        self
    }

    pub fn with_profile_hint(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.profile.extra.insert(key.into(), value);
        self
    }
}

/// Client-side criteria for `list_ports`.
///
/// `owner` wins over `device` when both are set. `backend` is carried
/// through but does not narrow the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortFilter {
    pub backend: Option<String>,
    pub owner: Option<String>,
    pub device: Option<String>,
}

impl PortFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn matches(&self, port: &Port) -> bool {
        if let Some(owner) = &self.owner {
            port.owner() == owner
        } else if let Some(device) = &self.device {
            port.device() == device
        } else {
            true
        }
    }
}

/// Binding-relevant attributes under role-neutral names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VnicDetails {
    pub vnic_type: String,
    pub physical_network: String,
}

impl From<&Port> for VnicDetails {
    fn from(port: &Port) -> Self {
        Self {
            vnic_type: port
                .vnic_type
                .clone()
                .unwrap_or_else(|| VNIC_TYPE_NORMAL.to_string()),
            physical_network: port.provider_physical_network.clone().unwrap_or_default(),
        }
    }
}
