/// Base URL of a Gluon server. Resource URLs are the base followed
/// directly by the relative path; nothing is normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEndpoint {
    base: String,
}

impl ResourceEndpoint {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

pub fn ports_path() -> String {
    "ports".to_string()
}

pub fn port_path(port_id: &str) -> String {
    format!("ports/{}", port_id)
}

pub fn port_action_path(port_id: &str, action: &str) -> String {
    format!("ports/{}/{}", port_id, action)
}

pub fn backends_path() -> String {
    "backends".to_string()
}

pub fn backend_path(name: &str) -> String {
    format!("backends/{}", name)
}

pub fn backend_ports_path(name: &str) -> String {
    format!("backends/{}/ports", name)
}

pub fn backend_port_path(name: &str, port_id: &str) -> String {
    format!("backends/{}/ports/{}", name, port_id)
}
