#![allow(dead_code)]

use async_trait::async_trait;
use gluon_client::core::{HttpMethod, Transport, TransportRequest, TransportResponse};
use gluon_client::{GluonClient, ResourceEndpoint, Result};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const FAKE_BASE: &str = "http://fake-gluon/";

#[derive(Default)]
struct FakeState {
    ports: BTreeMap<String, Value>,
    port_backend: BTreeMap<String, String>,
    backends: BTreeMap<String, Value>,
    events: Vec<Value>,
    requests: Vec<TransportRequest>,
}

/// In-memory Gluon server that behaves the way the real one is expected
/// to for every resource the client touches.
#[derive(Clone, Default)]
pub struct FakeGluon {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGluon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> GluonClient<FakeGluon> {
        GluonClient::new(ResourceEndpoint::new(FAKE_BASE), self.clone())
    }

    pub fn with_port(self, port: Value) -> Self {
        let id = port["id"].as_str().expect("port id").to_string();
        self.state.lock().unwrap().ports.insert(id, port);
        self
    }

    pub fn backend(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().backends.get(name).cloned()
    }

    pub fn backend_count(&self) -> usize {
        self.state.lock().unwrap().backends.len()
    }

    pub fn events(&self) -> Vec<Value> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    fn handle(state: &mut FakeState, method: HttpMethod, path: &[&str], body: Option<Value>) -> (u16, Value) {
        let body = body.unwrap_or(Value::Null);
        match (method, path) {
            (HttpMethod::Get, ["ports"]) => (200, Value::Array(state.ports.values().cloned().collect())),
            (HttpMethod::Get, ["ports", id]) => match state.ports.get(*id) {
                Some(port) => (200, port.clone()),
                None => (404, json!({"message": format!("port {} not found", id)})),
            },
            (HttpMethod::Get, ["backends"]) => {
                (200, Value::Array(state.backends.values().cloned().collect()))
            }
            (HttpMethod::Get, ["backends", name]) => match state.backends.get(*name) {
                Some(backend) => (200, backend.clone()),
                None => (404, Value::Null),
            },
            (HttpMethod::Get, ["backends", name, "ports", id]) => {
                match (state.port_backend.get(*id), state.ports.get(*id)) {
                    (Some(owner), Some(port)) if owner.as_str() == *name => (200, port.clone()),
                    _ => (404, Value::Null),
                }
            }
            (HttpMethod::Post, ["backends"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                state.backends.insert(name, body);
                (201, Value::Null)
            }
            (HttpMethod::Post, ["backends", name, "ports"]) => {
                if !state.backends.contains_key(*name) {
                    return (404, Value::Null);
                }
                let id = body["id"].as_str().unwrap_or_default().to_string();
                if state.ports.contains_key(&id) {
                    return (409, json!({"message": "port exists"}));
                }
                state.ports.insert(id.clone(), json!({"id": id}));
                state.port_backend.insert(id, name.to_string());
                (201, Value::Null)
            }
            (HttpMethod::Delete, ["backends", name, "ports", id]) => {
                match state.port_backend.get(*id) {
                    Some(owner) if owner.as_str() == *name => {
                        state.port_backend.remove(*id);
                        state.ports.remove(*id);
                        (204, Value::Null)
                    }
                    _ => (404, Value::Null),
                }
            }
            (HttpMethod::Put, ["ports", id, "bind"]) => match state.ports.get_mut(*id) {
                Some(port) => {
                    for key in ["device_owner", "zone", "device_id", "host_id", "profile"] {
                        if let Some(value) = body.get(key) {
                            port[key] = value.clone();
                        }
                    }
                    (200, Value::Null)
                }
                None => (404, Value::Null),
            },
            (HttpMethod::Put, ["ports", id, "unbind"]) => match state.ports.get_mut(*id) {
                Some(port) => {
                    if let Value::Object(fields) = port {
                        for key in ["device_owner", "device_id", "host_id", "profile"] {
                            fields.remove(key);
                        }
                    }
                    (200, Value::Null)
                }
                None => (404, Value::Null),
            },
            (HttpMethod::Put, ["ports", id, "notify"]) => {
                let mut event = body;
                event["port_id"] = json!(id);
                state.events.push(event);
                (200, Value::Null)
            }
            _ => (400, json!({"message": "unsupported request"})),
        }
    }
}

#[async_trait]
impl Transport for FakeGluon {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let path = request.url.strip_prefix(FAKE_BASE).unwrap_or(&request.url);
        let segments: Vec<&str> = path.split('/').collect();
        let (status, body) = Self::handle(&mut state, request.method, &segments, request.body);

        let body = if body.is_null() {
            Vec::new()
        } else {
            serde_json::to_vec(&body).expect("serialize fake response")
        };
        Ok(TransportResponse { status, body })
    }
}

pub fn mock_client(server: &httpmock::MockServer) -> GluonClient<gluon_client::ReqwestTransport> {
    let settings = gluon_client::ClientSettings {
        endpoint: server.url("/"),
        timeout_seconds: 5,
    };
    gluon_client::connect(&settings).expect("client for mock server")
}
