pub mod addressing;
pub mod client;
pub mod compute_service;
pub mod fault;
pub mod network_service;
pub mod reader;
pub mod retry;

pub use crate::domain::model::{
    Backend, BackendRegistration, Binding, BindingProfile, Port, PortEvent, PortFilter,
    VnicDetails,
};
pub use crate::domain::ports::{ConfigProvider, HttpMethod, Transport, TransportRequest, TransportResponse};
pub use crate::utils::error::Result;
