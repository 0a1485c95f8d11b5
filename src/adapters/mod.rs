// Adapters layer: concrete implementations of the domain seams.

pub mod http;

pub use http::ReqwestTransport;
