// Domain layer: wire records and the seams (transport, configuration) the core depends on.

pub mod model;
pub mod ports;
