// Domain layer: startup configuration, value types and the ports the wiring depends on.

pub mod model;
pub mod ports;
