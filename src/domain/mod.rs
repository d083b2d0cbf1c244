// Domain layer: service models and the ports the engine and stores depend on.

pub mod model;
pub mod ports;
