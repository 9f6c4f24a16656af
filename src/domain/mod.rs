// Domain layer: value records returned by the API and the ports the client is built against.

pub mod model;
pub mod ports;
