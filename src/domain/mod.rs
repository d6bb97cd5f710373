// Domain layer: canonical contact models and source ports.

pub mod model;
pub mod ports;
