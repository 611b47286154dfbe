// Domain layer: plain reservation data and the storage port.

pub mod model;
pub mod ports;
