// Domain layer: request/response models and the ports the studio depends on.

pub mod model;
pub mod ports;
