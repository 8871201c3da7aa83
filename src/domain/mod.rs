// Domain layer: core models, ports (interfaces) and the pure pipeline stages.

pub mod model;
pub mod ports;

pub mod services;
