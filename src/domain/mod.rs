// Domain layer: core models, ports and the pure frequency logic. Adapters live under `crate::adapters`.

pub mod color;
pub mod model;
pub mod palette;
pub mod ports;
pub mod services;
