// Domain layer: state model, wire payloads, diagnostics and ports (interfaces).

pub mod diagnostics;
pub mod model;
pub mod ports;
pub mod wire;
