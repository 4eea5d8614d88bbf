// Domain layer: deployment models and the platform ports they are reconciled through.

pub mod model;
pub mod ports;
