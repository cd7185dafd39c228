// Domain layer: heir model, exact fractions and ports. No I/O here.

pub mod fraction;
pub mod model;
pub mod ports;
