// Domain layer: energy analytics models and the ports the core talks through.

pub mod clock;
pub mod model;
pub mod ports;
