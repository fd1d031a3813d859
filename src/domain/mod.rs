// Domain layer: entities, store ports and the ranking rule. No I/O.

pub mod model;
pub mod ports;
pub mod ranking;
