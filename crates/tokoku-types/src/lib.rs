//! tokoku-types: marketplace domain model and the ports adapters implement.

pub mod domain;
pub mod ports;
