//! tokoku-hex: marketplace API library (application services + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use tokoku_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
