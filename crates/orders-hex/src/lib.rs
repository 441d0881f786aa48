//! orders-hex: order orchestration core (application service) plus its inbound HTTP adapter.

pub mod config;
pub mod errors;

pub mod application;

pub use orders_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
