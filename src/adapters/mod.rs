//! Adapters - concrete implementations of the ports.

pub mod blueprint;
pub mod http;
pub mod memory;
pub mod nlu;
pub mod plugins;
pub mod presenter;
