//! Domain layer: pure types and logic, no I/O.

pub mod blueprint;
pub mod conversation;
pub mod foundation;
