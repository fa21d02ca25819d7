//! Infrastructure implementations.
//!
//! Ports plus the adapters the binary ships with: in-memory storage, the
//! standard content catalog, system clock and randomness, and settings.

pub mod catalog;
pub mod clock;
pub mod memory;
pub mod ports;
pub mod settings;
