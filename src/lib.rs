//! Desk occupancy node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod portal;

// Adapters and drivers carry a host simulation next to the ESP-IDF
// implementation, selected by cfg attributes inside each module.
pub mod adapters;
pub mod drivers;
