//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the desk node: the
//! connectivity decision, credential persistence, occupancy sync and the
//! indicator mapping.  All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod connectivity;
pub mod credentials;
pub mod events;
pub mod indicator;
pub mod occupancy;
pub mod ports;
pub mod remote;
pub mod retry;
pub mod service;
