//! Outbound application events.
//!
//! The [`DeskNode`](super::service::DeskNode) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, count in tests, ...).

use super::connectivity::ConnectivityState;
use crate::error::Error;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot finished its connectivity decision.
    Booted { force_ap: bool },

    /// The connectivity manager moved between states.
    ConnectivityChanged {
        from: ConnectivityState,
        to: ConnectivityState,
    },

    /// Registration with the remote authority was attempted.
    Registered { ok: bool },

    /// The local occupancy flag took a new acknowledged value.
    OccupancyChanged { occupied: bool },

    /// A read-back or write did not complete; the flag is unchanged.
    SyncFailed(Error),

    /// New credentials were committed from the portal.
    CredentialsSaved,

    /// Stored credentials were wiped from the portal.
    CredentialsReset,

    /// A portal save or reset did not commit.
    SaveFailed(Error),

    /// A restart was requested and will happen after `in_ms`.
    RestartScheduled { in_ms: u32 },
}
