//! Unified error types for the desk occupancy firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! main loop's error handling uniform.  All variants are `Copy` so they can
//! be carried inside [`AppEvent`](crate::app::events::AppEvent)s without
//! allocation.
//!
//! None of these are fatal.  The worst outcome of any of them is "stay in
//! the last confirmed state and try again on the next tick or user action".

use core::fmt;

use crate::app::ports::{HttpError, RadioError, StoreError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The join poll budget ran out without a link.  Recovered by falling
    /// back to access-point mode.
    JoinTimeout { polls: u32 },
    /// The remote authority did not acknowledge within the retry budget.
    /// Recovered by keeping the local flag and waiting for the next refresh.
    RemoteUnavailable {
        attempts: u8,
        last_status: Option<u16>,
    },
    /// The remote authority answered but the body carried no status token.
    MalformedStatus,
    /// A persistent write did not commit.  The previous record is intact.
    StoreCommitFailure,
    /// A radio driver call failed.
    Radio(RadioError),
    /// An HTTP transport call failed.
    Http(HttpError),
    /// Any other storage failure.
    Store(StoreError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinTimeout { polls } => write!(f, "join timed out after {polls} polls"),
            Self::RemoteUnavailable {
                attempts,
                last_status: Some(code),
            } => write!(f, "remote unavailable after {attempts} attempts (last HTTP {code})"),
            Self::RemoteUnavailable {
                attempts,
                last_status: None,
            } => write!(f, "remote unavailable after {attempts} attempts (no response)"),
            Self::MalformedStatus => write!(f, "remote status body has no status token"),
            Self::StoreCommitFailure => write!(f, "store commit failed"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::CommitFailed => Self::StoreCommitFailure,
            other => Self::Store(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
