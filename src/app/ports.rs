//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeskNode (domain)
//! ```
//!
//! Driven adapters (radio, HTTP client, byte store, status LED, clock,
//! event sinks) implement these traits.  The [`DeskNode`](super::service::DeskNode)
//! and its components consume them via generics, so the domain core never
//! touches hardware or the network stack directly.
//!
//! ## Ownership rules
//!
//! - **RadioPort** is driven only by the
//!   [`ConnectivityManager`](super::connectivity::ConnectivityManager).
//!   No other component may switch radio mode.
//! - **ByteStorePort** writes are staged until [`ByteStorePort::commit`];
//!   a failed commit MUST leave the durable contents untouched.
//! - **ClockPort::sleep_ms** is the only way the core blocks.  Every caller
//!   bounds the number of sleeps it performs.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain ↔ WiFi stack)
// ───────────────────────────────────────────────────────────────

/// The wireless radio.  Station and access-point mode are mutually exclusive.
pub trait RadioPort {
    /// Drop any existing association (station or access point).
    fn disconnect(&mut self);

    /// Switch the radio into station (client) mode.
    fn set_station_mode(&mut self) -> Result<(), RadioError>;

    /// Host name announced over DHCP while in station mode.
    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError>;

    /// Issue a join request.  Returns as soon as the request is accepted;
    /// the outcome is observed through [`RadioPort::is_connected`].
    fn begin_join(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError>;

    /// Whether the station link is up and has an address.
    fn is_connected(&self) -> bool;

    /// Switch the radio into access-point mode advertising `ssid` (open network).
    fn start_access_point(&mut self, ssid: &str) -> Result<(), RadioError>;

    /// Tear down the access point.
    fn stop_access_point(&mut self) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// HTTP port (driven adapter: domain → remote authority)
// ───────────────────────────────────────────────────────────────

/// A completed HTTP exchange.  Any status code is a completed exchange;
/// interpreting it is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal blocking HTTP client.  Implementations MUST apply their own
/// transport timeout so a call always returns.
pub trait HttpPort {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError>;
}

// ───────────────────────────────────────────────────────────────
// Byte store port (driven adapter: domain ↔ NVS / EEPROM)
// ───────────────────────────────────────────────────────────────

/// Fixed-size persistent byte region, EEPROM style.
///
/// Writes land in a staging image.  [`commit`](Self::commit) makes the
/// staging image durable in one step; [`rollback`](Self::rollback) throws
/// it away and restores the last committed contents.
pub trait ByteStorePort {
    /// Total capacity in bytes.
    fn capacity(&self) -> usize;

    /// Read `buf.len()` bytes starting at `offset` from the staging image.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError>;

    /// Stage `data` at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError>;

    /// Persist the staging image.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discard staged writes.
    fn rollback(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// Single addressable RGB indicator.
pub trait IndicatorPort {
    fn set_colour(&mut self, r: u8, g: u8, b: u8);
    fn set_brightness(&mut self, brightness: u8);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ system timer)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source plus the bounded busy-wait used by retry loops.
/// Tests inject a fake clock so no real time passes.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`RadioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// SSID does not fit the driver's configuration buffer.
    InvalidSsid,
    /// Passphrase does not fit the driver's configuration buffer.
    InvalidPassphrase,
    /// The driver rejected a mode switch.
    ModeSwitchFailed,
    /// The driver rejected the join request.
    JoinRejected,
    /// Host name could not be applied to the station interface.
    HostnameRejected,
}

/// Errors from [`HttpPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// Could not open a connection to the host.
    Connect,
    /// The transport timed out.
    Timeout,
    /// The request URL was rejected by the client.
    InvalidUrl,
    /// Reading the response body failed.
    Read,
}

/// Errors from [`ByteStorePort`] operations and credential persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Offset + length falls outside the store.
    OutOfRange,
    /// The staging image could not be made durable.
    CommitFailed,
    /// Generic I/O error from the storage backend.
    IoError,
    /// A value failed validation before it was staged.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID rejected by driver"),
            Self::InvalidPassphrase => write!(f, "passphrase rejected by driver"),
            Self::ModeSwitchFailed => write!(f, "radio mode switch failed"),
            Self::JoinRejected => write!(f, "join request rejected"),
            Self::HostnameRejected => write!(f, "hostname rejected"),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Timeout => write!(f, "request timed out"),
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::Read => write!(f, "response read failed"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "access outside store bounds"),
            Self::CommitFailed => write!(f, "commit failed"),
            Self::IoError => write!(f, "I/O error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
