//! Inbound commands to the application service.
//!
//! Input handlers (button, RFID reader) never touch the occupancy flag.
//! They queue one of these and the [`DeskNode`](super::service::DeskNode)
//! performs it on the next connected tick.

/// RFID tag code appended to a write request.
pub type TagCode = heapless::String<32>;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Mark the desk occupied, optionally attributing it to a tag.
    Occupy { tag: Option<TagCode> },

    /// Mark the desk free.
    Free,

    /// Flip the current flag (button press).
    Toggle,

    /// Read the remote flag now, ignoring the rate limit.
    RefreshNow,
}
