//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Booted { force_ap } => {
                info!("BOOT  | force_ap={}", force_ap);
            }
            AppEvent::ConnectivityChanged { from, to } => {
                info!("CONN  | {} -> {}", from.as_str(), to.as_str());
            }
            AppEvent::Registered { ok } => {
                info!("CONN  | registration {}", if *ok { "acknowledged" } else { "failed" });
            }
            AppEvent::OccupancyChanged { occupied } => {
                info!("DESK  | {}", if *occupied { "occupied" } else { "free" });
            }
            AppEvent::SyncFailed(e) => {
                warn!("DESK  | sync failed: {}", e);
            }
            AppEvent::CredentialsSaved => {
                info!("CFG   | credentials saved, restart to apply");
            }
            AppEvent::CredentialsReset => {
                info!("CFG   | credentials wiped, restart to apply");
            }
            AppEvent::SaveFailed(e) => {
                warn!("CFG   | save failed: {}", e);
            }
            AppEvent::RestartScheduled { in_ms } => {
                info!("SYS   | restart in {} ms", in_ms);
            }
        }
    }
}
