//! Device configuration parameters
//!
//! All tunable timing and endpoint parameters for the desk node.
//! Network credentials are NOT part of this struct; they live in the
//! [`CredentialStore`](crate::app::credentials::CredentialStore).

use serde::{Deserialize, Serialize};

/// Remote authority base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://desk-occcpancy-manager.azurewebsites.net/api";

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Remote authority ---
    /// Base URL of the occupancy API (no trailing slash needed)
    pub api_base_url: String,
    /// Attempts per read/write before giving up
    pub http_max_attempts: u8,
    /// Fixed delay between HTTP attempts (milliseconds)
    pub http_retry_delay_ms: u32,
    /// Transport timeout of a single HTTP request (milliseconds)
    pub http_timeout_ms: u32,
    /// Minimum time between status read-backs (milliseconds)
    pub refresh_interval_ms: u32,

    // --- WiFi join ---
    /// Interval between join status polls (milliseconds)
    pub join_poll_interval_ms: u32,
    /// Join status polls before falling back to the access point
    pub join_max_attempts: u32,
    /// Prefix of the fallback access-point SSID
    pub ap_ssid_prefix: String,

    // --- Indicator ---
    /// Brightness change per breathing tick
    pub breathe_step: u8,
    /// Breathing tick period (milliseconds)
    pub breathe_tick_ms: u32,

    // --- Portal / system ---
    /// TCP port of the local configuration portal
    pub portal_port: u16,
    /// Delay between answering a restart request and restarting (milliseconds)
    pub restart_delay_ms: u32,
    /// Main loop period (milliseconds)
    pub loop_interval_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Remote
            api_base_url: DEFAULT_API_BASE_URL.into(),
            http_max_attempts: 3,
            http_retry_delay_ms: 1000,
            http_timeout_ms: 5000,
            refresh_interval_ms: 30_000, // 30 s

            // Join
            join_poll_interval_ms: 500,
            join_max_attempts: 60, // ≈30 s ceiling
            ap_ssid_prefix: "DOM-".into(),

            // Indicator
            breathe_step: 5,
            breathe_tick_ms: 25,

            // Portal / system
            portal_port: 80,
            restart_delay_ms: 3000,
            loop_interval_ms: 10,
            watchdog_timeout_ms: 60_000,
        }
    }
}

impl DeviceConfig {
    /// Longest single blocking wait the core can perform: the join loop.
    pub fn join_budget_ms(&self) -> u64 {
        self.join_poll_interval_ms as u64 * self.join_max_attempts as u64
    }

    /// Worst case of one exhausted HTTP retry sequence: every attempt
    /// times out and every gap is slept.
    pub fn http_budget_ms(&self) -> u64 {
        let attempts = self.http_max_attempts as u64;
        self.http_timeout_ms as u64 * attempts
            + self.http_retry_delay_ms as u64 * attempts.saturating_sub(1)
    }

    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err("api_base_url must start with http:// or https://");
        }
        if !(1..=10).contains(&self.http_max_attempts) {
            return Err("http_max_attempts must be 1–10");
        }
        if self.http_retry_delay_ms > 10_000 {
            return Err("http_retry_delay_ms must be at most 10000");
        }
        if !(500..=30_000).contains(&self.http_timeout_ms) {
            return Err("http_timeout_ms must be 500–30000");
        }
        if !(1_000..=3_600_000).contains(&self.refresh_interval_ms) {
            return Err("refresh_interval_ms must be 1000–3600000");
        }
        if !(50..=5_000).contains(&self.join_poll_interval_ms) {
            return Err("join_poll_interval_ms must be 50–5000");
        }
        if !(1..=600).contains(&self.join_max_attempts) {
            return Err("join_max_attempts must be 1–600");
        }
        if self.ap_ssid_prefix.len() > 20 {
            return Err("ap_ssid_prefix must be at most 20 bytes");
        }
        if self.breathe_step == 0 {
            return Err("breathe_step must be non-zero");
        }
        if self.breathe_tick_ms == 0 {
            return Err("breathe_tick_ms must be non-zero");
        }
        if self.watchdog_timeout_ms as u64 <= self.join_budget_ms()
            || self.watchdog_timeout_ms as u64 <= self.http_budget_ms()
        {
            return Err("watchdog_timeout_ms must exceed every bounded wait");
        }
        Ok(())
    }
}
