//! Connectivity manager: sole owner of the radio mode.
//!
//! ```text
//!  Disconnected ──connect()──▶ Connecting ──link up──▶ Connected
//!        ▲                          │                      │
//!        │                    budget spent                 │ link lost
//!        │                          ▼                      ▼
//!        └──close_access_point── AccessPointActive ◀── Disconnected
//! ```
//!
//! The join loop is the only place the manager blocks.  It sleeps through
//! [`ClockPort::sleep_ms`] and is bounded by [`JoinPolicy::max_attempts`].
//! Once the access point is up there is no live reconnection; a restart
//! re-evaluates the stored credentials.

use log::{error, info, warn};

use super::credentials::Credentials;
use super::ports::{ClockPort, RadioPort};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Disconnected,
    Connecting,
    Connected,
    AccessPointActive,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::AccessPointActive => "access-point",
        }
    }
}

/// Join status polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPolicy {
    pub poll_interval_ms: u32,
    pub max_attempts: u32,
}

pub struct ConnectivityManager {
    state: ConnectivityState,
    ap_ssid: heapless::String<32>,
    ap_active: bool,
    policy: JoinPolicy,
    last_join_polls: u32,
}

impl ConnectivityManager {
    pub fn new(ap_ssid: &str, policy: JoinPolicy) -> Self {
        let mut ssid = heapless::String::new();
        for c in ap_ssid.chars() {
            if ssid.push(c).is_err() {
                break;
            }
        }
        Self {
            state: ConnectivityState::Disconnected,
            ap_ssid: ssid,
            ap_active: false,
            policy,
            last_join_polls: 0,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectivityState::Connected
    }

    pub fn ap_ssid(&self) -> &str {
        &self.ap_ssid
    }

    /// Poll iterations spent by the most recent join attempt.
    pub fn last_join_polls(&self) -> u32 {
        self.last_join_polls
    }

    /// Join the configured network, or fall back to the access point.
    pub fn connect(
        &mut self,
        creds: &Credentials,
        radio: &mut impl RadioPort,
        clock: &mut impl ClockPort,
    ) -> ConnectivityState {
        self.last_join_polls = 0;

        if !creds.is_configured() {
            info!("WiFi: no credentials stored, opening access point");
            self.open_access_point(radio);
            return self.state;
        }

        match self.join(creds, radio, clock) {
            Ok(polls) => {
                info!("WiFi: joined '{}' after {} polls", creds.ssid(), polls);
                self.state = ConnectivityState::Connected;
            }
            Err(e) => {
                error!("WiFi: join of '{}' failed: {}", creds.ssid(), e);
                self.state = ConnectivityState::Disconnected;
                self.open_access_point(radio);
            }
        }
        self.state
    }

    fn join(
        &mut self,
        creds: &Credentials,
        radio: &mut impl RadioPort,
        clock: &mut impl ClockPort,
    ) -> Result<u32, Error> {
        radio.disconnect();
        radio.set_station_mode()?;
        self.ap_active = false;
        if let Err(e) = radio.set_hostname(creds.dev_id()) {
            warn!("WiFi: hostname '{}' not applied: {}", creds.dev_id(), e);
        }
        radio.begin_join(creds.ssid(), creds.pass())?;
        self.state = ConnectivityState::Connecting;

        for attempt in 1..=self.policy.max_attempts {
            clock.sleep_ms(self.policy.poll_interval_ms);
            self.last_join_polls = attempt;
            if radio.is_connected() {
                return Ok(attempt);
            }
        }
        Err(Error::JoinTimeout {
            polls: self.policy.max_attempts,
        })
    }

    /// Bring the access point up.  No-op while it is already up.
    ///
    /// Returns whether the access point is active afterwards.  A failed
    /// switch leaves it inactive so the next call tries again.
    pub fn open_access_point(&mut self, radio: &mut impl RadioPort) -> bool {
        if self.ap_active {
            return true;
        }
        match radio.start_access_point(&self.ap_ssid) {
            Ok(()) => {
                info!("WiFi: access point '{}' up", self.ap_ssid);
                self.ap_active = true;
                self.state = ConnectivityState::AccessPointActive;
            }
            Err(e) => {
                warn!("WiFi: access point '{}' failed: {}", self.ap_ssid, e);
            }
        }
        self.ap_active
    }

    /// Tear the access point down.  No-op while it is already down.
    ///
    /// Returns whether the access point is inactive afterwards.
    pub fn close_access_point(&mut self, radio: &mut impl RadioPort) -> bool {
        if !self.ap_active {
            return true;
        }
        match radio.stop_access_point() {
            Ok(()) => {
                info!("WiFi: access point '{}' down", self.ap_ssid);
                self.ap_active = false;
                if self.state == ConnectivityState::AccessPointActive {
                    self.state = ConnectivityState::Disconnected;
                }
            }
            Err(e) => {
                warn!("WiFi: access point shutdown failed: {}", e);
            }
        }
        !self.ap_active
    }

    /// Refresh the state from the radio.  Only detects link loss.
    pub fn poll(&mut self, radio: &impl RadioPort) -> ConnectivityState {
        if self.state == ConnectivityState::Connected && !radio.is_connected() {
            warn!("WiFi: link lost");
            self.state = ConnectivityState::Disconnected;
        }
        self.state
    }
}
