//! WiFi radio adapter.
//!
//! Implements [`RadioPort`], the hexagonal boundary for the radio.  The
//! [`ConnectivityManager`](crate::app::connectivity::ConnectivityManager)
//! is its only caller and decides when to switch modes.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side runs.
//!
//! `begin_join` only issues the connect request; the join loop polls
//! [`RadioPort::is_connected`] so the wait stays bounded by the caller.

use log::{info, warn};

use crate::app::ports::{RadioError, RadioPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, ClientConfiguration, Configuration, EspWifi,
};

// ───────────────────────────────────────────────────────────────
// ESP-IDF radio
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiRadio {
    wifi: EspWifi<'static>,
}

#[cfg(target_os = "espidf")]
impl WifiRadio {
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self { wifi }
    }

    /// Reconfigure and (re)start the driver.
    fn apply(&mut self, conf: &Configuration) -> Result<(), RadioError> {
        if self.wifi.is_started().unwrap_or(false) {
            let _ = self.wifi.stop();
        }
        self.wifi.set_configuration(conf).map_err(|e| {
            warn!("WiFi: set_configuration failed: {}", e);
            RadioError::ModeSwitchFailed
        })?;
        self.wifi.start().map_err(|e| {
            warn!("WiFi: start failed: {}", e);
            RadioError::ModeSwitchFailed
        })
    }
}

#[cfg(target_os = "espidf")]
impl RadioPort for WifiRadio {
    fn disconnect(&mut self) {
        if self.wifi.is_connected().unwrap_or(false) {
            let _ = self.wifi.disconnect();
        }
    }

    fn set_station_mode(&mut self) -> Result<(), RadioError> {
        self.apply(&Configuration::Client(ClientConfiguration::default()))
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError> {
        self.wifi
            .sta_netif_mut()
            .set_hostname(hostname)
            .map_err(|_| RadioError::HostnameRejected)
    }

    fn begin_join(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError> {
        let auth_method = if passphrase.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPAWPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| RadioError::InvalidSsid)?,
            password: passphrase
                .try_into()
                .map_err(|_| RadioError::InvalidPassphrase)?,
            auth_method,
            ..Default::default()
        });
        self.apply(&conf)?;
        self.wifi.connect().map_err(|e| {
            warn!("WiFi: connect request failed: {}", e);
            RadioError::JoinRejected
        })?;
        info!("WiFi: join requested for '{}'", ssid);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    fn start_access_point(&mut self, ssid: &str) -> Result<(), RadioError> {
        let conf = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: ssid.try_into().map_err(|_| RadioError::InvalidSsid)?,
            auth_method: AuthMethod::None,
            channel: 1,
            ..Default::default()
        });
        self.apply(&conf)
    }

    fn stop_access_point(&mut self) -> Result<(), RadioError> {
        self.wifi.stop().map_err(|e| {
            warn!("WiFi: stop failed: {}", e);
            RadioError::ModeSwitchFailed
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct WifiRadio {
    station: bool,
    joined: Option<heapless::String<32>>,
    access_point: Option<heapless::String<32>>,
    hostname: heapless::String<32>,
    link_up: bool,
}

#[cfg(not(target_os = "espidf"))]
impl WifiRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the access point accepting or dropping the station.
    pub fn set_link(&mut self, up: bool) {
        self.link_up = up && self.joined.is_some();
    }

    pub fn access_point(&self) -> Option<&str> {
        self.access_point.as_deref()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

#[cfg(not(target_os = "espidf"))]
impl RadioPort for WifiRadio {
    fn disconnect(&mut self) {
        self.joined = None;
        self.link_up = false;
    }

    fn set_station_mode(&mut self) -> Result<(), RadioError> {
        self.access_point = None;
        self.station = true;
        Ok(())
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError> {
        self.hostname.clear();
        self.hostname
            .push_str(hostname)
            .map_err(|()| RadioError::HostnameRejected)
    }

    fn begin_join(&mut self, ssid: &str, _passphrase: &str) -> Result<(), RadioError> {
        if !self.station {
            return Err(RadioError::JoinRejected);
        }
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|()| RadioError::InvalidSsid)?;
        info!("WiFi(sim): join requested for '{}'", ssid);
        self.joined = Some(s);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.station && self.link_up
    }

    fn start_access_point(&mut self, ssid: &str) -> Result<(), RadioError> {
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|()| RadioError::InvalidSsid)?;
        self.station = false;
        self.joined = None;
        self.link_up = false;
        self.access_point = Some(s);
        Ok(())
    }

    fn stop_access_point(&mut self) -> Result<(), RadioError> {
        if self.access_point.take().is_none() {
            warn!("WiFi(sim): stop requested with no access point");
        }
        Ok(())
    }
}
