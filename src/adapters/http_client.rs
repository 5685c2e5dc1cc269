//! HTTP client adapter for the remote occupancy authority.
//!
//! Implements [`HttpPort`].  On ESP-IDF every call opens an
//! `EspHttpConnection` with a transport timeout, so a call always returns.
//! Bodies are capped at [`MAX_BODY_LEN`]; the status API answers with a
//! short JSON object.
//!
//! The host build simulates the authority in memory.

use log::debug;

use crate::app::ports::{HttpError, HttpPort, HttpResponse};

/// Largest response body kept; the rest is discarded.
pub const MAX_BODY_LEN: usize = 1024;

#[cfg(target_os = "espidf")]
use core::time::Duration;
#[cfg(target_os = "espidf")]
use embedded_svc::{
    http::{Method, Status, client::Client},
    io::Read as _,
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration as HttpClientConfiguration, EspHttpConnection};

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct EspHttpClient {
    timeout: Duration,
}

#[cfg(target_os = "espidf")]
impl EspHttpClient {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms as u64),
        }
    }
}

#[cfg(target_os = "espidf")]
impl HttpPort for EspHttpClient {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        let conf = HttpClientConfiguration {
            timeout: Some(self.timeout),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&conf).map_err(|_| HttpError::Connect)?;
        let mut client = Client::wrap(conn);
        let request = client
            .request(Method::Get, url, &[])
            .map_err(|_| HttpError::InvalidUrl)?;
        let mut response = request.submit().map_err(|_| HttpError::Connect)?;
        let status = response.status();

        let mut body = Vec::with_capacity(256);
        let mut chunk = [0u8; 256];
        loop {
            let n = response.read(&mut chunk).map_err(|_| HttpError::Read)?;
            if n == 0 {
                break;
            }
            let room = MAX_BODY_LEN.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..n.min(room)]);
        }

        let body = String::from_utf8_lossy(&body).into_owned();
        debug!("HTTP GET {} → {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse::new(status, body))
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// In-memory stand-in for the authority: answers the three desk routes
/// and keeps one occupancy flag.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimHttpClient {
    occupied: bool,
    offline: bool,
    requests: Vec<String>,
}

#[cfg(not(target_os = "espidf"))]
impl SimHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request fail at the transport level.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn occupied(&self) -> bool {
        self.occupied
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    fn route(&mut self, path: &str) -> HttpResponse {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., "desk", "register", _] => HttpResponse::new(200, "registered"),
            [.., "desk", _, "occupied"] | [.., "desk", _, "occupied", _] => {
                self.occupied = true;
                HttpResponse::new(200, "ok")
            }
            [.., "desk", _, "available"] | [.., "desk", _, "available", _] => {
                self.occupied = false;
                HttpResponse::new(200, "ok")
            }
            [.., "desk", _] => {
                let status = if self.occupied { "Occupied" } else { "Available" };
                HttpResponse::new(200, format!(r#"{{"status":"{status}"}}"#))
            }
            _ => HttpResponse::new(404, "not found"),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpPort for SimHttpClient {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.push(url.into());
        if self.offline {
            return Err(HttpError::Connect);
        }
        let path = url
            .split_once("://")
            .and_then(|(_, rest)| rest.find('/').map(|i| &rest[i..]))
            .ok_or(HttpError::InvalidUrl)?;
        let resp = self.route(path);
        debug!("HTTP(sim) GET {} → {}", url, resp.status);
        Ok(resp)
    }
}
