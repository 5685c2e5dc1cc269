//! Client side of the remote occupancy authority.
//!
//! | Call       | Path                                                   |
//! |------------|--------------------------------------------------------|
//! | register   | `GET {base}/desk/register/{devId}`                     |
//! | read       | `GET {base}/desk/{devId}`                              |
//! | write      | `GET {base}/desk/{devId}/{occupied\|available}[/{tag}]` |
//!
//! Success for every call is a completed exchange with a status code in
//! `[200, 400)`.  Read and write go through the same [`RetryPolicy`];
//! registration is a single fire-and-forget attempt.

use core::fmt::Write as _;

use log::{debug, info, warn};
use serde_json::Value;

use super::ports::{ClockPort, HttpPort, HttpResponse};
use super::retry::RetryPolicy;
use crate::error::Error;

/// Canonical success predicate for every remote call.
pub fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Map a status token to the occupancy flag.  Anything else is no answer.
fn status_token(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("occupied") {
        Some(true)
    } else if value.eq_ignore_ascii_case("available") {
        Some(false)
    } else {
        None
    }
}

/// Extract the occupancy flag from a status read body.
///
/// JSON bodies must be an object whose `status` is the string `Occupied`
/// or `Available` (any case); every other JSON value is rejected.  Bodies
/// that are not JSON fall back to a token scan: the body must mention
/// `status` and then `Occupied` or `Available`, with `Occupied` winning.
pub fn parse_status(body: &str) -> Option<bool> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return match value.get("status") {
            Some(Value::String(status)) => status_token(status),
            _ => None,
        };
    }
    if !body.contains("status") {
        return None;
    }
    if body.contains("Occupied") {
        Some(true)
    } else if body.contains("Available") {
        Some(false)
    } else {
        None
    }
}

/// Percent-encode one path segment (RFC 3986 unreserved characters pass).
fn push_segment(url: &mut String, segment: &str) {
    url.push('/');
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            url.push(b as char);
        } else {
            let _ = write!(url, "%{:02X}", b);
        }
    }
}

/// Remote authority bound to one device identifier.
#[derive(Debug, Clone)]
pub struct RemoteAuthority {
    base_url: String,
    dev_id: heapless::String<32>,
    retry: RetryPolicy,
}

impl RemoteAuthority {
    pub fn new(base_url: &str, dev_id: &str, retry: RetryPolicy) -> Self {
        let mut id = heapless::String::new();
        // Device ids are validated to 32 bytes by Credentials; truncate anything else.
        for c in dev_id.chars() {
            if id.push(c).is_err() {
                break;
            }
        }
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            dev_id: id,
            retry,
        }
    }

    pub fn dev_id(&self) -> &str {
        &self.dev_id
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = String::with_capacity(self.base_url.len() + 64);
        url.push_str(&self.base_url);
        for s in segments {
            push_segment(&mut url, s);
        }
        url
    }

    pub fn register_url(&self) -> String {
        self.url(&["desk", "register", &self.dev_id])
    }

    pub fn status_url(&self) -> String {
        self.url(&["desk", &self.dev_id])
    }

    pub fn write_url(&self, occupied: bool, tag: Option<&str>) -> String {
        let verb = if occupied { "occupied" } else { "available" };
        match tag.filter(|t| !t.is_empty()) {
            Some(tag) => self.url(&["desk", &self.dev_id, verb, tag]),
            None => self.url(&["desk", &self.dev_id, verb]),
        }
    }

    /// Announce the device.  One attempt, outcome only logged.
    pub fn register(&self, http: &mut impl HttpPort) -> bool {
        let url = self.register_url();
        match http.get(&url) {
            Ok(resp) if is_success(resp.status) => {
                info!("Remote: registered '{}' (HTTP {})", self.dev_id, resp.status);
                true
            }
            Ok(resp) => {
                warn!("Remote: registration of '{}' returned HTTP {}", self.dev_id, resp.status);
                false
            }
            Err(e) => {
                warn!("Remote: registration of '{}' failed ({})", self.dev_id, e);
                false
            }
        }
    }

    /// Read the authoritative occupancy flag.
    pub fn read_status(
        &self,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
    ) -> Result<bool, Error> {
        let resp = self.get_with_retry(http, clock, &self.status_url())?;
        match parse_status(&resp.body) {
            Some(occupied) => {
                debug!("Remote: status of '{}' = {}", self.dev_id, resp.body);
                Ok(occupied)
            }
            None => {
                warn!("Remote: status body without status token: {:?}", resp.body);
                Err(Error::MalformedStatus)
            }
        }
    }

    /// Write the occupancy flag.  `Ok` means the authority acknowledged.
    pub fn write_status(
        &self,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        occupied: bool,
        tag: Option<&str>,
    ) -> Result<(), Error> {
        self.get_with_retry(http, clock, &self.write_url(occupied, tag))
            .map(|_| ())
    }

    fn get_with_retry(
        &self,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        url: &str,
    ) -> Result<HttpResponse, Error> {
        let mut last_status = None;
        let result = self.retry.run(clock, |attempt| match http.get(url) {
            Ok(resp) if is_success(resp.status) => Ok(resp),
            Ok(resp) => {
                warn!("Remote: GET {} → HTTP {} (attempt {})", url, resp.status, attempt);
                last_status = Some(resp.status);
                Err(())
            }
            Err(e) => {
                warn!("Remote: GET {} failed: {} (attempt {})", url, e, attempt);
                Err(())
            }
        });
        result.map_err(|exhausted| Error::RemoteUnavailable {
            attempts: exhausted.attempts,
            last_status,
        })
    }
}
