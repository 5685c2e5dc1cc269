//! Mock adapters for integration tests.
//!
//! Every port the desk node drives has a recording stand-in here, so tests
//! can assert on the full call history without a radio, a network or
//! flash.

use std::cell::Cell;
use std::collections::VecDeque;

use desk_occupancy::app::events::AppEvent;
use desk_occupancy::app::ports::{
    ByteStorePort, ClockPort, EventSink, HttpError, HttpPort, HttpResponse, IndicatorPort,
    RadioError, RadioPort, StoreError,
};
use desk_occupancy::app::credentials::{Credentials, RECORD_LEN};

// ── Radio ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Disconnect,
    StationMode,
    Hostname(String),
    BeginJoin { ssid: String, pass: String },
    StartAp(String),
    StopAp,
}

/// Radio whose join succeeds after a fixed number of status polls.
pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    /// `Some(n)`: the link comes up on the n-th poll after `begin_join`.
    /// `None`: the join never completes.
    pub connect_after: Option<u32>,
    pub fail_ap: bool,
    polls: Cell<u32>,
    joining: bool,
    link_up: Cell<bool>,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn joins_after(polls: u32) -> Self {
        Self {
            connect_after: Some(polls),
            ..Self::unreachable()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            calls: Vec::new(),
            connect_after: None,
            fail_ap: false,
            polls: Cell::new(0),
            joining: false,
            link_up: Cell::new(false),
        }
    }

    /// Status polls answered since the last `begin_join`.
    pub fn polls(&self) -> u32 {
        self.polls.get()
    }

    /// Drop the station link, as if the router went away.
    pub fn drop_link(&mut self) {
        self.link_up.set(false);
        self.joining = false;
    }

    pub fn join_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::BeginJoin { .. }))
            .count()
    }

    pub fn ap_starts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::StartAp(_)))
            .count()
    }

    pub fn ap_stops(&self) -> usize {
        self.calls.iter().filter(|c| **c == RadioCall::StopAp).count()
    }
}

impl RadioPort for MockRadio {
    fn disconnect(&mut self) {
        self.calls.push(RadioCall::Disconnect);
        self.link_up.set(false);
        self.joining = false;
    }

    fn set_station_mode(&mut self) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StationMode);
        Ok(())
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), RadioError> {
        self.calls.push(RadioCall::Hostname(hostname.into()));
        Ok(())
    }

    fn begin_join(&mut self, ssid: &str, passphrase: &str) -> Result<(), RadioError> {
        self.calls.push(RadioCall::BeginJoin {
            ssid: ssid.into(),
            pass: passphrase.into(),
        });
        self.polls.set(0);
        self.joining = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        if self.joining && !self.link_up.get() {
            let n = self.polls.get() + 1;
            self.polls.set(n);
            if self.connect_after.is_some_and(|after| n >= after) {
                self.link_up.set(true);
            }
        }
        self.link_up.get()
    }

    fn start_access_point(&mut self, ssid: &str) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StartAp(ssid.into()));
        if self.fail_ap {
            return Err(RadioError::ModeSwitchFailed);
        }
        self.link_up.set(false);
        self.joining = false;
        Ok(())
    }

    fn stop_access_point(&mut self) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StopAp);
        Ok(())
    }
}

// ── HTTP ──────────────────────────────────────────────────────

/// HTTP client answering from a script, then from a fallback.
pub struct MockHttp {
    pub urls: Vec<String>,
    script: VecDeque<Result<HttpResponse, HttpError>>,
    fallback: Result<HttpResponse, HttpError>,
}

#[allow(dead_code)]
impl MockHttp {
    /// Every request answers `200` with `body`.
    pub fn answering(body: &str) -> Self {
        Self {
            urls: Vec::new(),
            script: VecDeque::new(),
            fallback: Ok(HttpResponse::new(200, body)),
        }
    }

    /// Every request fails at the transport level.
    pub fn offline() -> Self {
        Self {
            urls: Vec::new(),
            script: VecDeque::new(),
            fallback: Err(HttpError::Connect),
        }
    }

    /// Queue one response ahead of the fallback.
    pub fn then(mut self, resp: Result<HttpResponse, HttpError>) -> Self {
        self.script.push_back(resp);
        self
    }

    pub fn push(&mut self, resp: Result<HttpResponse, HttpError>) {
        self.script.push_back(resp);
    }

    pub fn set_fallback(&mut self, resp: Result<HttpResponse, HttpError>) {
        self.fallback = resp;
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.urls.iter().filter(|u| u.contains(needle)).count()
    }
}

impl HttpPort for MockHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        self.urls.push(url.into());
        self.script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Fake monotonic clock.  Sleeping advances time instantly.
#[derive(Default)]
pub struct MockClock {
    pub now: u64,
    pub sleeps: Vec<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(now: u64) -> Self {
        Self {
            now,
            sleeps: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    pub fn total_slept(&self) -> u64 {
        self.sleeps.iter().map(|&s| s as u64).sum()
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
        self.now += ms as u64;
    }
}

// ── Indicator ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    pub colours: Vec<(u8, u8, u8)>,
    pub brightness: u8,
}

#[allow(dead_code)]
impl MockLed {
    pub fn colour(&self) -> Option<(u8, u8, u8)> {
        self.colours.last().copied()
    }
}

impl IndicatorPort for MockLed {
    fn set_colour(&mut self, r: u8, g: u8, b: u8) {
        self.colours.push((r, g, b));
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }
}

// ── Byte store ────────────────────────────────────────────────

/// Staged/durable byte image with an injectable commit failure.
pub struct MockStore {
    staged: [u8; RECORD_LEN],
    durable: [u8; RECORD_LEN],
    pub fail_commits: bool,
    pub commits: u32,
}

#[allow(dead_code)]
impl MockStore {
    pub fn blank() -> Self {
        Self {
            staged: [0; RECORD_LEN],
            durable: [0; RECORD_LEN],
            fail_commits: false,
            commits: 0,
        }
    }

    pub fn with(ssid: &str, pass: &str, dev_id: &str) -> Self {
        let record = Credentials::new(ssid, pass, dev_id)
            .expect("valid test credentials")
            .encode();
        Self {
            staged: record,
            durable: record,
            ..Self::blank()
        }
    }

    pub fn durable_credentials(&self) -> Credentials {
        Credentials::decode(&self.durable)
    }

    /// Lose everything that was never committed, as a reboot would.
    pub fn power_cycle(mut self) -> Self {
        self.staged = self.durable;
        self
    }
}

impl ByteStorePort for MockStore {
    fn capacity(&self) -> usize {
        RECORD_LEN
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(buf.len()).ok_or(StoreError::OutOfRange)?;
        let src = self.staged.get(offset..end).ok_or(StoreError::OutOfRange)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(data.len()).ok_or(StoreError::OutOfRange)?;
        let dst = self
            .staged
            .get_mut(offset..end)
            .ok_or(StoreError::OutOfRange)?;
        dst.copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.fail_commits {
            return Err(StoreError::CommitFailed);
        }
        self.durable = self.staged;
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) {
        self.staged = self.durable;
    }
}

// ── Event sink ────────────────────────────────────────────────

/// Records every emitted event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
