//! Occupancy synchronizer: the local flag as a cache of confirmed remote state.
//!
//! - `refresh` reads the remote flag at most once per refresh interval
//!   (unless forced).  The sync timestamp moves on every attempt, so a
//!   failing remote is not hammered.
//! - `set_occupied` writes first and only adopts the new value once the
//!   remote acknowledged it.  A failed write leaves the flag where it was.

use log::{info, warn};

use super::ports::{ClockPort, HttpPort};
use super::remote::RemoteAuthority;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyState {
    pub occupied: bool,
    /// Time of the last read or write attempt.  `None` until the first one.
    pub last_synced_at_ms: Option<u64>,
}

/// What a refresh or write did to the local flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Rate limit not yet expired; no network call was made.
    Skipped,
    /// The remote agreed with the local flag, or the request was a no-op.
    Unchanged,
    /// The local flag now holds a new acknowledged value.
    Updated { occupied: bool },
}

pub struct OccupancySynchronizer {
    state: OccupancyState,
    refresh_interval_ms: u32,
}

impl OccupancySynchronizer {
    pub fn new(refresh_interval_ms: u32) -> Self {
        Self {
            state: OccupancyState::default(),
            refresh_interval_ms,
        }
    }

    pub fn state(&self) -> &OccupancyState {
        &self.state
    }

    pub fn is_occupied(&self) -> bool {
        self.state.occupied
    }

    /// Whether a read-back is due at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.state.last_synced_at_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.refresh_interval_ms as u64,
        }
    }

    /// Rate-limited read-back of the remote flag.
    pub fn refresh(
        &mut self,
        force: bool,
        remote: &RemoteAuthority,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
    ) -> Result<SyncOutcome, Error> {
        let now = clock.now_ms();
        if !force && !self.is_due(now) {
            return Ok(SyncOutcome::Skipped);
        }
        self.state.last_synced_at_ms = Some(now);

        let occupied = remote.read_status(http, clock).inspect_err(|e| {
            warn!("Occupancy: refresh failed, keeping {}: {}", self.state.occupied, e);
        })?;
        Ok(self.adopt(occupied))
    }

    /// Ask the remote to record `desired`; adopt it only on acknowledgement.
    ///
    /// `on_transition` runs right before the write goes out (the indicator
    /// uses it to show the in-flight colour).
    pub fn set_occupied(
        &mut self,
        desired: bool,
        tag: Option<&str>,
        remote: &RemoteAuthority,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        on_transition: impl FnOnce(),
    ) -> Result<SyncOutcome, Error> {
        if desired == self.state.occupied {
            return Ok(SyncOutcome::Unchanged);
        }

        on_transition();
        let result = remote.write_status(http, clock, desired, tag);
        self.state.last_synced_at_ms = Some(clock.now_ms());

        match result {
            Ok(()) => Ok(self.adopt(desired)),
            Err(e) => {
                warn!(
                    "Occupancy: write {} not acknowledged, keeping {}: {}",
                    desired, self.state.occupied, e
                );
                Err(e)
            }
        }
    }

    /// Flip the flag; the button action.
    pub fn toggle(
        &mut self,
        tag: Option<&str>,
        remote: &RemoteAuthority,
        http: &mut impl HttpPort,
        clock: &mut impl ClockPort,
        on_transition: impl FnOnce(),
    ) -> Result<SyncOutcome, Error> {
        let desired = !self.state.occupied;
        self.set_occupied(desired, tag, remote, http, clock, on_transition)
    }

    fn adopt(&mut self, occupied: bool) -> SyncOutcome {
        if occupied == self.state.occupied {
            return SyncOutcome::Unchanged;
        }
        info!("Occupancy: {} -> {}", self.state.occupied, occupied);
        self.state.occupied = occupied;
        SyncOutcome::Updated { occupied }
    }
}
