//! Indicator controller: (connectivity, occupancy, time) → colour + brightness.
//!
//! Recomputed every loop iteration; nothing here is persisted.
//!
//! ## Colour table
//!
//! | Mode          | Colour | Brightness      |
//! |---------------|--------|-----------------|
//! | Off           | black  | 0               |
//! | Connecting    | blue   | full            |
//! | AccessPoint   | white  | full            |
//! | Transitional  | blue   | full            |
//! | Occupied      | red    | full            |
//! | Free          | green  | breathing ramp  |
//!
//! The breathing ramp is a triangle wave advanced from elapsed time, so a
//! slow loop catches up instead of blocking to animate.

use super::connectivity::ConnectivityState;
use super::occupancy::OccupancyState;
use super::ports::IndicatorPort;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_OFF: Rgb = (0, 0, 0);
pub const COLOUR_CONNECTING: Rgb = (0, 0, 255); // Blue
pub const COLOUR_ACCESS_POINT: Rgb = (255, 255, 255); // White
pub const COLOUR_TRANSITIONAL: Rgb = (0, 0, 255); // Blue
pub const COLOUR_OCCUPIED: Rgb = (255, 0, 0); // Red
pub const COLOUR_FREE: Rgb = (0, 255, 0); // Green

pub const FULL_BRIGHTNESS: u8 = 255;

/// Upper bound on ramp steps applied in one render, so a long stall
/// costs a fixed amount of work.
const MAX_CATCH_UP_TICKS: u64 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMode {
    Off,
    Connecting,
    AccessPoint,
    Transitional,
    Occupied,
    Free,
}

impl IndicatorMode {
    pub fn colour(self) -> Rgb {
        match self {
            Self::Off => COLOUR_OFF,
            Self::Connecting => COLOUR_CONNECTING,
            Self::AccessPoint => COLOUR_ACCESS_POINT,
            Self::Transitional => COLOUR_TRANSITIONAL,
            Self::Occupied => COLOUR_OCCUPIED,
            Self::Free => COLOUR_FREE,
        }
    }

    pub fn breathes(self) -> bool {
        self == Self::Free
    }
}

/// Steady-state mode for a connectivity/occupancy pair.
///
/// [`IndicatorMode::Transitional`] never comes out of here; it is shown
/// explicitly for the duration of a write.
pub fn mode_for(conn: ConnectivityState, occupied: bool) -> IndicatorMode {
    match conn {
        ConnectivityState::Disconnected => IndicatorMode::Off,
        ConnectivityState::Connecting => IndicatorMode::Connecting,
        ConnectivityState::AccessPointActive => IndicatorMode::AccessPoint,
        ConnectivityState::Connected if occupied => IndicatorMode::Occupied,
        ConnectivityState::Connected => IndicatorMode::Free,
    }
}

// ───────────────────────────────────────────────────────────────
// Breathing ramp
// ───────────────────────────────────────────────────────────────

/// Triangular brightness ramp: ±`step` per `tick_ms`, reversing at 0 and 255.
#[derive(Debug, Clone)]
pub struct BreathingRamp {
    level: u8,
    rising: bool,
    step: u8,
    tick_ms: u32,
    last_tick_ms: Option<u64>,
}

impl BreathingRamp {
    pub fn new(step: u8, tick_ms: u32) -> Self {
        Self {
            level: FULL_BRIGHTNESS,
            rising: false,
            step: step.max(1),
            tick_ms: tick_ms.max(1),
            last_tick_ms: None,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// Restart from full brightness on the next [`advance`](Self::advance).
    pub fn reset(&mut self) {
        self.level = FULL_BRIGHTNESS;
        self.rising = false;
        self.last_tick_ms = None;
    }

    /// Apply every whole tick elapsed since the previous call.
    pub fn advance(&mut self, now_ms: u64) -> u8 {
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return self.level;
        };
        let tick = self.tick_ms as u64;
        let elapsed_ticks = now_ms.saturating_sub(last) / tick;
        if elapsed_ticks == 0 {
            return self.level;
        }

        for _ in 0..elapsed_ticks.min(MAX_CATCH_UP_TICKS) {
            self.step_once();
        }
        self.last_tick_ms = Some(last + elapsed_ticks * tick);
        self.level
    }

    fn step_once(&mut self) {
        if self.rising {
            match self.level.checked_add(self.step) {
                Some(l) if l < FULL_BRIGHTNESS => self.level = l,
                _ => {
                    self.level = FULL_BRIGHTNESS;
                    self.rising = false;
                }
            }
        } else {
            match self.level.checked_sub(self.step) {
                Some(l) if l > 0 => self.level = l,
                _ => {
                    self.level = 0;
                    self.rising = true;
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorOutput {
    pub colour: Rgb,
    pub brightness: u8,
}

impl IndicatorOutput {
    pub const OFF: Self = Self {
        colour: COLOUR_OFF,
        brightness: 0,
    };
}

pub struct IndicatorController {
    ramp: BreathingRamp,
    mode: IndicatorMode,
    last_applied: Option<IndicatorOutput>,
}

impl IndicatorController {
    pub fn new(breathe_step: u8, breathe_tick_ms: u32) -> Self {
        Self {
            ramp: BreathingRamp::new(breathe_step, breathe_tick_ms),
            mode: IndicatorMode::Off,
            last_applied: None,
        }
    }

    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    /// Compute the output for this iteration.  Never blocks.
    pub fn render(
        &mut self,
        conn: ConnectivityState,
        occupancy: &OccupancyState,
        now_ms: u64,
    ) -> IndicatorOutput {
        let mode = mode_for(conn, occupancy.occupied);
        if mode != self.mode && self.mode.breathes() {
            self.ramp.reset();
        }
        self.mode = mode;

        let brightness = match mode {
            IndicatorMode::Off => 0,
            m if m.breathes() => self.ramp.advance(now_ms),
            _ => FULL_BRIGHTNESS,
        };
        IndicatorOutput {
            colour: mode.colour(),
            brightness,
        }
    }

    /// Push `out` to the LED.  Skips the write when nothing changed.
    pub fn apply(&mut self, out: IndicatorOutput, led: &mut impl IndicatorPort) -> bool {
        if self.last_applied == Some(out) {
            return false;
        }
        let (r, g, b) = out.colour;
        led.set_colour(r, g, b);
        led.set_brightness(out.brightness);
        self.last_applied = Some(out);
        true
    }

    /// Show the in-flight write colour immediately.
    pub fn show_transitional(&mut self, led: &mut impl IndicatorPort) {
        self.apply(
            IndicatorOutput {
                colour: COLOUR_TRANSITIONAL,
                brightness: FULL_BRIGHTNESS,
            },
            led,
        );
    }
}
