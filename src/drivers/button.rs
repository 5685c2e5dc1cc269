//! Polled, debounced push-button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  Any pin implementing
//! [`embedded_hal::digital::InputPin`] works; on the board that is an
//! `esp_idf_hal` `PinDriver` in input mode.
//!
//! ## Detection
//!
//! `tick()` is called from the main loop.  A level change must hold for
//! [`DEBOUNCE_MS`] before it counts.  One press edge yields exactly one
//! [`ButtonEvent::Pressed`]; holding the button does not repeat.  A pin
//! read error is treated as released.

use embedded_hal::digital::InputPin;

pub const DEBOUNCE_MS: u64 = 50;

/// Button events emitted after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    PressWait { since_ms: u64 },
    Held,
    ReleaseWait { since_ms: u64 },
}

pub struct ButtonDriver<P> {
    pin: P,
    state: DebounceState,
}

impl<P: InputPin> ButtonDriver<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: DebounceState::Released,
        }
    }

    /// Raw level check, no debounce.  Used once at power-up to decide
    /// whether to force the access point.
    pub fn is_held(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }

    /// Advance the debounce state machine.  Returns an event on a
    /// confirmed press edge.
    pub fn tick(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let low = self.is_held();

        match self.state {
            DebounceState::Released => {
                if low {
                    self.state = DebounceState::PressWait { since_ms: now_ms };
                }
                None
            }
            DebounceState::PressWait { since_ms } => {
                if !low {
                    self.state = DebounceState::Released;
                    None
                } else if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Held;
                    Some(ButtonEvent::Pressed)
                } else {
                    None
                }
            }
            DebounceState::Held => {
                if !low {
                    self.state = DebounceState::ReleaseWait { since_ms: now_ms };
                }
                None
            }
            DebounceState::ReleaseWait { since_ms } => {
                if low {
                    self.state = DebounceState::Held;
                } else if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Released;
                }
                None
            }
        }
    }
}
