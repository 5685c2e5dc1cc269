//! GPIO / peripheral pin assignments for the desk node board.
//!
//! Single source of truth. Every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Status LED (discrete common-cathode RGB, LEDC driven)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 25;
pub const LED_G_GPIO: i32 = 26;
pub const LED_B_GPIO: i32 = 27;

/// LEDC frequency for the RGB status LED (5 kHz, flicker-free).
pub const LED_PWM_FREQ_HZ: u32 = 5_000;

/// LEDC timer resolution (bits).  8-bit matches the 0-255 brightness scale.
pub const PWM_RESOLUTION_BITS: u32 = 8;

// ---------------------------------------------------------------------------
// User button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: toggles occupancy, forces the access point when
/// held during power-up.
pub const BUTTON_GPIO: i32 = 4;
