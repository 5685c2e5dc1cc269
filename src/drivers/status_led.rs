//! RGB status LED driver.
//!
//! Three LEDC PWM channels (CH0-2) drive a common-cathode RGB LED.
//! Colour and brightness are kept separately; the duty written to each
//! channel is the colour component scaled by the brightness.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::IndicatorPort;
use crate::drivers::hw_init;

pub struct StatusLed {
    colour: (u8, u8, u8),
    brightness: u8,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

/// `component * brightness / 255`, rounded down.
pub fn scale(component: u8, brightness: u8) -> u8 {
    ((component as u16 * brightness as u16) / 255) as u8
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            colour: (0, 0, 0),
            brightness: u8::MAX,
        }
    }

    pub fn off(&mut self) {
        self.set_colour(0, 0, 0);
    }

    pub fn current_colour(&self) -> (u8, u8, u8) {
        self.colour
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Duty cycles currently written to the R/G/B channels.
    pub fn duty(&self) -> (u8, u8, u8) {
        let (r, g, b) = self.colour;
        (
            scale(r, self.brightness),
            scale(g, self.brightness),
            scale(b, self.brightness),
        )
    }

    fn flush(&self) {
        let (r, g, b) = self.duty();
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
    }
}

impl IndicatorPort for StatusLed {
    fn set_colour(&mut self, r: u8, g: u8, b: u8) {
        self.colour = (r, g, b);
        self.flush();
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.flush();
    }
}
