//! Board-level drivers: status LED, boot button, watchdog and the
//! one-shot peripheral setup they depend on.

pub mod button;
pub mod hw_init;
pub mod status_led;
pub mod watchdog;
