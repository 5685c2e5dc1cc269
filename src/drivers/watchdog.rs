//! Task watchdog for the desk node main loop.
//!
//! The node blocks in two places only: the WiFi join loop and the HTTP
//! retry sequence.  The watchdog timeout is taken from [`DeviceConfig`]
//! and never armed below the longest of those waits plus one loop pass,
//! so a mistuned config can't reset the board halfway through a join.

#[cfg(target_os = "espidf")]
use log::{info, warn};

use crate::config::DeviceConfig;

/// Shortest timeout that survives every bounded wait in one loop pass.
pub fn floor_ms(config: &DeviceConfig) -> u32 {
    let longest = config.join_budget_ms().max(config.http_budget_ms());
    let floor = longest + u64::from(config.loop_interval_ms) + 1;
    u32::try_from(floor).unwrap_or(u32::MAX)
}

/// Timeout actually armed: the configured value, raised to [`floor_ms`].
pub fn effective_timeout_ms(config: &DeviceConfig) -> u32 {
    config.watchdog_timeout_ms.max(floor_ms(config))
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Arm the task watchdog for the calling task.
    pub fn arm(config: &DeviceConfig) -> Self {
        let timeout_ms = effective_timeout_ms(config);
        if timeout_ms != config.watchdog_timeout_ms {
            log::warn!(
                "Watchdog: {} ms is shorter than the longest wait, using {} ms",
                config.watchdog_timeout_ms,
                timeout_ms
            );
        }

        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_idf_sys::esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: called once from the main task before the loop starts.
            let ret = unsafe { esp_idf_sys::esp_task_wdt_reconfigure(&cfg) };
            if ret != esp_idf_sys::ESP_OK {
                warn!("Watchdog: reconfigure returned {}", ret);
            }

            // SAFETY: a null handle subscribes the calling task.
            let ret = unsafe { esp_idf_sys::esp_task_wdt_add(core::ptr::null_mut()) };
            let subscribed = ret == esp_idf_sys::ESP_OK;
            if subscribed {
                info!("Watchdog: armed for the main loop ({} ms)", timeout_ms);
            } else {
                warn!("Watchdog: main task not subscribed ({})", ret);
            }
            Self { timeout_ms, subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): {} ms", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Once per loop pass, after the bounded waits have returned.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: the calling task is subscribed.
                unsafe {
                    esp_idf_sys::esp_task_wdt_reset();
                }
            }
        }
    }
}
