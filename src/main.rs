//! Desk occupancy node firmware: main entry point.
//!
//! Hexagonal architecture with a single cooperative main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  WifiRadio     EspHttpClient   NvsByteStore   SystemClock      │
//! │  (RadioPort)   (HttpPort)      (ByteStore)    (ClockPort)      │
//! │  StatusLed     LogEventSink    PortalServer   ButtonDriver     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │                DeskNode (pure logic)                   │    │
//! │  │  Connectivity · Occupancy sync · Indicator · Portal    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use desk_occupancy::adapters::device_id;
use desk_occupancy::adapters::http_client::EspHttpClient;
use desk_occupancy::adapters::log_sink::LogEventSink;
use desk_occupancy::adapters::nvs::NvsByteStore;
use desk_occupancy::adapters::portal_server::PortalServer;
use desk_occupancy::adapters::time::SystemClock;
use desk_occupancy::adapters::wifi::WifiRadio;
use desk_occupancy::app::commands::AppCommand;
use desk_occupancy::app::ports::ClockPort;
use desk_occupancy::app::service::DeskNode;
use desk_occupancy::config::DeviceConfig;
use desk_occupancy::drivers::button::{ButtonDriver, ButtonEvent};
use desk_occupancy::drivers::status_led::StatusLed;
use desk_occupancy::drivers::{hw_init, watchdog::Watchdog};
use desk_occupancy::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Desk occupancy node v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = DeviceConfig::default();
    if let Err(e) = config.validate() {
        warn!("Config: {}", e);
    }

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("LEDC init")?;
    let watchdog = Watchdog::arm(&config);
    info!("Watchdog timeout: {} ms", watchdog.timeout_ms());

    let sys_loop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let peripherals = Peripherals::take()?;

    // Active-low button with the internal pull-up.
    // SAFETY: BUTTON_GPIO is claimed by nothing else on this board.
    let button_gpio = unsafe { AnyIOPin::new(pins::BUTTON_GPIO) };
    let mut button_pin = PinDriver::input(button_gpio)?;
    button_pin.set_pull(Pull::Up)?;
    let mut button = ButtonDriver::new(button_pin);
    let force_ap = button.is_held();

    let mut led = StatusLed::new();
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    // ── 3. Storage and identity ───────────────────────────────
    let store = NvsByteStore::new().map_err(|e| anyhow::anyhow!("NVS: {}", e))?;
    let ap_ssid = device_id::access_point_ssid(&config.ap_ssid_prefix, &device_id::read_mac());
    info!("Device AP SSID: {}", ap_ssid);

    // ── 4. Network adapters ───────────────────────────────────
    let esp_wifi = EspWifi::new(peripherals.modem, sys_loop, Some(nvs_partition))?;
    let mut radio = WifiRadio::new(esp_wifi);
    let mut http = EspHttpClient::new(config.http_timeout_ms);

    // ── 5. Boot decision ──────────────────────────────────────
    let loop_interval_ms = config.loop_interval_ms;
    let portal_port = config.portal_port;
    let mut node = DeskNode::new(config, store, &ap_ssid);
    let state = node.boot(force_ap, &mut radio, &mut http, &mut clock, &mut led, &mut sink);
    info!("Boot complete: {}", state.as_str());
    watchdog.feed();

    let portal = PortalServer::bind(portal_port).context("portal bind")?;

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        if let Some(ButtonEvent::Pressed) = button.tick(clock.now_ms()) {
            info!("Button: press → toggle occupancy");
            node.queue_command(AppCommand::Toggle);
        }

        node.tick(&mut radio, &mut http, &mut clock, &mut led, &mut sink);
        portal.poll(|req| node.handle_portal(req, &clock, &mut sink));

        if node.restart_due(clock.now_ms()) {
            info!("Restarting");
            unsafe { esp_idf_svc::sys::esp_restart() };
        }

        watchdog.feed();
        clock.sleep_ms(loop_interval_ms);
    }
}
