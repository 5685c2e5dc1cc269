//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements     | Connects to                   |
//! |-----------------|----------------|-------------------------------|
//! | `http_client`   | HttpPort       | EspHttpConnection / sim       |
//! | `log_sink`      | EventSink      | Serial log output             |
//! | `nvs`           | ByteStorePort  | NVS blob / in-memory image    |
//! | `portal_server` | none           | tiny_http listener            |
//! | `time`          | ClockPort      | ESP32 system timer            |
//! | `wifi`          | RadioPort      | ESP-IDF WiFi STA + soft-AP    |
//!
//! The status LED adapter lives in [`crate::drivers::status_led`].

pub mod device_id;
pub mod http_client;
pub mod log_sink;
pub mod nvs;
pub mod portal_server;
pub mod time;
pub mod wifi;
