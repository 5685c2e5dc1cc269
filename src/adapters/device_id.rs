//! Device identity derived from the ESP32 soft-AP MAC address.
//!
//! The fallback access point advertises `DOM-XXXXXXXXXXXX`: the prefix
//! followed by all six MAC bytes in uppercase hex, no separators.  The
//! name is stable across reboots and unique per board.

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Access-point SSID, at most 32 bytes.
pub type SsidString = heapless::String<32>;

/// Read the soft-AP interface MAC address.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_SOFTAP,
        );
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// `prefix` + 12 uppercase hex digits.  A prefix too long to fit is cut
/// so the MAC digits always survive.
pub fn access_point_ssid(prefix: &str, mac: &MacAddress) -> SsidString {
    let mut ssid = SsidString::new();
    let room = ssid.capacity() - 12;
    for c in prefix.chars() {
        if ssid.len() + c.len_utf8() > room {
            break;
        }
        let _ = ssid.push(c);
    }
    for b in mac {
        let _ = write!(ssid, "{:02X}", b);
    }
    ssid
}
