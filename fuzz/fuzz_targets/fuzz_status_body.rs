//! Fuzz target: `remote::parse_status` (authority response body)
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A body with no quotes that never mentions `status` is always rejected
//!
//! cargo fuzz run fuzz_status_body

#![no_main]

use desk_occupancy::app::remote::parse_status;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    let parsed = parse_status(&body);
    if !body.contains("status") && !body.contains('"') {
        assert_eq!(parsed, None);
    }
});
