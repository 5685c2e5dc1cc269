//! Fuzz target: `Credentials::decode` (flash record parser)
//!
//! Feeds arbitrary 130-byte images through the record decoder, as if the
//! NVS blob were corrupted or written by an older firmware.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A decoded record is either the empty default or passes validation
//! - Re-encoding a decoded record and decoding it again is stable
//!
//! cargo fuzz run fuzz_credential_record

#![no_main]

use desk_occupancy::app::credentials::{Credentials, RECORD_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut record = [0u8; RECORD_LEN];
    let n = data.len().min(RECORD_LEN);
    record[..n].copy_from_slice(&data[..n]);

    let creds = Credentials::decode(&record);
    if creds.is_configured() {
        assert!(Credentials::new(creds.ssid(), creds.pass(), creds.dev_id()).is_ok());
    } else {
        assert_eq!(creds, Credentials::default());
    }
    assert_eq!(Credentials::decode(&creds.encode()), creds);
});
