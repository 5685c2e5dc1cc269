//! Fuzz target: portal request parsing and routing
//!
//! Splits the input into a URL and a body and runs them through
//! `PortalRequest::parse` and `router::resolve`, the path every byte from
//! the open access point takes.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A parsed path is never empty
//!
//! cargo fuzz run fuzz_portal_form

#![no_main]

use desk_occupancy::portal::{Method, PortalRequest, router};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    let text: &str = &text;
    let (url, body) = text.split_once('\n').unwrap_or((text, ""));
    let method = if selector & 1 == 0 { Method::Get } else { Method::Post };

    let req = PortalRequest::parse(method, url, body);
    assert!(!req.path.is_empty());
    let _ = router::resolve(&req);
});
