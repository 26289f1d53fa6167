//! Fuzz target for dictionary decoding.

#![no_main]

use card_scheme::dictionary::parse_response_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_response_str(s);
    }
});
