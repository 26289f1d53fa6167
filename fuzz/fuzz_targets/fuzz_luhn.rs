//! Fuzz target for the Luhn checksum.
//!
//! Checks that the string and digit-slice forms agree and never panic.

#![no_main]

use card_scheme::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();
    let text: String = digits.iter().map(|&d| (b'0' + d) as char).collect();

    assert_eq!(luhn::is_number_valid(&text), Ok(luhn::validate(&digits)));

    if let Ok(doubled) = luhn::double_every_second_digit(&text) {
        assert_eq!(luhn::sum_digits(&doubled), Ok(luhn::compute_checksum(&digits)));
    }

    if !digits.is_empty() {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9, "Check digit should be 0-9");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }

    // Raw bytes may hold anything; errors are fine, panics are not.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = luhn::is_number_valid(s);
    }
});
