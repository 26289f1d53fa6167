//! Luhn checksum for card numbers of any length.
//!
//! Scanning from the rightmost digit, every second digit is doubled and
//! two-digit results are reduced to the sum of their digits. The number is
//! valid when the total is a multiple of ten.
//!
//! Unlike brand-specific validators this module places no lower bound on the
//! length: an empty string sums to zero and is therefore valid.

use crate::error::ValidationError;

/// Lookup table for doubled digits: double the value, subtract 9 if >= 10.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Checks a card number string against the Luhn checksum.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] for the first character that is
/// not an ASCII digit. Callers are expected to strip separators first.
///
/// # Example
///
/// ```
/// use card_scheme::luhn::is_number_valid;
///
/// assert_eq!(is_number_valid("4532015112830366"), Ok(true));
/// assert_eq!(is_number_valid("4532015112830367"), Ok(false));
/// assert_eq!(is_number_valid(""), Ok(true));
/// assert!(is_number_valid("4532 0151").is_err());
/// ```
pub fn is_number_valid(card_number: &str) -> Result<bool, ValidationError> {
    let digits = parse_digits(card_number)?;
    Ok(validate(&digits))
}

/// Replaces every second digit from the right with the decimal text of its
/// double.
///
/// A doubled value of ten or more contributes both of its digits, so the
/// output can be longer than the input. Summing the output with
/// [`sum_digits`] gives the Luhn total.
///
/// ```
/// use card_scheme::luhn::double_every_second_digit;
///
/// assert_eq!(double_every_second_digit("1234").unwrap(), "2264");
/// assert_eq!(double_every_second_digit("16397").unwrap(), "1123187");
/// ```
pub fn double_every_second_digit(card_number: &str) -> Result<String, ValidationError> {
    let digits = parse_digits(card_number)?;
    let len = digits.len();
    let mut out = String::with_capacity(len * 2);

    for (idx, &digit) in digits.iter().enumerate() {
        // Distance from the right end, 1-based.
        if (len - idx) % 2 == 0 {
            out.push_str(&(digit * 2).to_string());
        } else {
            out.push((b'0' + digit) as char);
        }
    }

    Ok(out)
}

/// Sums the decimal digits of a string.
pub fn sum_digits(digits: &str) -> Result<u64, ValidationError> {
    Ok(parse_digits(digits)?.iter().map(|&d| d as u64).sum())
}

/// Validates a slice of digits (0-9) using the Luhn algorithm.
///
/// An empty slice is valid, its checksum being zero.
///
/// # Example
///
/// ```
/// use card_scheme::luhn::validate;
///
/// let digits = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert!(validate(&digits));
///
/// let invalid = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2];
/// assert!(!validate(&invalid));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced modulo 10) for a sequence of digits.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u64 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[digit as usize] as u64
            } else {
                digit as u64
            }
        })
        .sum()
}

/// Generates the check digit that makes `digits` followed by it pass Luhn.
///
/// ```
/// use card_scheme::luhn::generate_check_digit;
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), 1);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending a digit shifts every existing position one step left, so the
    // current rightmost digit lands on a doubled position.
    let sum: u64 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[digit as usize] as u64
            } else {
                digit as u64
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

/// Converts an ASCII digit string into digit values, rejecting anything else.
pub(crate) fn parse_digits(input: &str) -> Result<Vec<u8>, ValidationError> {
    input
        .chars()
        .enumerate()
        .map(|(position, character)| match character {
            '0'..='9' => Ok(character as u8 - b'0'),
            _ => Err(ValidationError::InvalidInput {
                position,
                character,
            }),
        })
        .collect()
}
