//! Evaluation of parsed rules against a candidate card number.
//!
//! Both predicates return `true` when any rule in the list matches, stopping
//! at the first match. An empty list never matches.

use crate::rule::ValidationRule;
use std::fmt::Write;

/// Checks the card's digit count against a list of length rules.
///
/// A digits rule matches an exact length; an interval matches any length in
/// `min..=max`.
///
/// ```
/// use card_scheme::evaluate::validate_card_length;
/// use card_scheme::ValidationRule;
///
/// let rules = [ValidationRule::Digits(16)];
/// assert!(validate_card_length("4111111111111111", &rules));
/// assert!(!validate_card_length("411111111111111", &rules));
/// ```
pub fn validate_card_length(card_number: &str, length_rules: &[ValidationRule]) -> bool {
    let length = card_number.len() as u64;
    length_rules.iter().any(|rule| match *rule {
        ValidationRule::Digits(value) => length == value,
        ValidationRule::Interval { min, max } => min <= length && length <= max,
    })
}

/// Checks the card's leading digits against a list of range rules.
///
/// A digits rule matches when the card starts with the decimal text of its
/// value. An interval matches when the card starts with the decimal text of
/// some integer in `min..=max`; every integer in the interval is tried as a
/// prefix in turn, so `3-40` accepts a card starting with `39` as well as one
/// starting with `4`.
///
/// ```
/// use card_scheme::evaluate::validate_card_range;
/// use card_scheme::ValidationRule;
///
/// let rules = [ValidationRule::Interval { min: 40, max: 44 }];
/// assert!(validate_card_range("4211111111111111", &rules));
/// assert!(!validate_card_range("4511111111111111", &rules));
/// ```
pub fn validate_card_range(card_number: &str, range_rules: &[ValidationRule]) -> bool {
    let mut prefix = String::with_capacity(20);
    range_rules.iter().any(|rule| match *rule {
        ValidationRule::Digits(value) => starts_with_number(card_number, value, &mut prefix),
        ValidationRule::Interval { min, max } => {
            (min..=max).any(|i| starts_with_number(card_number, i, &mut prefix))
        }
    })
}

#[inline]
fn starts_with_number(card_number: &str, value: u64, buf: &mut String) -> bool {
    buf.clear();
    // Writing into a String cannot fail.
    let _ = write!(buf, "{}", value);
    card_number.starts_with(buf.as_str())
}
