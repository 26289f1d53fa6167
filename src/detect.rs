//! Scheme detection against a loaded rule collection.
//!
//! Schemes are tried in collection order and the first one whose length and
//! range rules both accept the card wins. Dictionaries are expected to keep
//! their schemes mutually exclusive; where they overlap, list order decides.

use crate::error::ValidationError;
use crate::luhn;
use crate::scheme::SchemeRule;

/// Finds the first scheme whose rules accept the card number.
///
/// Returns `None` when nothing matches or the card number is empty.
///
/// # Example
///
/// ```
/// use card_scheme::{find_matching_card_scheme, SchemeRule};
///
/// let schemes = vec![
///     SchemeRule::new("visa", "Visa").lengths("16").ranges("40-49"),
///     SchemeRule::new("amex", "American Express").lengths("15").ranges("34,37"),
/// ];
///
/// let scheme = find_matching_card_scheme("4111111111111111", &schemes);
/// assert_eq!(scheme.map(|s| s.id.as_str()), Some("visa"));
/// assert!(find_matching_card_scheme("", &schemes).is_none());
/// ```
pub fn find_matching_card_scheme<'a>(
    card_number: &str,
    schemes: &'a [SchemeRule],
) -> Option<&'a SchemeRule> {
    if card_number.is_empty() {
        return None;
    }
    schemes.iter().find(|scheme| scheme.matches(card_number))
}

/// The combined outcome of the checksum and scheme detection for one number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Whether the number passed the Luhn checksum.
    pub checksum_valid: bool,
    /// The detected scheme, if any.
    pub scheme: Option<SchemeRule>,
    empty: bool,
}

impl Assessment {
    /// Returns true if the number can be accepted.
    ///
    /// The checksum must pass and a scheme must have matched. When no rules
    /// are loaded, detection is skipped and the checksum alone decides.
    /// Empty input is never acceptable.
    pub fn is_acceptable(&self, rules_loaded: bool) -> bool {
        !self.empty && self.checksum_valid && (self.scheme.is_some() || !rules_loaded)
    }
}

/// Runs the checksum and scheme detection for one card number.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] if the number contains a
/// non-digit character.
pub fn assess(card_number: &str, schemes: &[SchemeRule]) -> Result<Assessment, ValidationError> {
    let checksum_valid = luhn::is_number_valid(card_number)?;
    Ok(Assessment {
        checksum_valid,
        scheme: find_matching_card_scheme(card_number, schemes).cloned(),
        empty: card_number.is_empty(),
    })
}
