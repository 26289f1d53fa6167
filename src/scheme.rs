//! Scheme rule sets.
//!
//! A [`SchemeRule`] describes one card network: which total lengths it
//! accepts and which leading digits identify it. Rule sets are built once
//! from a dictionary and never mutated afterwards.

use crate::evaluate::{validate_card_length, validate_card_range};
use crate::rule::{parse_validation_rules, ValidationRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The detection rules for a single card scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRule {
    /// Unique key, e.g. `visa`.
    pub id: String,
    /// Display name, e.g. `Visa`.
    pub name: String,
    /// Acceptable total digit counts.
    pub length_validations: Vec<ValidationRule>,
    /// Acceptable leading digit sequences.
    pub range_validations: Vec<ValidationRule>,
    /// Display asset reference. Not used for matching.
    pub icon: String,
}

impl SchemeRule {
    /// Creates a scheme with no rules. It matches nothing until rules are
    /// added.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            length_validations: Vec::new(),
            range_validations: Vec::new(),
            icon: String::new(),
        }
    }

    /// Builder method: parse `text` as the length rule list.
    pub fn lengths(mut self, text: &str) -> Self {
        self.length_validations = parse_validation_rules(text);
        self
    }

    /// Builder method: parse `text` as the range rule list.
    pub fn ranges(mut self, text: &str) -> Self {
        self.range_validations = parse_validation_rules(text);
        self
    }

    /// Builder method to set the icon reference.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Returns true if both the length and the range rules accept the card.
    ///
    /// ```
    /// use card_scheme::SchemeRule;
    ///
    /// let visa = SchemeRule::new("visa", "Visa").lengths("13,16,19").ranges("4");
    /// assert!(visa.matches("4111111111111111"));
    /// assert!(!visa.matches("5111111111111111"));
    /// ```
    #[inline]
    pub fn matches(&self, card_number: &str) -> bool {
        validate_card_length(card_number, &self.length_validations)
            && validate_card_range(card_number, &self.range_validations)
    }
}

impl fmt::Display for SchemeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_parses_rules() {
        let master = SchemeRule::new("master", "Mastercard")
            .lengths("16")
            .ranges("51-55,2221-2720")
            .icon("master.svg");

        assert_eq!(master.length_validations, vec![ValidationRule::Digits(16)]);
        assert_eq!(master.range_validations.len(), 2);
        assert_eq!(master.icon, "master.svg");
        assert_eq!(master.to_string(), "Mastercard");
    }

    #[test]
    fn test_matches_requires_both_lists() {
        let amex = SchemeRule::new("amex", "American Express")
            .lengths("15")
            .ranges("34,37");
        assert!(amex.matches("341111111111111"));
        assert!(!amex.matches("3411111111111111"));
        assert!(!amex.matches("351111111111111"));
    }

    #[test]
    fn test_vacuous_rules_never_match() {
        let no_lengths = SchemeRule::new("a", "A").ranges("4");
        let no_ranges = SchemeRule::new("b", "B").lengths("16");
        assert!(!no_lengths.matches("4111111111111111"));
        assert!(!no_ranges.matches("4111111111111111"));
    }

    #[test]
    fn test_serialized_field_names() {
        let visa = SchemeRule::new("visa", "Visa").lengths("16").ranges("4");
        let json = serde_json::to_value(&visa).unwrap();
        assert!(json.get("lengthValidations").is_some());
        assert!(json.get("rangeValidations").is_some());
    }

    #[test]
    fn test_deserialize_rejects_inverted_length_interval() {
        let json = serde_json::json!({
            "id": "visa",
            "name": "Visa",
            "lengthValidations": [{ "type": "interval", "value": { "min": 19, "max": 13 } }],
            "rangeValidations": [{ "type": "digits", "value": 4 }],
            "icon": ""
        });
        assert!(serde_json::from_value::<SchemeRule>(json).is_err());

        let visa = SchemeRule::new("visa", "Visa").lengths("13-19").ranges("4");
        let back: SchemeRule = serde_json::from_value(serde_json::to_value(&visa).unwrap()).unwrap();
        assert_eq!(back, visa);
    }

    #[test]
    fn test_scheme_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemeRule>();
    }
}
