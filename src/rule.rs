//! Parsing of the compact rule grammar used by scheme dictionaries.
//!
//! A rule list is a comma-separated sequence of tokens. Each token is either
//! a single integer or two integers joined by a hyphen:
//!
//! ```text
//! 4,40-49,2221-2720
//! ```
//!
//! The same parsed form serves two purposes. In a `length` list a digits rule
//! is an exact digit count; in a `ranges` list it is a leading digit
//! sequence. See [`crate::evaluate`] for how each context interprets it.
//!
//! Malformed tokens are dropped. Each one produces a [`RuleError`] that is
//! logged at `warn` level and, for [`parse_validation_rules_with`], handed to
//! the caller. The remaining tokens are still parsed.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parsed rule.
///
/// Serializes as `{"type": "digits", "value": 4}` or
/// `{"type": "interval", "value": {"min": 40, "max": 49}}`. Deserializing an
/// interval with `min > max` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "value",
    rename_all = "lowercase",
    try_from = "UncheckedRule"
)]
pub enum ValidationRule {
    /// An exact digit count or an exact leading digit sequence.
    Digits(u64),
    /// A closed range, `min <= max`.
    Interval {
        /// Lower bound (inclusive).
        min: u64,
        /// Upper bound (inclusive).
        max: u64,
    },
}

impl ValidationRule {
    /// Creates an interval rule, or `None` when `min > max`.
    pub const fn interval(min: u64, max: u64) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self::Interval { min, max })
        }
    }
}

/// Wire form of [`ValidationRule`] before the interval bounds are checked.
#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum UncheckedRule {
    Digits(u64),
    Interval { min: u64, max: u64 },
}

impl TryFrom<UncheckedRule> for ValidationRule {
    type Error = RuleError;

    fn try_from(rule: UncheckedRule) -> Result<Self, Self::Error> {
        match rule {
            UncheckedRule::Digits(value) => Ok(Self::Digits(value)),
            UncheckedRule::Interval { min, max } => Self::interval(min, max).ok_or_else(|| {
                RuleError::MalformedRule {
                    literal: format!("{},{}", min, max),
                }
            }),
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digits(value) => write!(f, "{}", value),
            Self::Interval { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

/// Parses a comma-separated rule list, dropping malformed tokens.
///
/// Never fails. Dropped tokens are logged at `warn` level.
///
/// # Example
///
/// ```
/// use card_scheme::rule::{parse_validation_rules, ValidationRule};
///
/// assert_eq!(
///     parse_validation_rules("4,40-49,x"),
///     vec![
///         ValidationRule::Digits(4),
///         ValidationRule::Interval { min: 40, max: 49 },
///     ]
/// );
/// ```
pub fn parse_validation_rules(text: &str) -> Vec<ValidationRule> {
    parse_validation_rules_with(text, |_| {})
}

/// Like [`parse_validation_rules`], also passing each dropped token's
/// diagnostic to `sink` in token order.
pub fn parse_validation_rules_with<F>(text: &str, mut sink: F) -> Vec<ValidationRule>
where
    F: FnMut(RuleError),
{
    text.split(',').fold(Vec::new(), |mut rules, token| {
        let parts: Vec<&str> = token.split('-').collect();
        let parsed = if parts.len() > 1 {
            parse_interval_rule(&parts)
        } else {
            parse_digits_rule(&parts)
        };

        match parsed {
            Ok(rule) => rules.push(rule),
            Err(err) => {
                tracing::warn!(target: "card_scheme::rule", literal = err.literal(), "{}", err);
                sink(err);
            }
        }
        rules
    })
}

/// Parses a digits rule from the parts of a single token.
///
/// Only the first part is considered.
pub fn parse_digits_rule(parts: &[&str]) -> Result<ValidationRule, RuleError> {
    let literal = parts.first().copied().unwrap_or_default();
    parse_integer(literal)
        .map(ValidationRule::Digits)
        .ok_or_else(|| RuleError::malformed(&[literal]))
}

/// Parses an interval rule from exactly two parts, `min` then `max`.
pub fn parse_interval_rule(parts: &[&str]) -> Result<ValidationRule, RuleError> {
    let [min, max] = parts else {
        return Err(RuleError::malformed(parts));
    };

    match (parse_integer(min), parse_integer(max)) {
        (Some(min), Some(max)) => {
            ValidationRule::interval(min, max).ok_or_else(|| RuleError::malformed(parts))
        }
        _ => Err(RuleError::malformed(parts)),
    }
}

/// Renders rules back into the textual grammar.
pub fn format_rules(rules: &[ValidationRule]) -> String {
    rules
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Reads the leading integer of a literal.
///
/// Leading whitespace and one `+` sign are skipped and parsing stops at the
/// first non-digit, so `" 16"`, `"+16"` and `"16abc"` all read as 16. A literal without a leading digit,
/// or one that does not fit in a `u64`, is rejected.
fn parse_integer(literal: &str) -> Option<u64> {
    let trimmed = literal.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}
