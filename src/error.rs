//! Error types for scheme detection.
//!
//! Two kinds of failure exist: fatal errors that abort a call
//! ([`ValidationError`]) and per-token rule diagnostics ([`RuleError`]) that
//! are reported and then skipped by the rule parser.

use std::fmt;

/// Errors that abort a checksum or dictionary parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A character other than an ASCII digit was passed to the checksum.
    InvalidInput {
        /// The position in the input string (0-indexed, in characters).
        position: usize,
        /// The offending character.
        character: char,
    },

    /// The decoded dictionary payload does not have the expected envelope.
    ///
    /// The envelope must be an object with a `data` array whose entries
    /// carry `id`, `name`, `ranges` and `length` strings.
    MalformedResponse,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput {
                position,
                character,
            } => {
                write!(
                    f,
                    "invalid character '{}' at position {} (only digits allowed)",
                    character.escape_default(),
                    position
                )
            }

            Self::MalformedResponse => write!(f, "Malformed Response"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A single rule token that could not be parsed.
///
/// These never abort parsing; the rule parser drops the token, reports the
/// diagnostic and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The token is not a valid digits or interval rule.
    MalformedRule {
        /// The offending literal. Interval parts are joined with commas.
        literal: String,
    },
}

impl RuleError {
    pub(crate) fn malformed(parts: &[&str]) -> Self {
        Self::MalformedRule {
            literal: parts.join(","),
        }
    }

    /// Returns the literal text that failed to parse.
    pub fn literal(&self) -> &str {
        match self {
            Self::MalformedRule { literal } => literal,
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRule { literal } => write!(f, "Invalid rule - {}", literal),
        }
    }
}

impl std::error::Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::MalformedResponse.to_string(),
            "Malformed Response"
        );

        assert_eq!(
            ValidationError::InvalidInput {
                position: 3,
                character: 'x'
            }
            .to_string(),
            "invalid character 'x' at position 3 (only digits allowed)"
        );
    }

    #[test]
    fn test_rule_error_joins_parts() {
        let err = RuleError::malformed(&["50", "40"]);
        assert_eq!(err.literal(), "50,40");
        assert_eq!(err.to_string(), "Invalid rule - 50,40");

        let err = RuleError::malformed(&["a"]);
        assert_eq!(err.to_string(), "Invalid rule - a");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
        assert_send_sync::<RuleError>();
    }
}
