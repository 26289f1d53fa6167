//! # card_scheme
//!
//! Card scheme detection driven by textual BIN rule dictionaries, plus Luhn
//! checksum validation.
//!
//! ## Features
//!
//! - Luhn checksum over digit strings of any length
//! - Parser for the compact rule grammar (`4,40-49,2221-2720`)
//! - Length and prefix-range evaluation
//! - First-match scheme detection over a rule collection
//! - Dictionary decoding, remote fetch with retry, session rule cache
//! - Multiple interfaces: library, CLI, REST API
//!
//! ## Quick Start
//!
//! ```rust
//! use card_scheme::{find_matching_card_scheme, is_number_valid, SchemeRule};
//!
//! let schemes = vec![
//!     SchemeRule::new("visa", "Visa").lengths("13,16,19").ranges("4"),
//!     SchemeRule::new("master", "Mastercard").lengths("16").ranges("51-55,2221-2720"),
//! ];
//!
//! let scheme = find_matching_card_scheme("5105105105105100", &schemes).unwrap();
//! assert_eq!(scheme.name, "Mastercard");
//!
//! assert_eq!(is_number_valid("5105105105105100"), Ok(true));
//! assert_eq!(is_number_valid("5105105105105101"), Ok(false));
//! ```
//!
//! ## Rule Grammar
//!
//! ```rust
//! use card_scheme::{parse_validation_rules, ValidationRule};
//!
//! let rules = parse_validation_rules("4,40-49,oops");
//! assert_eq!(rules, vec![
//!     ValidationRule::Digits(4),
//!     ValidationRule::Interval { min: 40, max: 49 },
//! ]);
//! ```
//!
//! Malformed tokens such as `oops` above are dropped and logged through
//! `tracing` at `warn` level.
//!
//! ## Dictionaries
//!
//! ```rust
//! use card_scheme::dictionary::parse_response_str;
//! use card_scheme::RuleCache;
//!
//! let json = r#"{
//!     "type": "dictionary-card-schemes",
//!     "data": [
//!         { "id": "amex", "name": "American Express", "ranges": "34,37", "length": "15", "icon": "amex.svg" }
//!     ]
//! }"#;
//!
//! let cache = RuleCache::new();
//! cache.replace(parse_response_str(json).unwrap());
//! assert_eq!(cache.detect("378282246310005").unwrap().id, "amex");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `fetch` | Remote dictionary fetch with retry (reqwest + tokio) |
//! | `parallel` | Rayon-based batch detection |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod cache;
pub mod detect;
pub mod dictionary;
pub mod error;
pub mod evaluate;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod luhn;
pub mod rule;
pub mod scheme;

// Re-export main types at crate root
pub use cache::RuleCache;
pub use detect::{assess, find_matching_card_scheme, Assessment};
pub use error::{RuleError, ValidationError};
pub use evaluate::{validate_card_length, validate_card_range};
pub use luhn::is_number_valid;
pub use rule::{parse_validation_rules, ValidationRule};
pub use scheme::SchemeRule;

#[cfg(test)]
mod tests {
    use super::*;

    fn schemes() -> Vec<SchemeRule> {
        dictionary::parse_response(&serde_json::json!({
            "type": "dictionary-card-schemes",
            "data": [
                { "id": "visa", "name": "Visa", "ranges": "4", "length": "13,16,19", "icon": "visa.svg" },
                { "id": "master", "name": "Mastercard", "ranges": "51-55,2221-2720", "length": "16", "icon": "master.svg" },
                { "id": "amex", "name": "American Express", "ranges": "34,37", "length": "15", "icon": "amex.svg" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_end_to_end_detection() {
        let schemes = schemes();
        let visa = find_matching_card_scheme("4111111111111111", &schemes).unwrap();
        assert_eq!(visa.id, "visa");
        assert_eq!(visa.icon, "visa.svg");
        assert_eq!(is_number_valid("4111111111111111"), Ok(true));
    }

    #[test]
    fn test_detection_independent_of_checksum() {
        // Bad check digit, still a Visa by prefix and length.
        let schemes = schemes();
        assert!(find_matching_card_scheme("4111111111111112", &schemes).is_some());
        assert_eq!(is_number_valid("4111111111111112"), Ok(false));
    }

    #[test]
    fn test_thread_safety() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemeRule>();
        assert_send_sync::<ValidationRule>();
        assert_send_sync::<ValidationError>();
        assert_send_sync::<RuleCache>();
        assert_send_sync::<Assessment>();
    }
}
