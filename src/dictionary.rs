//! Decoding of scheme dictionaries.
//!
//! A dictionary is a JSON envelope whose `data` array lists one raw entry per
//! scheme. The `ranges` and `length` strings of each entry are run through
//! the rule parser:
//!
//! ```json
//! {
//!   "type": "dictionary-card-schemes",
//!   "data": [
//!     { "id": "visa", "name": "Visa", "ranges": "4", "length": "13,16,19", "icon": "visa.svg" }
//!   ]
//! }
//! ```
//!
//! Malformed rule tokens inside an entry are dropped with a warning. A
//! malformed envelope or entry fails the whole call with
//! [`ValidationError::MalformedResponse`].

use crate::error::ValidationError;
use crate::rule::parse_validation_rules;
use crate::scheme::SchemeRule;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dictionary entry before its rule strings are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSchemeRule {
    /// Unique scheme key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Range rule text, e.g. `51-55,2221-2720`.
    pub ranges: String,
    /// Length rule text, e.g. `16`.
    pub length: String,
    /// Display asset reference.
    #[serde(default)]
    pub icon: String,
}

impl RawSchemeRule {
    /// Parses the rule strings into a [`SchemeRule`].
    pub fn into_scheme_rule(self) -> SchemeRule {
        SchemeRule {
            range_validations: parse_validation_rules(&self.ranges),
            length_validations: parse_validation_rules(&self.length),
            id: self.id,
            name: self.name,
            icon: self.icon,
        }
    }
}

/// Decodes a dictionary envelope into scheme rule sets, in entry order.
///
/// # Errors
///
/// [`ValidationError::MalformedResponse`] if the value is not an object, has
/// no `data` field, `data` is not an array, or an entry lacks one of the
/// string fields `id`, `name`, `ranges`, `length`.
///
/// # Example
///
/// ```
/// use card_scheme::dictionary::parse_response;
/// use serde_json::json;
///
/// let response = json!({
///     "type": "dictionary-card-schemes",
///     "data": [{ "id": "visa", "name": "Visa", "ranges": "4", "length": "16", "icon": "" }]
/// });
/// let schemes = parse_response(&response).unwrap();
/// assert_eq!(schemes[0].id, "visa");
///
/// assert!(parse_response(&json!([])).is_err());
/// ```
pub fn parse_response(response: &Value) -> Result<Vec<SchemeRule>, ValidationError> {
    let data = response
        .as_object()
        .and_then(|envelope| envelope.get("data"))
        .and_then(Value::as_array)
        .ok_or(ValidationError::MalformedResponse)?;

    let schemes = data
        .iter()
        .map(|entry| {
            RawSchemeRule::deserialize(entry)
                .map(RawSchemeRule::into_scheme_rule)
                .map_err(|e| {
                    tracing::debug!(error = %e, "dictionary entry rejected");
                    ValidationError::MalformedResponse
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(schemes = schemes.len(), "dictionary decoded");
    Ok(schemes)
}

/// Decodes a dictionary from JSON text.
///
/// Text that is not JSON is reported as
/// [`ValidationError::MalformedResponse`].
pub fn parse_response_str(json: &str) -> Result<Vec<SchemeRule>, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|_| ValidationError::MalformedResponse)?;
    parse_response(&value)
}
