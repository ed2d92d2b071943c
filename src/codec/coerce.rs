//! Scalar value coercion between declared strings and wire-typed values.
//!
//! The declared model carries every scalar as a string; the wire model types
//! them. Coercion policies here are deliberate and pinned by tests:
//! - integers parse as base-10 signed 64-bit and fail loudly on bad input
//! - booleans use the lenient [`lenient_bool`] policy
//! - the decode direction always produces the canonical string form

use crate::codec::CodecError;
use crate::wire::SimpleValue;

/// The boolean coercion policy: only the literal `"true"` is true.
///
/// Any other value, including the empty string for an absent value, maps to
/// `false`. This is not a strict two-value validator; callers needing strict
/// validation must pre-validate upstream.
pub fn lenient_bool(raw: &str) -> bool {
    raw == "true"
}

/// Parse a declared integer value as base-10 signed 64-bit.
pub(crate) fn parse_integer(raw: &str) -> Result<i64, CodecError> {
    raw.parse::<i64>().map_err(|_| CodecError::NotAnInteger {
        value: raw.to_string(),
    })
}

/// Format a wire scalar back to its declared string form.
///
/// Integers format to canonical decimal (no leading zeros or `+`), booleans
/// to the literals `"true"`/`"false"`, unknown subtypes to a stringified
/// rendering of their raw JSON value.
pub(crate) fn format_wire_scalar(value: &SimpleValue) -> String {
    match value {
        SimpleValue::String(s) => s.clone(),
        SimpleValue::Integer(i) => i.to_string(),
        SimpleValue::Boolean(true) => "true".to_string(),
        SimpleValue::Boolean(false) => "false".to_string(),
        SimpleValue::Unknown { value, .. } => stringify_json(value),
    }
}

/// Stringify an arbitrary JSON value: strings verbatim, everything else in
/// its JSON text form.
pub(crate) fn stringify_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
