//! Encoder/decoder for ordered string collections.
//!
//! The declared model only supports string collections, so every element
//! encodes as a wire string value. Decode stringifies whatever scalar
//! subtype the service returns; lossy for non-string subtypes but total.
//! Element order is data and is preserved exactly.

use crate::codec::coerce;
use crate::wire::SimpleValue;

/// Encode declared collection elements, one wire string value per element.
pub(crate) fn encode(values: &[String]) -> Vec<SimpleValue> {
    values
        .iter()
        .map(|v| SimpleValue::String(v.clone()))
        .collect()
}

/// Decode wire collection elements back to their ordered string form.
pub(crate) fn decode(values: &[SimpleValue]) -> Vec<String> {
    values.iter().map(coerce::format_wire_scalar).collect()
}
