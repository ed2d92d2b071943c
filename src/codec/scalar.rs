//! Encoder/decoder for the scalar setting kinds.

use tracing::warn;

use crate::codec::{CodecError, coerce};
use crate::models::ValueKind;
use crate::wire::{SettingInstance, SimpleValue};

/// Coerce a declared scalar into its wire value.
///
/// Only the three scalar kinds reach here; the callers dispatch on the
/// declared value variant, so anything else is a programming error.
pub(crate) fn encode_value(kind: ValueKind, raw: &str) -> Result<SimpleValue, CodecError> {
    match kind {
        ValueKind::String => Ok(SimpleValue::String(raw.to_string())),
        ValueKind::Integer => Ok(SimpleValue::Integer(coerce::parse_integer(raw)?)),
        ValueKind::Boolean => Ok(SimpleValue::Boolean(coerce::lenient_bool(raw))),
        other => unreachable!("non-scalar kind {other} passed to the scalar encoder"),
    }
}

/// Encode a declared scalar setting into a simple setting instance.
pub(crate) fn encode_instance(
    definition_id: &str,
    kind: ValueKind,
    raw: &str,
) -> Result<SettingInstance, CodecError> {
    Ok(SettingInstance::Simple {
        definition_id: definition_id.to_string(),
        value: encode_value(kind, raw)?,
    })
}

/// Decode a wire scalar into its declared kind and string value.
///
/// The wire subtype tag determines the kind. An unrecognized subtype decodes
/// leniently as a string with the verbatim stringified value; this favors
/// availability over strictness and is logged rather than raised.
pub(crate) fn decode_value(definition_id: &str, value: &SimpleValue) -> (ValueKind, String) {
    let kind = match value {
        SimpleValue::String(_) => ValueKind::String,
        SimpleValue::Integer(_) => ValueKind::Integer,
        SimpleValue::Boolean(_) => ValueKind::Boolean,
        SimpleValue::Unknown { odata_type, .. } => {
            warn!(
                definition_id,
                odata_type = odata_type.as_deref().unwrap_or(""),
                "unrecognized simple setting value subtype, decoding as string"
            );
            ValueKind::String
        }
    };
    (kind, coerce::format_wire_scalar(value))
}
