//! Bidirectional transform between declared settings and the wire model.
//!
//! The codec is organized leaf-first:
//! - `coerce` - scalar string/wire value coercion policies
//! - `scalar` - simple setting instances
//! - `collection` - ordered string collections
//! - `composite` - choice and group instances with child lists
//!
//! This module orchestrates them across full setting lists. Both directions
//! preserve input order element-for-element; order is observable data for
//! collections and for the drift comparison of top-level lists.

pub mod coerce;

mod collection;
mod composite;
mod scalar;

use tracing::warn;

use crate::models::{DeclaredSetting, SettingValue};
use crate::wire::{ConfiguredSetting, SettingInstance};

/// Failures a single setting can produce while moving between the declared
/// and wire representations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A declared integer value is not valid base-10 signed 64-bit.
    #[error("could not parse '{value}' as a base-10 integer")]
    NotAnInteger { value: String },

    /// A declared collection's serialized source is not valid array syntax.
    #[error("collection value is not a JSON array: {source}")]
    CollectionParse {
        #[source]
        source: serde_json::Error,
    },

    /// A remote child setting is itself a composite, which the declared child
    /// model cannot represent.
    #[error("nested choice or group settings are not supported in children (found at '{definition_id}')")]
    UnsupportedChildNesting { definition_id: String },

    /// A flat entry used a value type outside the supported vocabulary.
    #[error("unknown value type '{kind}'")]
    UnknownValueKind { kind: String },

    /// A flat child entry used a value type children do not support.
    #[error("value type '{kind}' is not allowed for child settings")]
    UnsupportedChildKind { kind: String },
}

/// Encode one declared setting into its wrapped wire form.
pub fn encode_setting(setting: &DeclaredSetting) -> Result<ConfiguredSetting, CodecError> {
    let instance = match &setting.value {
        SettingValue::String { value }
        | SettingValue::Integer { value }
        | SettingValue::Boolean { value } => {
            scalar::encode_instance(&setting.definition_id, setting.value_kind(), value)?
        }
        SettingValue::Collection { values } => SettingInstance::SimpleCollection {
            definition_id: setting.definition_id.clone(),
            values: collection::encode(values),
        },
        SettingValue::Choice { .. } | SettingValue::Group { .. } => composite::encode(setting)?,
    };
    Ok(ConfiguredSetting::new(instance))
}

/// Decode one wrapped wire setting back into the declared model.
///
/// Returns `Ok(None)` for wrappers the engine cannot represent: a wrapper
/// without an instance, or an instance of unknown shape. Both are skipped
/// with a diagnostic rather than failing the list.
pub fn decode_setting(wrapper: &ConfiguredSetting) -> Result<Option<DeclaredSetting>, CodecError> {
    let Some(instance) = &wrapper.setting_instance else {
        warn!("setting without an instance in remote policy, skipping");
        return Ok(None);
    };

    let decoded = match instance {
        SettingInstance::Simple {
            definition_id,
            value,
        } => {
            let (kind, raw) = scalar::decode_value(definition_id, value);
            DeclaredSetting {
                definition_id: definition_id.clone(),
                value: match kind {
                    crate::models::ValueKind::Integer => SettingValue::Integer { value: raw },
                    crate::models::ValueKind::Boolean => SettingValue::Boolean { value: raw },
                    _ => SettingValue::String { value: raw },
                },
            }
        }
        SettingInstance::Choice {
            definition_id,
            value,
        } => DeclaredSetting::choice(
            definition_id.clone(),
            value.value.clone(),
            composite::decode_children(definition_id, &value.children)?,
        ),
        SettingInstance::SimpleCollection {
            definition_id,
            values,
        } => DeclaredSetting::collection(definition_id.clone(), collection::decode(values)),
        SettingInstance::Group {
            definition_id,
            value,
        } => DeclaredSetting::group(
            definition_id.clone(),
            composite::decode_children(definition_id, &value.children)?,
        ),
        SettingInstance::Unknown {
            definition_id,
            odata_type,
        } => {
            warn!(
                %definition_id,
                odata_type = odata_type.as_deref().unwrap_or(""),
                "unrecognized setting instance in remote policy, skipping"
            );
            return Ok(None);
        }
    };

    Ok(Some(decoded))
}

/// Encode an ordered declared setting list into the wire list submitted to
/// the service. The first failing element aborts the call, reported with its
/// definition ID, value kind, and position.
pub fn encode_all(settings: &[DeclaredSetting]) -> crate::Result<Vec<ConfiguredSetting>> {
    settings
        .iter()
        .enumerate()
        .map(|(index, setting)| {
            encode_setting(setting).map_err(|e| {
                crate::Error::setting(
                    index,
                    &setting.definition_id,
                    setting.value_kind().as_str(),
                    e,
                )
            })
        })
        .collect()
}

/// Decode an ordered wire setting list read back from the service.
///
/// Unrepresentable elements are skipped (see [`decode_setting`]); everything
/// else decodes in order. The first failing element aborts the call with its
/// identity and position.
pub fn decode_all(settings: &[ConfiguredSetting]) -> crate::Result<Vec<DeclaredSetting>> {
    let mut decoded = Vec::with_capacity(settings.len());
    for (index, wrapper) in settings.iter().enumerate() {
        match decode_setting(wrapper) {
            Ok(Some(setting)) => decoded.push(setting),
            Ok(None) => {}
            Err(e) => {
                let (definition_id, kind) = match &wrapper.setting_instance {
                    Some(instance) => (instance.definition_id(), instance_kind(instance)),
                    None => ("", "unknown"),
                };
                return Err(crate::Error::setting(index, definition_id, kind, e));
            }
        }
    }
    Ok(decoded)
}

/// Best-effort kind label for error context on the decode path.
fn instance_kind(instance: &SettingInstance) -> &'static str {
    match instance {
        SettingInstance::Simple { value, .. } => match value {
            crate::wire::SimpleValue::Integer(_) => "integer",
            crate::wire::SimpleValue::Boolean(_) => "boolean",
            _ => "string",
        },
        SettingInstance::Choice { .. } => "choice",
        SettingInstance::SimpleCollection { .. } => "collection",
        SettingInstance::Group { .. } => "group",
        SettingInstance::Unknown { .. } => "unknown",
    }
}
