//! Codec for the composite setting kinds (choice and group).
//!
//! Composites are the recursive heart of the engine: both kinds carry an
//! ordered child list of wrapper nodes, and a choice additionally carries the
//! chosen option key. Declared children are restricted to the scalar kinds
//! plus choice, so encoding terminates at depth one by construction. On
//! decode, a child that is itself a further composite cannot be represented
//! in the declared model and fails with
//! [`CodecError::UnsupportedChildNesting`] rather than being silently
//! dropped, since silent loss would defeat the round-trip contract drift
//! detection relies on.

use tracing::warn;

use crate::codec::{CodecError, scalar};
use crate::models::{ChildSetting, ChildValue, DeclaredSetting, SettingValue, ValueKind};
use crate::wire::{ChoiceValue, ConfiguredSetting, GroupValue, SettingInstance};

/// Encode a declared choice or group setting into its wire instance.
pub(crate) fn encode(setting: &DeclaredSetting) -> Result<SettingInstance, CodecError> {
    match &setting.value {
        SettingValue::Choice { value, children } => Ok(SettingInstance::Choice {
            definition_id: setting.definition_id.clone(),
            value: ChoiceValue::new(value.clone(), encode_children(children)?),
        }),
        SettingValue::Group { children } => Ok(SettingInstance::Group {
            definition_id: setting.definition_id.clone(),
            value: GroupValue::new(encode_children(children)?),
        }),
        other => unreachable!(
            "non-composite value {:?} passed to the composite encoder",
            other
        ),
    }
}

fn encode_children(children: &[ChildSetting]) -> Result<Vec<ConfiguredSetting>, CodecError> {
    children.iter().map(encode_child).collect()
}

/// Encode one declared child into a wrapped wire instance.
fn encode_child(child: &ChildSetting) -> Result<ConfiguredSetting, CodecError> {
    let instance = match &child.value {
        ChildValue::String(_) | ChildValue::Integer(_) | ChildValue::Boolean(_) => {
            scalar::encode_instance(&child.definition_id, child.value_kind(), child.raw_value())?
        }
        // A child choice carries no children of its own.
        ChildValue::Choice(value) => SettingInstance::Choice {
            definition_id: child.definition_id.clone(),
            value: ChoiceValue::new(value.clone(), Vec::new()),
        },
    };
    Ok(ConfiguredSetting::new(instance))
}

/// Decode the child list of a choice or group value.
///
/// Wrapper nodes without an instance and instances of unknown shape are
/// skipped with a diagnostic, mirroring the top-level decode. A child that is
/// a group, a collection, or a choice carrying its own children is a hard
/// error naming the offending definition ID.
pub(crate) fn decode_children(
    parent_id: &str,
    children: &[ConfiguredSetting],
) -> Result<Vec<ChildSetting>, CodecError> {
    let mut decoded = Vec::new();

    for wrapper in children {
        let Some(instance) = &wrapper.setting_instance else {
            warn!(parent_id, "child setting without an instance, skipping");
            continue;
        };

        match instance {
            SettingInstance::Simple {
                definition_id,
                value,
            } => {
                let (kind, raw) = scalar::decode_value(definition_id, value);
                let value = match kind {
                    ValueKind::Integer => ChildValue::Integer(raw),
                    ValueKind::Boolean => ChildValue::Boolean(raw),
                    // String proper, or the lenient unknown-subtype fallback.
                    _ => ChildValue::String(raw),
                };
                decoded.push(ChildSetting {
                    definition_id: definition_id.clone(),
                    value,
                });
            }
            SettingInstance::Choice {
                definition_id,
                value,
            } => {
                if !value.children.is_empty() {
                    return Err(CodecError::UnsupportedChildNesting {
                        definition_id: definition_id.clone(),
                    });
                }
                decoded.push(ChildSetting {
                    definition_id: definition_id.clone(),
                    value: ChildValue::Choice(value.value.clone()),
                });
            }
            SettingInstance::SimpleCollection { definition_id, .. }
            | SettingInstance::Group { definition_id, .. } => {
                return Err(CodecError::UnsupportedChildNesting {
                    definition_id: definition_id.clone(),
                });
            }
            SettingInstance::Unknown {
                definition_id,
                odata_type,
            } => {
                warn!(
                    parent_id,
                    %definition_id,
                    odata_type = odata_type.as_deref().unwrap_or(""),
                    "unrecognized child setting instance, skipping"
                );
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::SimpleValue;

    #[test]
    fn test_choice_with_children_roundtrip() {
        let setting = DeclaredSetting::choice(
            "parent",
            "parent_1",
            vec![
                ChildSetting::string("child_a", "hello"),
                ChildSetting::boolean("child_b", "true"),
            ],
        );

        let instance = encode(&setting).unwrap();
        let SettingInstance::Choice { definition_id, value } = &instance else {
            panic!("expected choice instance");
        };
        assert_eq!(definition_id, "parent");
        assert_eq!(value.value, "parent_1");
        assert_eq!(value.children.len(), 2);

        let children = decode_children("parent", &value.children).unwrap();
        assert_eq!(children, setting.children());
    }

    #[test]
    fn test_group_with_no_children_encodes_empty() {
        let setting = DeclaredSetting::group("g", Vec::new());
        let instance = encode(&setting).unwrap();
        let SettingInstance::Group { value, .. } = &instance else {
            panic!("expected group instance");
        };
        assert!(value.children.is_empty());
        assert!(decode_children("g", &value.children).unwrap().is_empty());
    }

    #[test]
    fn test_child_integer_coercion_error_propagates() {
        let setting =
            DeclaredSetting::group("g", vec![ChildSetting::integer("child", "abc")]);
        assert!(matches!(
            encode(&setting),
            Err(CodecError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_nested_group_child_is_rejected() {
        let nested = ConfiguredSetting::new(SettingInstance::Group {
            definition_id: "inner_group".to_string(),
            value: GroupValue::new(Vec::new()),
        });
        let err = decode_children("parent", &[nested]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedChildNesting { definition_id } if definition_id == "inner_group"
        ));
    }

    #[test]
    fn test_choice_child_with_grandchildren_is_rejected() {
        let grandchild = ConfiguredSetting::new(SettingInstance::Simple {
            definition_id: "grandchild".to_string(),
            value: SimpleValue::String("v".to_string()),
        });
        let nested = ConfiguredSetting::new(SettingInstance::Choice {
            definition_id: "inner_choice".to_string(),
            value: ChoiceValue::new("inner_choice_1", vec![grandchild]),
        });
        let err = decode_children("parent", &[nested]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedChildNesting { definition_id } if definition_id == "inner_choice"
        ));
    }

    #[test]
    fn test_unknown_child_instance_is_skipped() {
        let unknown = ConfiguredSetting::new(SettingInstance::Unknown {
            definition_id: "mystery".to_string(),
            odata_type: Some("#microsoft.graph.futureInstance".to_string()),
        });
        let keep = ConfiguredSetting::new(SettingInstance::Simple {
            definition_id: "kept".to_string(),
            value: SimpleValue::Integer(1),
        });
        let children = decode_children("parent", &[unknown, keep]).unwrap();
        assert_eq!(children, vec![ChildSetting::integer("kept", "1")]);
    }
}
