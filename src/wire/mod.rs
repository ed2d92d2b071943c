//! Wire model for the settings catalog endpoint.
//!
//! The remote service represents a setting as a polymorphic, recursively
//! nested "setting instance": each element of a policy's setting list is a
//! wrapper object holding one instance, the instance's `@odata.type` tag
//! selects its shape, and choice/group instances carry further wrapper
//! objects as children.
//!
//! The types here are enums-with-payload, so a node can never carry two value
//! shapes at once. On the wire, each JSON object is still the service's flat
//! optional-field form; deserialization dispatches on which value field is
//! populated (mirroring the schema's own polymorphism) and serialization
//! writes the matching `@odata.type` tags back.

use serde::{Deserialize, Serialize};

/// `@odata.type` discriminator strings used by the settings catalog API.
pub mod odata_type {
    pub const SETTING: &str = "#microsoft.graph.deviceManagementConfigurationSetting";

    pub const SIMPLE_INSTANCE: &str =
        "#microsoft.graph.deviceManagementConfigurationSimpleSettingInstance";
    pub const CHOICE_INSTANCE: &str =
        "#microsoft.graph.deviceManagementConfigurationChoiceSettingInstance";
    pub const SIMPLE_COLLECTION_INSTANCE: &str =
        "#microsoft.graph.deviceManagementConfigurationSimpleSettingCollectionInstance";
    pub const GROUP_INSTANCE: &str =
        "#microsoft.graph.deviceManagementConfigurationGroupSettingInstance";

    pub const STRING_VALUE: &str =
        "#microsoft.graph.deviceManagementConfigurationStringSettingValue";
    pub const INTEGER_VALUE: &str =
        "#microsoft.graph.deviceManagementConfigurationIntegerSettingValue";
    pub const BOOLEAN_VALUE: &str =
        "#microsoft.graph.deviceManagementConfigurationBooleanSettingValue";
    pub const CHOICE_VALUE: &str =
        "#microsoft.graph.deviceManagementConfigurationChoiceSettingValue";
    pub const GROUP_VALUE: &str =
        "#microsoft.graph.deviceManagementConfigurationGroupSettingValue";
}

/// One element of a policy's setting list: a wrapper object around a setting
/// instance.
///
/// The service returns wrappers with an `id`; the engine never sends one.
/// A wrapper without an instance is skipped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredSetting {
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub setting_instance: Option<SettingInstance>,
}

impl ConfiguredSetting {
    /// Wrap an instance for submission, tagged with the wrapper's
    /// `@odata.type`.
    pub fn new(instance: SettingInstance) -> Self {
        Self {
            odata_type: Some(odata_type::SETTING.to_string()),
            id: None,
            setting_instance: Some(instance),
        }
    }
}

/// A setting instance: the polymorphic heart of the wire model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSettingInstance", into = "RawSettingInstance")]
pub enum SettingInstance {
    /// A single scalar value.
    Simple {
        definition_id: String,
        value: SimpleValue,
    },
    /// A chosen option, optionally with child settings.
    Choice {
        definition_id: String,
        value: ChoiceValue,
    },
    /// An ordered collection of scalar values.
    SimpleCollection {
        definition_id: String,
        values: Vec<SimpleValue>,
    },
    /// A group of child settings.
    Group {
        definition_id: String,
        value: GroupValue,
    },
    /// An instance shape the engine does not understand (for example a group
    /// setting collection). Skipped on decode with a diagnostic.
    Unknown {
        definition_id: String,
        odata_type: Option<String>,
    },
}

impl SettingInstance {
    /// The definition ID this instance targets.
    pub fn definition_id(&self) -> &str {
        match self {
            Self::Simple { definition_id, .. }
            | Self::Choice { definition_id, .. }
            | Self::SimpleCollection { definition_id, .. }
            | Self::Group { definition_id, .. }
            | Self::Unknown { definition_id, .. } => definition_id,
        }
    }
}

/// A scalar wire value, tagged with its value `@odata.type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSimpleValue", into = "RawSimpleValue")]
pub enum SimpleValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    /// A value subtype the engine does not recognize; the tag and raw value
    /// are preserved so decode can fall back to a stringified form.
    Unknown {
        odata_type: Option<String>,
        value: serde_json::Value,
    },
}

/// The value object of a choice instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceValue {
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,

    /// The chosen option's key.
    pub value: String,

    /// Child settings; omitted from the wire entirely when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfiguredSetting>,
}

impl ChoiceValue {
    pub fn new(value: impl Into<String>, children: Vec<ConfiguredSetting>) -> Self {
        Self {
            odata_type: Some(odata_type::CHOICE_VALUE.to_string()),
            value: value.into(),
            children,
        }
    }
}

/// The value object of a group instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValue {
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,

    /// Child settings; omitted from the wire entirely when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfiguredSetting>,
}

impl GroupValue {
    pub fn new(children: Vec<ConfiguredSetting>) -> Self {
        Self {
            odata_type: Some(odata_type::GROUP_VALUE.to_string()),
            children,
        }
    }
}

/// The service's flat optional-field form of a setting instance.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettingInstance {
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    odata_type: Option<String>,

    #[serde(default)]
    setting_definition_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    simple_setting_value: Option<SimpleValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice_setting_value: Option<ChoiceValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    simple_setting_collection_value: Vec<SimpleValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_setting_value: Option<GroupValue>,
}

impl From<RawSettingInstance> for SettingInstance {
    fn from(raw: RawSettingInstance) -> Self {
        let definition_id = raw.setting_definition_id;
        // Dispatch on which value field is populated, like the wire schema's
        // own polymorphism; the @odata.type tag is advisory on decode.
        if let Some(value) = raw.simple_setting_value {
            Self::Simple { definition_id, value }
        } else if let Some(value) = raw.choice_setting_value {
            Self::Choice { definition_id, value }
        } else if !raw.simple_setting_collection_value.is_empty() {
            Self::SimpleCollection {
                definition_id,
                values: raw.simple_setting_collection_value,
            }
        } else if let Some(value) = raw.group_setting_value {
            Self::Group { definition_id, value }
        } else {
            Self::Unknown {
                definition_id,
                odata_type: raw.odata_type,
            }
        }
    }
}

impl From<SettingInstance> for RawSettingInstance {
    fn from(instance: SettingInstance) -> Self {
        let mut raw = RawSettingInstance {
            odata_type: None,
            setting_definition_id: instance.definition_id().to_string(),
            simple_setting_value: None,
            choice_setting_value: None,
            simple_setting_collection_value: Vec::new(),
            group_setting_value: None,
        };
        match instance {
            SettingInstance::Simple { value, .. } => {
                raw.odata_type = Some(odata_type::SIMPLE_INSTANCE.to_string());
                raw.simple_setting_value = Some(value);
            }
            SettingInstance::Choice { value, .. } => {
                raw.odata_type = Some(odata_type::CHOICE_INSTANCE.to_string());
                raw.choice_setting_value = Some(value);
            }
            SettingInstance::SimpleCollection { values, .. } => {
                raw.odata_type = Some(odata_type::SIMPLE_COLLECTION_INSTANCE.to_string());
                raw.simple_setting_collection_value = values;
            }
            SettingInstance::Group { value, .. } => {
                raw.odata_type = Some(odata_type::GROUP_INSTANCE.to_string());
                raw.group_setting_value = Some(value);
            }
            SettingInstance::Unknown { odata_type, .. } => {
                raw.odata_type = odata_type;
            }
        }
        raw
    }
}

/// The service's flat form of a scalar value.
#[derive(Serialize, Deserialize)]
struct RawSimpleValue {
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    odata_type: Option<String>,

    #[serde(default)]
    value: serde_json::Value,
}

impl From<RawSimpleValue> for SimpleValue {
    fn from(raw: RawSimpleValue) -> Self {
        let RawSimpleValue { odata_type, value } = raw;
        let tag = odata_type.clone();
        match (tag.as_deref(), value) {
            (Some(odata_type::STRING_VALUE), serde_json::Value::String(s)) => Self::String(s),
            (Some(odata_type::INTEGER_VALUE), serde_json::Value::Number(n)) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Unknown {
                    odata_type,
                    value: serde_json::Value::Number(n),
                },
            },
            (Some(odata_type::BOOLEAN_VALUE), serde_json::Value::Bool(b)) => Self::Boolean(b),
            (_, value) => Self::Unknown { odata_type, value },
        }
    }
}

impl From<SimpleValue> for RawSimpleValue {
    fn from(value: SimpleValue) -> Self {
        match value {
            SimpleValue::String(s) => RawSimpleValue {
                odata_type: Some(odata_type::STRING_VALUE.to_string()),
                value: serde_json::Value::String(s),
            },
            SimpleValue::Integer(i) => RawSimpleValue {
                odata_type: Some(odata_type::INTEGER_VALUE.to_string()),
                value: serde_json::Value::from(i),
            },
            SimpleValue::Boolean(b) => RawSimpleValue {
                odata_type: Some(odata_type::BOOLEAN_VALUE.to_string()),
                value: serde_json::Value::Bool(b),
            },
            SimpleValue::Unknown { odata_type, value } => RawSimpleValue { odata_type, value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_instance_json_shape() {
        let instance = SettingInstance::Simple {
            definition_id: "device_vendor_msft_example".to_string(),
            value: SimpleValue::Boolean(false),
        };
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["@odata.type"], odata_type::SIMPLE_INSTANCE);
        assert_eq!(json["settingDefinitionId"], "device_vendor_msft_example");
        assert_eq!(json["simpleSettingValue"]["@odata.type"], odata_type::BOOLEAN_VALUE);
        assert_eq!(json["simpleSettingValue"]["value"], false);
    }

    #[test]
    fn test_instance_decode_dispatches_on_populated_field() {
        let json = serde_json::json!({
            "settingDefinitionId": "d",
            "choiceSettingValue": { "value": "d_1" }
        });
        let instance: SettingInstance = serde_json::from_value(json).unwrap();
        assert!(matches!(instance, SettingInstance::Choice { .. }));
    }

    #[test]
    fn test_unknown_instance_preserves_tag() {
        let json = serde_json::json!({
            "@odata.type": "#microsoft.graph.deviceManagementConfigurationGroupSettingCollectionInstance",
            "settingDefinitionId": "d",
            "groupSettingCollectionValue": [{}]
        });
        let instance: SettingInstance = serde_json::from_value(json).unwrap();
        match instance {
            SettingInstance::Unknown { definition_id, odata_type } => {
                assert_eq!(definition_id, "d");
                assert!(odata_type.unwrap().contains("GroupSettingCollection"));
            }
            other => panic!("expected unknown instance, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_simple_value_subtype_roundtrips() {
        let json = serde_json::json!({
            "@odata.type": "#microsoft.graph.deviceManagementConfigurationReferenceSettingValue",
            "value": 7
        });
        let value: SimpleValue = serde_json::from_value(json.clone()).unwrap();
        assert!(matches!(value, SimpleValue::Unknown { .. }));
        assert_eq!(serde_json::to_value(&value).unwrap(), json);
    }

    #[test]
    fn test_empty_children_omitted_from_wire() {
        let instance = SettingInstance::Group {
            definition_id: "g".to_string(),
            value: GroupValue::new(Vec::new()),
        };
        let json = serde_json::to_value(&instance).unwrap();
        assert!(json["groupSettingValue"].get("children").is_none());
    }

    #[test]
    fn test_wrapper_roundtrip_with_id() {
        let json = serde_json::json!({
            "@odata.type": odata_type::SETTING,
            "id": "0",
            "settingInstance": {
                "@odata.type": odata_type::SIMPLE_INSTANCE,
                "settingDefinitionId": "d",
                "simpleSettingValue": {
                    "@odata.type": odata_type::STRING_VALUE,
                    "value": "v"
                }
            }
        });
        let wrapper: ConfiguredSetting = serde_json::from_value(json).unwrap();
        assert_eq!(wrapper.id.as_deref(), Some("0"));
        let instance = wrapper.setting_instance.unwrap();
        assert_eq!(instance.definition_id(), "d");
        assert_eq!(
            instance,
            SettingInstance::Simple {
                definition_id: "d".to_string(),
                value: SimpleValue::String("v".to_string()),
            }
        );
    }
}
