//! Declared setting models.
//!
//! This module defines the user-authored side of the engine:
//! - `DeclaredSetting` - a top-level configuration entry with a typed value
//! - `ChildSetting` - a nested entry below a choice or group parent
//! - `SettingEntry` / `ChildEntry` - the flat, all-strings form settings
//!   arrive in from configuration input, and its conversion into the typed
//!   model
//!
//! The typed value is a sum over the six supported kinds, so a setting can
//! never carry (say) both a choice value and a collection value. Declared
//! settings are rebuilt from configuration on every reconciliation pass; the
//! remote service is the sole durable store.

use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError};

/// The six value kinds a declared setting can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    Choice,
    Collection,
    Group,
}

impl ValueKind {
    /// Parse a value kind from its configuration vocabulary string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "choice" => Some(Self::Choice),
            "collection" => Some(Self::Collection),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::Collection => "collection",
            Self::Group => "group",
        }
    }

    /// Whether this kind carries a plain scalar value.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Boolean)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The typed value of a top-level declared setting.
///
/// Scalar values are stored as strings (the declared model is string-typed;
/// coercion to wire types happens in the codec). Only choice and group
/// variants can carry children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "value_type", rename_all = "snake_case")]
pub enum SettingValue {
    String {
        value: String,
    },
    Integer {
        value: String,
    },
    Boolean {
        value: String,
    },
    Choice {
        value: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<ChildSetting>,
    },
    Collection {
        values: Vec<String>,
    },
    Group {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<ChildSetting>,
    },
}

/// A single top-level configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredSetting {
    /// Definition ID identifying the target setting in the remote catalog.
    pub definition_id: String,

    /// The typed value.
    #[serde(flatten)]
    pub value: SettingValue,
}

impl DeclaredSetting {
    /// Create a string setting.
    pub fn string(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::String { value: value.into() },
        }
    }

    /// Create an integer setting. The value stays a string until encode time,
    /// where a malformed integer fails coercion.
    pub fn integer(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::Integer { value: value.into() },
        }
    }

    /// Create a boolean setting. Only the literal `"true"` encodes to wire
    /// `true`; see [`crate::codec::coerce::lenient_bool`].
    pub fn boolean(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::Boolean { value: value.into() },
        }
    }

    /// Create a choice setting with the chosen option key and optional
    /// children.
    pub fn choice(
        definition_id: impl Into<String>,
        value: impl Into<String>,
        children: Vec<ChildSetting>,
    ) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::Choice {
                value: value.into(),
                children,
            },
        }
    }

    /// Create a collection setting. Order is data and is preserved
    /// end-to-end.
    pub fn collection(definition_id: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::Collection { values },
        }
    }

    /// Create a group setting holding child settings.
    pub fn group(definition_id: impl Into<String>, children: Vec<ChildSetting>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: SettingValue::Group { children },
        }
    }

    /// The value kind of this setting.
    pub fn value_kind(&self) -> ValueKind {
        match &self.value {
            SettingValue::String { .. } => ValueKind::String,
            SettingValue::Integer { .. } => ValueKind::Integer,
            SettingValue::Boolean { .. } => ValueKind::Boolean,
            SettingValue::Choice { .. } => ValueKind::Choice,
            SettingValue::Collection { .. } => ValueKind::Collection,
            SettingValue::Group { .. } => ValueKind::Group,
        }
    }

    /// The children of this setting; empty for non-composite kinds.
    pub fn children(&self) -> &[ChildSetting] {
        match &self.value {
            SettingValue::Choice { children, .. } | SettingValue::Group { children } => children,
            _ => &[],
        }
    }

    /// Convert back to the flat configuration form.
    ///
    /// Collections serialize to a canonical JSON array string; groups have no
    /// value of their own.
    pub fn to_entry(&self) -> SettingEntry {
        let (value, children) = match &self.value {
            SettingValue::String { value }
            | SettingValue::Integer { value }
            | SettingValue::Boolean { value } => (Some(value.clone()), Vec::new()),
            SettingValue::Choice { value, children } => (
                Some(value.clone()),
                children.iter().map(ChildSetting::to_entry).collect(),
            ),
            SettingValue::Collection { values } => (
                Some(serde_json::Value::from(values.clone()).to_string()),
                Vec::new(),
            ),
            SettingValue::Group { children } => {
                (None, children.iter().map(ChildSetting::to_entry).collect())
            }
        };
        SettingEntry {
            definition_id: self.definition_id.clone(),
            value_type: self.value_kind().as_str().to_string(),
            value,
            children,
        }
    }
}

/// The typed value of a child setting.
///
/// Children are restricted to the scalar kinds plus choice; a child cannot
/// carry further children, so composite nesting terminates at depth one by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "value_type", content = "value", rename_all = "snake_case")]
pub enum ChildValue {
    String(String),
    Integer(String),
    Boolean(String),
    Choice(String),
}

/// A nested entry one level below a choice or group parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSetting {
    /// Definition ID of the child setting.
    pub definition_id: String,

    /// The typed value.
    #[serde(flatten)]
    pub value: ChildValue,
}

impl ChildSetting {
    /// Create a string child.
    pub fn string(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: ChildValue::String(value.into()),
        }
    }

    /// Create an integer child.
    pub fn integer(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: ChildValue::Integer(value.into()),
        }
    }

    /// Create a boolean child.
    pub fn boolean(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: ChildValue::Boolean(value.into()),
        }
    }

    /// Create a choice child holding the chosen option key.
    pub fn choice(definition_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            value: ChildValue::Choice(value.into()),
        }
    }

    /// The value kind of this child.
    pub fn value_kind(&self) -> ValueKind {
        match &self.value {
            ChildValue::String(_) => ValueKind::String,
            ChildValue::Integer(_) => ValueKind::Integer,
            ChildValue::Boolean(_) => ValueKind::Boolean,
            ChildValue::Choice(_) => ValueKind::Choice,
        }
    }

    /// The raw string value.
    pub fn raw_value(&self) -> &str {
        match &self.value {
            ChildValue::String(v)
            | ChildValue::Integer(v)
            | ChildValue::Boolean(v)
            | ChildValue::Choice(v) => v,
        }
    }

    /// Convert back to the flat configuration form.
    pub fn to_entry(&self) -> ChildEntry {
        ChildEntry {
            definition_id: self.definition_id.clone(),
            value_type: self.value_kind().as_str().to_string(),
            value: self.raw_value().to_string(),
        }
    }
}

/// The flat, all-strings form a setting arrives in from configuration input.
///
/// `value_type` uses the vocabulary
/// `string | integer | boolean | choice | collection | group`; collection
/// values are a serialized JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub definition_id: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildEntry>,
}

/// The flat form of a child setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    pub definition_id: String,
    pub value_type: String,
    #[serde(default)]
    pub value: String,
}

impl SettingEntry {
    /// Convert into the typed declared model.
    ///
    /// Fails when the value type is unknown, a collection value is not valid
    /// JSON array syntax, or a child uses a kind children do not support.
    /// Children are only meaningful for choice and group entries and are
    /// ignored for other kinds. A missing value is treated as the empty
    /// string.
    pub fn into_declared(self) -> Result<DeclaredSetting, CodecError> {
        let kind = ValueKind::parse(&self.value_type).ok_or_else(|| CodecError::UnknownValueKind {
            kind: self.value_type.clone(),
        })?;
        let raw = self.value.unwrap_or_default();

        let value = match kind {
            ValueKind::String => SettingValue::String { value: raw },
            ValueKind::Integer => SettingValue::Integer { value: raw },
            ValueKind::Boolean => SettingValue::Boolean { value: raw },
            ValueKind::Choice => SettingValue::Choice {
                value: raw,
                children: convert_children(self.children)?,
            },
            ValueKind::Collection => SettingValue::Collection {
                values: parse_collection(&raw)?,
            },
            ValueKind::Group => SettingValue::Group {
                children: convert_children(self.children)?,
            },
        };

        Ok(DeclaredSetting {
            definition_id: self.definition_id,
            value,
        })
    }
}

impl ChildEntry {
    /// Convert into the typed child model.
    pub fn into_declared(self) -> Result<ChildSetting, CodecError> {
        let value = match ValueKind::parse(&self.value_type) {
            Some(ValueKind::String) => ChildValue::String(self.value),
            Some(ValueKind::Integer) => ChildValue::Integer(self.value),
            Some(ValueKind::Boolean) => ChildValue::Boolean(self.value),
            Some(ValueKind::Choice) => ChildValue::Choice(self.value),
            Some(ValueKind::Collection) | Some(ValueKind::Group) => {
                return Err(CodecError::UnsupportedChildKind {
                    kind: self.value_type,
                });
            }
            None => {
                return Err(CodecError::UnknownValueKind {
                    kind: self.value_type,
                });
            }
        };
        Ok(ChildSetting {
            definition_id: self.definition_id,
            value,
        })
    }
}

fn convert_children(entries: Vec<ChildEntry>) -> Result<Vec<ChildSetting>, CodecError> {
    entries.into_iter().map(ChildEntry::into_declared).collect()
}

/// Parse a serialized collection value into its ordered elements.
///
/// Accepts any JSON array; non-string elements are stringified (the declared
/// model only supports string collections). Non-array syntax fails with
/// [`CodecError::CollectionParse`].
fn parse_collection(raw: &str) -> Result<Vec<String>, CodecError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|source| CodecError::CollectionParse { source })?;
    Ok(values.iter().map(codec::coerce::stringify_json).collect())
}

/// Convert a full list of flat entries into declared settings, preserving
/// order. The first failing entry aborts the conversion, reported with its
/// definition ID, value type, and position.
pub fn declare_all(entries: Vec<SettingEntry>) -> crate::Result<Vec<DeclaredSetting>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let definition_id = entry.definition_id.clone();
            let value_type = entry.value_type.clone();
            entry
                .into_declared()
                .map_err(|e| crate::Error::setting(index, &definition_id, &value_type, e))
        })
        .collect()
}
