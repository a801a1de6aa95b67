//! Core types for pilot sync.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Color assigned to pilots whose source row has no colour.
pub const DEFAULT_PILOT_COLOR: &str = "#ff0055";

/// Value of a custom pilot attribute.
///
/// Attributes are free-form text except for checkbox fields, which hold a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Text(String),
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttributeValue::Flag(b) => Some(*b),
            AttributeValue::Text(_) => None,
        }
    }

    /// Encode for storage in the `pilot_attributes.value` column.
    pub fn to_stored(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a stored value. Rows written by other tools may hold bare text.
    pub fn from_stored(stored: &str) -> Self {
        serde_json::from_str(stored).unwrap_or_else(|_| AttributeValue::Text(stored.to_string()))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag(b) => write!(f, "{}", b),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A pilot stored in the timing database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: i64,
    pub name: String,
    pub callsign: String,
    pub phonetic: String,
    pub color: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Pilot {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Fields for a pilot that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPilot {
    pub name: String,
    pub callsign: String,
    pub phonetic: String,
    pub color: String,
}

/// A partial update to an existing pilot.
///
/// `None` leaves the field as-is. Attributes are upserted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PilotChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl PilotChanges {
    /// Changes that only set attributes.
    pub fn attributes(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// True when there are no built-in field changes.
    pub fn has_field_changes(&self) -> bool {
        self.callsign.is_some() || self.phonetic.is_some() || self.color.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_field_changes() && self.attributes.is_empty()
    }
}

/// Kind of a registered attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "checkbox" | "bool" | "flag" => Some(FieldType::Checkbox),
            _ => None,
        }
    }
}

/// A custom attribute registered in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub registered_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_storage() {
        let flag = AttributeValue::Flag(true);
        assert_eq!(flag.to_stored(), "true");
        assert_eq!(AttributeValue::from_stored("true"), flag);

        let text = AttributeValue::text("France");
        assert_eq!(text.to_stored(), "\"France\"");
        assert_eq!(AttributeValue::from_stored("\"France\""), text);

        // Text that happens to look like JSON stays text when quoted
        let numeric = AttributeValue::text("12345");
        assert_eq!(AttributeValue::from_stored(&numeric.to_stored()), numeric);
    }

    #[test]
    fn test_attribute_value_from_bare_text() {
        assert_eq!(
            AttributeValue::from_stored("not json"),
            AttributeValue::text("not json")
        );
    }

    #[test]
    fn test_pilot_changes_is_empty() {
        let mut changes = PilotChanges::default();
        assert!(changes.is_empty());
        assert!(!changes.has_field_changes());

        changes.phonetic = Some(String::new());
        assert!(!changes.is_empty());
        assert!(changes.has_field_changes());

        let attrs_only = PilotChanges::attributes(BTreeMap::from([(
            "country".to_string(),
            AttributeValue::text("NZ"),
        )]));
        assert!(!attrs_only.is_empty());
        assert!(!attrs_only.has_field_changes());
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("TEXT"), Some(FieldType::Text));
        assert_eq!(FieldType::parse("checkbox"), Some(FieldType::Checkbox));
        assert_eq!(FieldType::parse("bool"), Some(FieldType::Checkbox));
        assert_eq!(FieldType::parse("number"), None);
    }
}
