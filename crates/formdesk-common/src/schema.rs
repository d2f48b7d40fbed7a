//! Field schema descriptors
//!
//! The backend describes the create/edit form as an ordered list of
//! [`FieldSchema`] values. The JSON tag is `component`:
//!
//! ```json
//! [
//!   { "component": "text", "name": "title", "label": "Title", "required": true },
//!   { "component": "range_picker", "name": ["startDate", "endDate"], "label": "Dates" }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{FormdeskError, FormdeskResult};

/// One entry of a select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the user
    pub label: String,
    /// Value stored in the record
    pub value: String,
}

impl SelectOption {
    /// Create an option
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Description of one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "component")]
pub enum FieldSchema {
    /// Single-line text input
    #[serde(rename = "text")]
    Text {
        /// Record field name
        name: String,
        /// Label
        label: String,
        /// Reject empty values on submit
        #[serde(default)]
        required: bool,
    },
    /// Multi-line text input
    #[serde(rename = "textarea")]
    TextArea {
        /// Record field name
        name: String,
        /// Label
        label: String,
    },
    /// Closed choice
    #[serde(rename = "select")]
    Select {
        /// Record field name
        name: String,
        /// Label
        label: String,
        /// Allowed choices, in display order
        options: Vec<SelectOption>,
    },
    /// Paired start/end date inputs
    #[serde(rename = "range_picker")]
    DateRange {
        /// Record field names for start and end
        name: (String, String),
        /// Label
        label: String,
    },
}

impl FieldSchema {
    /// Required single-line text field
    pub fn text(name: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self::Text {
            name: name.into(),
            label: label.into(),
            required,
        }
    }

    /// Multi-line text field
    pub fn text_area(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::TextArea {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Select field
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::Select {
            name: name.into(),
            label: label.into(),
            options,
        }
    }

    /// Date range field
    pub fn date_range(
        start: impl Into<String>,
        end: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::DateRange {
            name: (start.into(), end.into()),
            label: label.into(),
        }
    }

    /// Label shown next to the control
    pub fn label(&self) -> &str {
        match self {
            Self::Text { label, .. }
            | Self::TextArea { label, .. }
            | Self::Select { label, .. }
            | Self::DateRange { label, .. } => label,
        }
    }

    /// Key the field's value and error live under.
    ///
    /// Date ranges are one logical field keyed `start:end`.
    pub fn key(&self) -> String {
        match self {
            Self::Text { name, .. } | Self::TextArea { name, .. } | Self::Select { name, .. } => {
                name.clone()
            }
            Self::DateRange { name: (start, end), .. } => format!("{start}:{end}"),
        }
    }

    /// Record field names this control writes
    pub fn record_fields(&self) -> Vec<&str> {
        match self {
            Self::Text { name, .. } | Self::TextArea { name, .. } | Self::Select { name, .. } => {
                vec![name.as_str()]
            }
            Self::DateRange { name: (start, end), .. } => vec![start.as_str(), end.as_str()],
        }
    }

    /// Whether an empty value fails validation
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Text { required: true, .. })
    }
}

/// Ordered, validated list of field descriptors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Validate a field list. Every record field name and every logical key
    /// must be unique.
    pub fn new(fields: Vec<FieldSchema>) -> FormdeskResult<Self> {
        let mut seen = HashSet::new();
        let mut keys = HashSet::new();
        for field in &fields {
            let key = field.key();
            if !keys.insert(key.clone()) {
                return Err(FormdeskError::InvalidSchema(format!(
                    "duplicate field key '{key}'"
                )));
            }
            for name in field.record_fields() {
                if name.is_empty() {
                    return Err(FormdeskError::InvalidSchema(format!(
                        "field '{}' has an empty name",
                        field.label()
                    )));
                }
                if !seen.insert(name) {
                    return Err(FormdeskError::InvalidSchema(format!(
                        "duplicate field name '{name}'"
                    )));
                }
            }
        }
        Ok(Self { fields })
    }

    /// Fields in display order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look a field up by its logical key
    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for FormSchema {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<FieldSchema>::deserialize(deserializer)?;
        FormSchema::new(fields).map_err(serde::de::Error::custom)
    }
}

/// Schema the fixture backend serves for the users collection
pub fn user_plan_schema() -> Vec<FieldSchema> {
    vec![
        FieldSchema::text("user", "User", true),
        FieldSchema::text("title", "Title", true),
        FieldSchema::select(
            "type",
            "Type",
            vec![
                SelectOption::new("Generic", "generic"),
                SelectOption::new("Holiday", "holiday"),
            ],
        ),
        FieldSchema::date_range("startDate", "endDate", "Dates"),
        FieldSchema::text_area("description", "Description"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_tag_roundtrip() {
        let json = r#"[
            {"component":"text","name":"title","label":"Title","required":true},
            {"component":"textarea","name":"description","label":"Description"},
            {"component":"select","name":"type","label":"Type","options":[{"label":"Generic","value":"generic"}]},
            {"component":"range_picker","name":["startDate","endDate"],"label":"Dates"}
        ]"#;
        let fields: Vec<FieldSchema> = serde_json::from_str(json).unwrap();
        assert_eq!(fields[0], FieldSchema::text("title", "Title", true));
        assert_eq!(fields[3].key(), "startDate:endDate");
        assert_eq!(fields[3].record_fields(), vec!["startDate", "endDate"]);

        let back = serde_json::to_value(&fields[3]).unwrap();
        assert_eq!(back["component"], "range_picker");
        assert_eq!(back["name"][1], "endDate");
    }

    #[test]
    fn test_text_required_defaults_false() {
        let field: FieldSchema =
            serde_json::from_str(r#"{"component":"text","name":"user","label":"User"}"#).unwrap();
        assert!(!field.is_required());
    }

    #[test]
    fn test_unknown_component_rejected() {
        let result = serde_json::from_str::<FieldSchema>(
            r#"{"component":"slider","name":"x","label":"X"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = FormSchema::new(vec![
            FieldSchema::text("startDate", "Start", false),
            FieldSchema::date_range("startDate", "endDate", "Dates"),
        ])
        .unwrap_err();
        assert!(matches!(err, FormdeskError::InvalidSchema(_)));

        let json = r#"[{"component":"text","name":"a","label":"A"},{"component":"textarea","name":"a","label":"B"}]"#;
        assert!(serde_json::from_str::<FormSchema>(json).is_err());
    }

    #[test]
    fn test_text_named_like_range_key_rejected() {
        let err = FormSchema::new(vec![
            FieldSchema::text("s:e", "Literal", false),
            FieldSchema::date_range("s", "e", "Dates"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FormdeskError::InvalidSchema("duplicate field key 's:e'".into())
        );
    }

    #[test]
    fn test_fixture_schema_is_valid() {
        let schema = FormSchema::new(user_plan_schema()).unwrap();
        assert_eq!(schema.len(), 5);
        assert!(schema.field("startDate:endDate").is_some());
    }
}
