//! Schema-defined custom fields attached to an academic level

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};

/// Input type of a custom field
///
/// Dropdown options live inside the variant so a dropdown without
/// options cannot be represented once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Numeric value
    Number,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// One of a fixed list of options
    Dropdown(Vec<String>),
}

impl FieldKind {
    /// Wire type tag
    #[inline]
    #[must_use]
    pub fn type_tag(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Number => FieldType::Number,
            FieldKind::Date => FieldType::Date,
            FieldKind::Dropdown(_) => FieldType::Dropdown,
        }
    }

    /// Dropdown options, empty for other kinds
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Dropdown(options) => options,
            _ => &[],
        }
    }
}

/// Wire type tag of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    #[default]
    Text,
    /// Numeric value
    Number,
    /// Calendar date
    Date,
    /// One of a fixed option list
    Dropdown,
}

impl FieldType {
    /// Every type tag, in editor order
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Dropdown,
    ];
}

/// A custom field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireCustomField", into = "WireCustomField")]
pub struct CustomFieldSpec {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
}

impl CustomFieldSpec {
    /// Create a custom field, not required by default
    ///
    /// # Errors
    /// - `SchemaError::IncompleteCustomField` if name or label is blank
    /// - `SchemaError::DropdownWithoutOptions` if a dropdown has no non-blank option
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> SchemaResult<Self> {
        let name = name.into().trim().to_string();
        let label = label.into().trim().to_string();
        if name.is_empty() || label.is_empty() {
            return Err(SchemaError::IncompleteCustomField);
        }

        let kind = match kind {
            FieldKind::Dropdown(options) => {
                let options: Vec<String> = options
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if options.is_empty() {
                    return Err(SchemaError::DropdownWithoutOptions(name));
                }
                FieldKind::Dropdown(options)
            }
            other => other,
        };

        Ok(Self {
            name,
            label,
            kind,
            required: false,
        })
    }

    /// Set the required flag
    #[inline]
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Field name, unique within its level
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Input kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether a blank value blocks the academic section
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Flip the required flag, returning the new value
    #[inline]
    pub fn toggle_required(&mut self) -> bool {
        self.required = !self.required;
        self.required
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireCustomField {
    name: String,
    label: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl TryFrom<WireCustomField> for CustomFieldSpec {
    type Error = SchemaError;

    fn try_from(wire: WireCustomField) -> Result<Self, Self::Error> {
        let kind = match wire.field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Date => FieldKind::Date,
            FieldType::Dropdown => FieldKind::Dropdown(wire.options.unwrap_or_default()),
        };
        Ok(CustomFieldSpec::new(wire.name, wire.label, kind)?.with_required(wire.required))
    }
}

impl From<CustomFieldSpec> for WireCustomField {
    fn from(spec: CustomFieldSpec) -> Self {
        let field_type = spec.kind.type_tag();
        let options = match spec.kind {
            FieldKind::Dropdown(options) => Some(options),
            _ => None,
        };
        Self {
            name: spec.name,
            label: spec.label,
            field_type,
            required: spec.required,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_blank_name_or_label() {
        assert_eq!(
            CustomFieldSpec::new("  ", "Label", FieldKind::Text),
            Err(SchemaError::IncompleteCustomField)
        );
        assert_eq!(
            CustomFieldSpec::new("rollNo", "", FieldKind::Text),
            Err(SchemaError::IncompleteCustomField)
        );
    }

    #[test]
    fn dropdown_needs_an_option() {
        let err = CustomFieldSpec::new("medium", "Medium", FieldKind::Dropdown(vec![" ".into()]))
            .unwrap_err();
        assert_eq!(err, SchemaError::DropdownWithoutOptions("medium".to_string()));

        let ok = CustomFieldSpec::new(
            "medium",
            "Medium",
            FieldKind::Dropdown(vec![" English ".into(), "Hindi".into()]),
        )
        .unwrap();
        assert_eq!(ok.kind().options(), &["English".to_string(), "Hindi".to_string()]);
    }

    #[test]
    fn new_fields_start_optional() {
        let mut field = CustomFieldSpec::new("rollNo", "Roll Number", FieldKind::Number).unwrap();
        assert!(!field.is_required());
        assert!(field.toggle_required());
        assert!(field.is_required());
    }

    #[test]
    fn wire_shape_omits_options_for_plain_fields() {
        let field = CustomFieldSpec::new("rollNo", "Roll Number", FieldKind::Number)
            .unwrap()
            .with_required(true);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "rollNo", "label": "Roll Number", "type": "number", "required": true})
        );
    }

    #[test]
    fn wire_dropdown_without_options_is_rejected() {
        let json = r#"{"name":"medium","label":"Medium","type":"dropdown","required":false}"#;
        assert!(serde_json::from_str::<CustomFieldSpec>(json).is_err());
    }

    #[test]
    fn wire_type_defaults_to_text() {
        let json = r#"{"name":"note","label":"Note"}"#;
        let field: CustomFieldSpec = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind(), &FieldKind::Text);
        assert!(!field.is_required());
    }
}
