//! Render contracts
//!
//! A front end draws each section from a [`SectionView`]: groups of
//! [`FieldDescriptor`]s carrying the key errors are reported under, the
//! label, the input kind, whether the field is required and its current
//! value. The review overlay is a [`ReviewView`] of every section.

use crate::section::Section;
use serde::Serialize;

/// Input widget a field is drawn with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "camelCase")]
pub enum InputKind {
    /// Single-line text
    Text,
    /// Multi-line text
    TextArea,
    /// Numeric input
    Number,
    /// Date picker
    Date,
    /// Dropdown with fixed options
    Select(Vec<String>),
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Single checkbox
    Checkbox,
    /// File picker
    File,
}

impl InputKind {
    /// Select from a static option list
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputKind::Select(options.into_iter().map(Into::into).collect())
    }
}

/// One input of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field key, identical to the error-map key
    pub key: String,
    /// Label shown to the user
    pub label: String,
    /// Widget to draw
    pub input: InputKind,
    /// Marked as required
    pub required: bool,
    /// Current value (file name for file inputs, "true"/"false" for checkboxes)
    pub value: String,
}

impl FieldDescriptor {
    /// Create a required field with an empty value
    pub fn new(key: impl Into<String>, label: impl Into<String>, input: InputKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            input,
            required: true,
            value: String::new(),
        }
    }

    /// Set the required flag
    #[inline]
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the current value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Titled group of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    /// Group heading
    pub title: String,
    /// Fields in display order
    pub fields: Vec<FieldDescriptor>,
}

impl FieldGroup {
    /// Group with the given fields
    pub fn new(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Find a field by key
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Everything needed to draw one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    /// Section drawn
    pub section: Section,
    /// Section title
    pub title: &'static str,
    /// Field groups in display order
    pub groups: Vec<FieldGroup>,
}

impl SectionView {
    /// View with no groups yet
    #[must_use]
    pub fn new(section: Section) -> Self {
        Self {
            section,
            title: section.title(),
            groups: Vec::new(),
        }
    }

    /// Append a group
    #[must_use]
    pub fn with_group(mut self, group: FieldGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Iterate all fields across groups
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    /// Find a field by key in any group
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.key == key)
    }

    /// Find a group by title
    #[must_use]
    pub fn group(&self, title: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.title == title)
    }
}

/// Action offered next to each section of the review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditAction {
    /// Button text
    pub label: &'static str,
    /// Section the action opens
    pub target: Section,
}

/// One section of the review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    /// Read-only rendering of the section
    pub view: SectionView,
    /// Edit action for the section
    pub edit: EditAction,
}

/// Read-only summary of the whole application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    /// Sections in form order
    pub sections: Vec<ReviewSection>,
    /// False once the application has been submitted
    pub editable: bool,
}

impl ReviewView {
    /// Review entry for a section
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&ReviewSection> {
        self.sections.iter().find(|s| s.view.section == section)
    }
}
