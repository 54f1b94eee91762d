//! Stored application drafts

use crate::education::EducationDetails;
use crate::form::FormData;
use ecampus_schema::ProgramType;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a stored application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Still being filled in
    #[default]
    Draft,
    /// Submitted; read-only from now on
    Submitted,
}

/// An application as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    /// Fixed text fields, documents and declaration
    #[serde(default)]
    pub form_data: FormData,
    /// Education entries keyed by level
    #[serde(default)]
    pub education_details: EducationDetails,
    /// Program the draft was filled for
    #[serde(default)]
    pub program_type: Option<ProgramType>,
    /// Index of the section active when the draft was saved
    #[serde(default, deserialize_with = "lenient_index")]
    pub last_active_section: usize,
    /// Lifecycle status
    #[serde(default)]
    pub status: DraftStatus,
}

impl ApplicationDraft {
    /// Whether the application has been submitted
    #[inline]
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == DraftStatus::Submitted
    }
}

// Multipart fields come back as strings; accept numbers, numeric strings and null.
fn lenient_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid section index: {n}"))),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid section index: {s}"))),
        other => Err(D::Error::custom(format!("invalid section index: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;

    #[test]
    fn parses_backend_draft() {
        let json = r#"{
            "_id": "665f",
            "courseId": "c1",
            "formData": {"fullName": "Asha", "phoneNumber": "+919876543210", "documents": [{"type": "PAN", "fileName": "pan.pdf"}]},
            "educationDetails": {"tenth": [], "twelth": [], "graduation": [], "postgraduate": []},
            "programType": "UG",
            "lastActiveSection": "2",
            "status": "draft"
        }"#;
        let draft: ApplicationDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.last_active_section, 2);
        assert_eq!(draft.program_type, Some(ProgramType::Undergraduate));
        assert_eq!(draft.form_data.get(FormField::FullName), "Asha");
        assert_eq!(draft.form_data.documents().len(), 1);
        assert!(!draft.is_submitted());
    }

    #[test]
    fn numeric_and_missing_section_index() {
        let draft: ApplicationDraft =
            serde_json::from_str(r#"{"lastActiveSection": 4, "status": "submitted"}"#).unwrap();
        assert_eq!(draft.last_active_section, 4);
        assert!(draft.is_submitted());

        let draft: ApplicationDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft.last_active_section, 0);
        assert_eq!(draft.status, DraftStatus::Draft);
    }

    #[test]
    fn rejects_negative_section_index() {
        assert!(serde_json::from_str::<ApplicationDraft>(r#"{"lastActiveSection": -1}"#).is_err());
    }
}
