//! Draft and submission payloads
//!
//! Both are sent as multipart forms: text parts carrying JSON documents,
//! followed by one `documents` part per file. A draft records the
//! section it was saved from and every attached file. A submission drops
//! the section index and sends only valid documents, with the form's
//! document list reduced to `{type}`.

use crate::documents::FileUpload;
use crate::education::EducationDetails;
use crate::form::FormData;
use ecampus_schema::ProgramType;
use serde_json::{json, Value};

/// Which endpoint a payload is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Saved draft
    Draft,
    /// Final submission
    Submission,
}

/// Multipart application payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPayload {
    kind: PayloadKind,
    course_id: String,
    student_id: String,
    form_data: String,
    education_details: String,
    program_type: ProgramType,
    last_active_section: Option<usize>,
    files: Vec<FileUpload>,
}

impl ApplicationPayload {
    /// Build a draft payload
    ///
    /// # Errors
    /// Propagates JSON encoding failures.
    pub fn draft(
        course_id: impl Into<String>,
        student_id: impl Into<String>,
        form: &FormData,
        education: &EducationDetails,
        program_type: ProgramType,
        last_active_section: usize,
    ) -> Result<Self, serde_json::Error> {
        let files = form
            .documents()
            .iter()
            .filter_map(|slot| slot.file().cloned())
            .collect();
        Ok(Self {
            kind: PayloadKind::Draft,
            course_id: course_id.into(),
            student_id: student_id.into(),
            form_data: serde_json::to_string(form)?,
            education_details: serde_json::to_string(education)?,
            program_type,
            last_active_section: Some(last_active_section),
            files,
        })
    }

    /// Build a submission payload from the valid documents only
    ///
    /// # Errors
    /// Propagates JSON encoding failures.
    pub fn submission(
        course_id: impl Into<String>,
        student_id: impl Into<String>,
        form: &FormData,
        education: &EducationDetails,
        program_type: ProgramType,
    ) -> Result<Self, serde_json::Error> {
        let valid: Vec<_> = form.valid_documents().collect();

        let mut form_json = serde_json::to_value(form)?;
        if let Value::Object(map) = &mut form_json {
            map.insert(
                "documents".to_string(),
                Value::Array(
                    valid
                        .iter()
                        .map(|slot| json!({ "type": slot.document() }))
                        .collect(),
                ),
            );
        }

        Ok(Self {
            kind: PayloadKind::Submission,
            course_id: course_id.into(),
            student_id: student_id.into(),
            form_data: serde_json::to_string(&form_json)?,
            education_details: serde_json::to_string(education)?,
            program_type,
            last_active_section: None,
            files: valid.iter().filter_map(|slot| slot.file().cloned()).collect(),
        })
    }

    /// Endpoint this payload targets
    #[inline]
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Course applied for
    #[inline]
    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Applicant id
    #[inline]
    #[must_use]
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// `formData` JSON text
    #[inline]
    #[must_use]
    pub fn form_data(&self) -> &str {
        &self.form_data
    }

    /// `educationDetails` JSON text
    #[inline]
    #[must_use]
    pub fn education_details(&self) -> &str {
        &self.education_details
    }

    /// Program the application is for
    #[inline]
    #[must_use]
    pub fn program_type(&self) -> ProgramType {
        self.program_type
    }

    /// Section index, drafts only
    #[inline]
    #[must_use]
    pub fn last_active_section(&self) -> Option<usize> {
        self.last_active_section
    }

    /// Files sent as `documents` parts
    #[inline]
    #[must_use]
    pub fn files(&self) -> &[FileUpload] {
        &self.files
    }

    /// Text parts in send order
    #[must_use]
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts = vec![
            ("courseId", self.course_id.clone()),
            ("studentId", self.student_id.clone()),
            ("formData", self.form_data.clone()),
            ("educationDetails", self.education_details.clone()),
            ("programType", self.program_type.code().to_string()),
        ];
        if let Some(index) = self.last_active_section {
            parts.push(("lastActiveSection", index.to_string()));
        }
        parts
    }
}
