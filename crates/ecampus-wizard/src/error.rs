//! Error types for the application wizard
//!
//! Provides error handling for:
//! - Rejected transitions (locked sections, review mode, terminal state)
//! - Education entry and document tray edits
//! - File constraint violations on attachment
//! - Final submission checks

use crate::section::Section;
use ecampus_schema::{AcademicLevel, DocumentType};
use std::path::PathBuf;

/// Wizard state machine errors
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Application already submitted; no further edits
    #[error("application already submitted")]
    AlreadySubmitted,

    /// Jump target is ahead of the completed sections
    #[error("section '{}' is locked until the previous sections are complete", .target.title())]
    SectionLocked {
        /// Requested section
        target: Section,
    },

    /// Section validation produced errors
    #[error("{count} field(s) in '{}' need attention", .section.title())]
    ValidationFailed {
        /// Section that failed
        section: Section,
        /// Number of failing fields
        count: usize,
    },

    /// Review view requested before the last section
    #[error("the application can only be reviewed from the last section")]
    ReviewUnavailable,

    /// Review-only action outside review mode
    #[error("not in review mode")]
    NotReviewing,

    /// Level is not part of the schema
    #[error("academic level '{0}' is not required by this course")]
    LevelNotRequired(AcademicLevel),

    /// Education entry index out of range
    #[error("no {level} entry at index {index}")]
    NoSuchEntry {
        /// Level of the entry
        level: AcademicLevel,
        /// Requested index
        index: usize,
    },

    /// Attachment rule violated
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Payload could not be encoded
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WizardError {
    /// Whether the error is a terminal-state rejection
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::AlreadySubmitted)
    }
}

/// Document tray and file constraint errors
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    /// Document type not required by the schema
    #[error("'{0}' is not a required document for this course")]
    NotRequired(DocumentType),

    /// Document type already has a slot
    #[error("'{0}' has already been added")]
    Duplicate(DocumentType),

    /// Every required document already has a slot
    #[error("all {0} required documents have already been added")]
    TrayFull(usize),

    /// Slot index out of range
    #[error("no document at index {0}")]
    NoSuchSlot(usize),

    /// Photo or signature with a non-image file
    #[error("invalid file type for {document}: expected an image, got '{mime_type}'")]
    ImageRequired {
        /// Photo or signature slot
        document: DocumentType,
        /// Detected MIME type
        mime_type: String,
    },

    /// File type outside JPEG, PNG, PDF
    #[error("invalid file type for {document}: use JPEG, PNG, or PDF (got '{mime_type}')")]
    UnsupportedType {
        /// Document slot
        document: DocumentType,
        /// Detected MIME type
        mime_type: String,
    },

    /// File larger than the upload limit
    #[error("file '{file_name}' is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        /// Uploaded file name
        file_name: String,
        /// File size in bytes
        size: u64,
        /// Upload limit in bytes
        limit: u64,
    },

    /// File with no content
    #[error("file '{0}' is empty")]
    EmptyFile(String),

    /// IO error reading an upload from disk
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

impl AttachmentError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Final submission check failures
///
/// Each variant targets one field of the error map.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Application already submitted
    #[error("application already submitted")]
    AlreadySubmitted,

    /// Submission attempted away from the Declaration section
    #[error("submission is only possible from the {} section, not '{}'", Section::LAST.title(), .active.title())]
    NotOnLastSection {
        /// Section shown when submission was attempted
        active: Section,
    },

    /// A section failed its validation
    #[error("section '{}' has {count} invalid field(s)", .section.title())]
    SectionInvalid {
        /// Section that failed
        section: Section,
        /// Number of failing fields
        count: usize,
    },

    /// Identity number is not exactly 12 digits
    #[error("a valid 12-digit Aadhaar number is required")]
    IdentityNumber,

    /// Email does not look like an address
    #[error("a valid email address is required")]
    Email,

    /// No credential in the session
    #[error("no credential available; log in again")]
    MissingCredential,

    /// Credential is not three dot-separated base64url segments
    #[error("invalid credential format; log in again")]
    MalformedCredential,

    /// Number of valid documents differs from the required count
    #[error("exactly {expected} required document(s) must be uploaded, found {actual}")]
    DocumentCount {
        /// Required document count
        expected: usize,
        /// Valid documents found
        actual: usize,
    },

    /// Required document absent
    #[error("required document '{0}' is missing")]
    MissingDocument(DocumentType),

    /// Document uploaded twice
    #[error("document '{0}' is uploaded more than once")]
    DuplicateDocument(DocumentType),

    /// Document not required by the schema
    #[error("document '{0}' is not required for this course")]
    UnexpectedDocument(DocumentType),

    /// Payload could not be encoded
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SubmitError {
    /// Error-map key this failure is reported under, if any
    #[must_use]
    pub fn field_key(&self) -> Option<&'static str> {
        match self {
            Self::IdentityNumber => Some("aadhaarNumber"),
            Self::Email => Some("email"),
            Self::DocumentCount { .. }
            | Self::MissingDocument(_)
            | Self::DuplicateDocument(_)
            | Self::UnexpectedDocument(_) => Some("documents"),
            _ => None,
        }
    }

    /// Whether logging in again resolves the failure
    #[inline]
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::MalformedCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_section_display() {
        let err = WizardError::SectionLocked {
            target: Section::DocumentsUpload,
        };
        assert!(err.to_string().contains("Documents Upload"));
    }

    #[test]
    fn attachment_converts_into_wizard_error() {
        let err: WizardError = AttachmentError::NoSuchSlot(3).into();
        assert!(matches!(err, WizardError::Attachment(AttachmentError::NoSuchSlot(3))));
        assert_eq!(err.to_string(), "no document at index 3");
    }

    #[test]
    fn submit_error_field_keys() {
        assert_eq!(SubmitError::IdentityNumber.field_key(), Some("aadhaarNumber"));
        assert_eq!(
            SubmitError::DocumentCount {
                expected: 3,
                actual: 2
            }
            .field_key(),
            Some("documents")
        );
        assert_eq!(SubmitError::MalformedCredential.field_key(), None);
        assert!(SubmitError::MalformedCredential.requires_login());
    }
}
