//! Error types for the schema editor

use crate::description::{DescriptionField, ImageSlot};
use ecampus_schema::SchemaError;

/// Schema editor errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// Structure editing attempted before the description is complete
    #[error("Description form has not been filled.")]
    Locked,

    /// Description cannot be saved yet
    #[error("description is incomplete: missing {}", join_fields(.0))]
    DescriptionIncomplete(Vec<DescriptionField>),

    /// No program type selected
    #[error("Please select a program type (UG/PG) before saving the form structure.")]
    ProgramTypeRequired,

    /// Image larger than the upload limit
    #[error("{slot} is too large ({size} bytes). Maximum size is 5MB.")]
    ImageTooLarge {
        /// Image slot
        slot: ImageSlot,
        /// Size in bytes
        size: usize,
    },

    /// Upload is not an image
    #[error("{slot} must be an image, got '{mime_type}'")]
    NotAnImage {
        /// Image slot
        slot: ImageSlot,
        /// Detected MIME type
        mime_type: String,
    },

    /// Semester index out of range
    #[error("no semester at index {0}")]
    NoSuchSemester(usize),

    /// Subject index out of range
    #[error("no subject {subject} in semester {semester}")]
    NoSuchSubject {
        /// Semester index
        semester: usize,
        /// Subject index
        subject: usize,
    },

    /// Schema invariant violated
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn join_fields(fields: &[DescriptionField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
