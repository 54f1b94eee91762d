//! E-Campus Schema Editor
//!
//! Content-administrator tooling for a course:
//! - [`CourseDescription`] with the completeness gate and image encoding
//! - [`StructureEditor`] for authoring the application [`FormStructure`](ecampus_schema::FormStructure)
//! - Request bodies for the description and structure endpoints
//!
//! # Example
//!
//! ```rust
//! use ecampus_editor::{CourseDescription, EditorError, StructureEditor};
//!
//! let description = CourseDescription::new("B.Tech");
//! assert!(!description.is_complete());
//! assert_eq!(StructureEditor::open(&description).unwrap_err(), EditorError::Locked);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod description;
pub mod error;
pub mod structure;

pub use description::{
    CourseDescription, DescriptionField, DescriptionRequest, ImageSlot, Semester, MAX_IMAGE_BYTES,
};
pub use error::{EditorError, EditorResult};
pub use structure::{parse_options, NewCustomField, StructureEditor, StructureRequest};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editing course schemas
    pub use crate::{CourseDescription, EditorError, NewCustomField, StructureEditor};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
