//! E-Campus Application Wizard
//!
//! The schema-driven application form as a state machine:
//! - [`FormData`] and [`EducationDetails`] hold the applicant's answers
//! - Six [`Section`]s, each bound to a [`SectionContract`] for validation and rendering
//! - [`Wizard`] tracks the active section, completion, saves and review mode
//! - Document tray rules and file constraints in [`documents`]
//! - [`ApplicationPayload`] for draft saves and the final submission
//!
//! # Example
//!
//! ```rust
//! use ecampus_schema::FormStructure;
//! use ecampus_wizard::{FormField, Section, Wizard};
//!
//! let mut wizard = Wizard::new(FormStructure::fallback());
//! wizard.set_field(FormField::PhoneNumber, "+91 98765 43210").unwrap();
//! assert_eq!(wizard.form().get(FormField::PhoneNumber), "+919876543210");
//!
//! // Personal Details is incomplete, so Next is rejected
//! assert!(wizard.next().is_err());
//! assert_eq!(wizard.active(), Section::PersonalDetails);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod documents;
pub mod draft;
pub mod education;
pub mod error;
pub mod form;
pub mod notice;
pub mod payload;
pub mod render;
pub mod rules;
pub mod section;
pub mod validation;
pub mod wizard;

pub use documents::{FileUpload, MAX_UPLOAD_BYTES};
pub use draft::{ApplicationDraft, DraftStatus};
pub use education::{EducationDetails, EducationEntry};
pub use error::{AttachmentError, SubmitError, WizardError};
pub use form::{DocumentSlot, FormData, FormField};
pub use notice::{Notice, NoticeLevel};
pub use payload::{ApplicationPayload, PayloadKind};
pub use render::{FieldDescriptor, FieldGroup, InputKind, ReviewView, SectionView};
pub use section::{FormContext, Section, SectionContract};
pub use validation::FieldErrors;
pub use wizard::{Advance, Lifecycle, Mode, Wizard};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the wizard
    pub use crate::{
        ApplicationDraft, ApplicationPayload, FieldErrors, FileUpload, FormData, FormField,
        Notice, Section, SubmitError, Wizard, WizardError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
