//! Session-level errors

use crate::api::ApiError;
use ecampus_editor::EditorError;
use ecampus_wizard::notice::{
    FIX_BEFORE_PROCEEDING, FIX_BEFORE_SUBMITTING, LOGIN_REQUIRED, SECTION_LOCKED,
};
use ecampus_wizard::{SubmitError, WizardError};

/// Errors surfaced by application and editor sessions
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No credential or student id in the session
    #[error("{}", LOGIN_REQUIRED)]
    LoginRequired,

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Wizard rejected the operation
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// Submission checks failed
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Editor rejected the operation
    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl SessionError {
    /// Text for a user-facing notice
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Wizard(WizardError::ValidationFailed { .. }) => FIX_BEFORE_PROCEEDING.to_string(),
            Self::Wizard(WizardError::SectionLocked { .. }) => SECTION_LOCKED.to_string(),
            Self::Submit(SubmitError::NotOnLastSection { .. }) => SECTION_LOCKED.to_string(),
            Self::Submit(SubmitError::SectionInvalid { .. }) => FIX_BEFORE_SUBMITTING.to_string(),
            Self::Submit(SubmitError::IdentityNumber) => "Please enter a valid Aadhaar number.".to_string(),
            Self::Submit(SubmitError::Email) => "Please enter a valid email address.".to_string(),
            Self::Submit(SubmitError::MissingCredential) => {
                "Please log in to submit the application.".to_string()
            }
            Self::Submit(SubmitError::MalformedCredential) => {
                "Invalid token format. Please log in again.".to_string()
            }
            Self::Submit(SubmitError::DocumentCount { expected, .. }) => {
                format!("Please upload exactly {expected} required documents.")
            }
            other => other.to_string(),
        }
    }

    /// Whether the user has to log in again
    #[must_use]
    pub fn requires_login(&self) -> bool {
        match self {
            Self::LoginRequired => true,
            Self::Api(err) => err.requires_login(),
            Self::Submit(err) => err.requires_login(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecampus_wizard::Section;

    #[test]
    fn validation_failures_map_to_portal_notices() {
        let err = SessionError::from(WizardError::ValidationFailed {
            section: Section::PersonalDetails,
            count: 2,
        });
        assert_eq!(err.user_message(), FIX_BEFORE_PROCEEDING);

        let err = SessionError::from(SubmitError::DocumentCount { expected: 3, actual: 1 });
        assert_eq!(err.user_message(), "Please upload exactly 3 required documents.");
    }

    #[test]
    fn login_required_variants() {
        assert!(SessionError::LoginRequired.requires_login());
        assert!(SessionError::from(ApiError::SessionExpired).requires_login());
        assert!(SessionError::from(SubmitError::MalformedCredential).requires_login());
        assert!(!SessionError::from(ApiError::NotFound("x".into())).requires_login());
    }

    #[test]
    fn server_message_passes_through() {
        let err = SessionError::from(ApiError::Server {
            status: 500,
            message: "Database unavailable".into(),
        });
        assert_eq!(err.user_message(), "Database unavailable");
    }
}
