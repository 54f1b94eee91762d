//! Backend API seam
//!
//! [`AdmissionApi`] is what sessions talk to; [`crate::HttpBackend`] is
//! the production implementation.

use async_trait::async_trait;
use ecampus_editor::{CourseDescription, DescriptionRequest, StructureRequest};
use ecampus_schema::FormStructure;
use ecampus_wizard::notice::{LOGIN_REQUIRED, SESSION_EXPIRED};
use ecampus_wizard::{ApplicationDraft, ApplicationPayload};
use serde::{Deserialize, Serialize};

// Paths are segment lists; ids are percent-encoded when joined onto the base URL.

/// Form structure of a course
#[must_use]
pub fn form_structure_path(course_id: &str) -> Vec<&str> {
    vec!["api", "forms", "get-form-structure", course_id]
}

/// Stored application of a student for a course
#[must_use]
pub fn application_path<'a>(student_id: &'a str, course_id: &'a str) -> Vec<&'a str> {
    vec!["api", "applications", "get-application", student_id, course_id]
}

/// Course description
#[must_use]
pub fn description_path(course_id: &str) -> Vec<&str> {
    vec!["api", "courses", course_id, "description"]
}

/// Course description save
#[must_use]
pub fn add_description_path(course_id: &str) -> Vec<&str> {
    vec!["api", "courses", course_id, "add-description"]
}

/// Draft save
pub const SAVE_DRAFT_PATH: &[&str] = &["api", "applications", "save-draft"];
/// Final submission
pub const SUBMIT_PATH: &[&str] = &["api", "applications", "submit-application"];
/// Form structure save
pub const SAVE_STRUCTURE_PATH: &[&str] = &["api", "forms", "save-form-structure"];

/// Backend call failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No credential in the session
    #[error("{}", LOGIN_REQUIRED)]
    NotAuthenticated,

    /// Backend answered 401; the credential has been cleared
    #[error("{}", SESSION_EXPIRED)]
    SessionExpired,

    /// Backend answered 404
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// Request never got a response
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body did not parse
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether repeating the request might succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the user has to log in again
    #[inline]
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }
}

/// `{message}` acknowledgement returned by write endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Message from the backend
    #[serde(default)]
    pub message: String,
}

/// Operations the portal needs from the backend
#[async_trait]
pub trait AdmissionApi: Send + Sync {
    /// Application schema of a course
    async fn fetch_form_structure(&self, course_id: &str) -> Result<FormStructure, ApiError>;

    /// Stored application; `ApiError::NotFound` when there is none
    async fn fetch_application(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<ApplicationDraft, ApiError>;

    /// Store a draft
    async fn save_draft(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError>;

    /// Submit the application
    async fn submit_application(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError>;

    /// Course description
    async fn fetch_description(&self, course_id: &str) -> Result<CourseDescription, ApiError>;

    /// Store a course description
    async fn save_description(
        &self,
        course_id: &str,
        request: &DescriptionRequest,
    ) -> Result<ApiMessage, ApiError>;

    /// Store a form structure, replacing the previous one
    async fn save_form_structure(&self, request: &StructureRequest) -> Result<ApiMessage, ApiError>;
}

#[async_trait]
impl<T: AdmissionApi + ?Sized> AdmissionApi for std::sync::Arc<T> {
    async fn fetch_form_structure(&self, course_id: &str) -> Result<FormStructure, ApiError> {
        (**self).fetch_form_structure(course_id).await
    }

    async fn fetch_application(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<ApplicationDraft, ApiError> {
        (**self).fetch_application(student_id, course_id).await
    }

    async fn save_draft(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError> {
        (**self).save_draft(payload).await
    }

    async fn submit_application(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError> {
        (**self).submit_application(payload).await
    }

    async fn fetch_description(&self, course_id: &str) -> Result<CourseDescription, ApiError> {
        (**self).fetch_description(course_id).await
    }

    async fn save_description(
        &self,
        course_id: &str,
        request: &DescriptionRequest,
    ) -> Result<ApiMessage, ApiError> {
        (**self).save_description(course_id, request).await
    }

    async fn save_form_structure(&self, request: &StructureRequest) -> Result<ApiMessage, ApiError> {
        (**self).save_form_structure(request).await
    }
}
