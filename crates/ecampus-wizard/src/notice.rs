//! User-facing notices
//!
//! Short messages a front end shows as a toast after an action.

use serde::Serialize;
use std::fmt;

/// Shown when a jump targets a locked section
pub const SECTION_LOCKED: &str = "Please complete the previous sections first.";
/// Shown when Next finds errors
pub const FIX_BEFORE_PROCEEDING: &str = "Please fix the errors in the form before proceeding.";
/// Shown when Submit finds errors
pub const FIX_BEFORE_SUBMITTING: &str = "Please fix the errors in the form before submitting.";
/// Shown when a draft is restored
pub const DRAFT_RESUMED: &str = "Resumed your saved application.";
/// Shown when the draft cannot be loaded
pub const DRAFT_LOAD_FAILED: &str = "Error loading saved application.";
/// Shown when the schema cannot be fetched and the fallback is used
pub const SCHEMA_FALLBACK: &str = "Error fetching form structure. Defaulting to PG.";
/// Shown after a successful submission
pub const SUBMITTED: &str = "Form saved successfully";
/// Shown when a request is rejected with 401
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";
/// Shown when the session has no credential or student id
pub const LOGIN_REQUIRED: &str = "Please log in to continue.";

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Operation completed
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    Info,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Notice reports a failure
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_level() {
        assert!(Notice::error(SECTION_LOCKED).is_error());
        assert!(!Notice::success(SUBMITTED).is_error());
        assert_eq!(Notice::info("hi").to_string(), "hi");
    }
}
