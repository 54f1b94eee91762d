//! Session context
//!
//! The credential and student id of the logged-in user, shared by every
//! backend call. A 401 from any endpoint clears the credential here.

use parking_lot::RwLock;
use std::fmt;

/// Shorten a credential for logs
#[must_use]
pub fn redact(credential: &str) -> String {
    let head: String = credential.chars().take(10).collect();
    format!("{head}...")
}

/// Credential and identity of the current user
#[derive(Default)]
pub struct SessionContext {
    credential: RwLock<Option<String>>,
    student_id: RwLock<Option<String>>,
}

impl SessionContext {
    /// Session with no credential or student id
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial credential
    #[must_use]
    pub fn with_credential(self, credential: impl Into<String>) -> Self {
        *self.credential.write() = Some(credential.into());
        self
    }

    /// Set the initial student id
    #[must_use]
    pub fn with_student_id(self, student_id: impl Into<String>) -> Self {
        *self.student_id.write() = Some(student_id.into());
        self
    }

    /// Current bearer credential
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.credential.read().clone()
    }

    /// Replace the credential
    pub fn set_credential(&self, credential: impl Into<String>) {
        *self.credential.write() = Some(credential.into());
    }

    /// Forget the credential; the user must log in again
    pub fn clear_credential(&self) {
        if self.credential.write().take().is_some() {
            tracing::info!("session credential cleared");
        }
    }

    /// Current student id
    #[must_use]
    pub fn student_id(&self) -> Option<String> {
        self.student_id.read().clone()
    }

    /// Replace the student id
    pub fn set_student_id(&self, student_id: impl Into<String>) {
        *self.student_id.write() = Some(student_id.into());
    }

    /// Credential and student id both present
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.read().is_some() && self.student_id.read().is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("credential", &self.credential.read().as_deref().map(redact))
            .field("student_id", &*self.student_id.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn debug_never_prints_full_credential() {
        let session = SessionContext::new()
            .with_credential("eyJhbGciOiJIUzI1NiJ9.payload.signature")
            .with_student_id("s-1");
        let debug = format!("{session:?}");
        assert!(debug.contains("eyJhbGciOi..."));
        assert!(!debug.contains("signature"));
    }

    #[test]
    fn clearing_credential_deauthenticates() {
        let session = Arc::new(SessionContext::new().with_credential("a.b.c").with_student_id("s"));
        assert!(session.is_authenticated());
        let shared = Arc::clone(&session);
        shared.clear_credential();
        assert!(!session.is_authenticated());
        assert_eq!(session.credential(), None);
        assert_eq!(session.student_id().as_deref(), Some("s"));
    }
}
