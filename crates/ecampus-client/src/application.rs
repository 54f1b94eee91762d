//! Application session
//!
//! Drives a [`Wizard`] against the backend: schema resolution on open,
//! draft restore, implicit saves on Next, manual saves and submission.
//! Every outcome is also queued as a [`Notice`] for the front end.

use crate::api::{AdmissionApi, ApiError, ApiMessage};
use crate::config::SchemaFallback;
use crate::error::SessionError;
use crate::session::SessionContext;
use ecampus_schema::FormStructure;
use ecampus_wizard::notice::{DRAFT_LOAD_FAILED, DRAFT_RESUMED, SCHEMA_FALLBACK, SUBMITTED};
use ecampus_wizard::{Advance, Notice, Section, SubmitError, Wizard};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One applicant filling in one course's application
#[derive(Debug)]
pub struct ApplicationSession<A> {
    api: A,
    session: Arc<SessionContext>,
    course_id: String,
    student_id: String,
    wizard: Wizard,
    notices: Vec<Notice>,
}

impl<A: AdmissionApi> ApplicationSession<A> {
    /// Resolve the schema, restore any draft and build the wizard
    ///
    /// # Errors
    /// - `SessionError::LoginRequired` without a credential and student id
    /// - `SessionError::Api` on a 401, or on a schema failure under [`SchemaFallback::FailClosed`]
    pub async fn open(
        api: A,
        session: Arc<SessionContext>,
        course_id: impl Into<String>,
        policy: SchemaFallback,
    ) -> Result<Self, SessionError> {
        let course_id = course_id.into();
        let (Some(_), Some(student_id)) = (session.credential(), session.student_id()) else {
            return Err(SessionError::LoginRequired);
        };
        let mut notices = Vec::new();

        let schema = match api.fetch_form_structure(&course_id).await {
            Ok(schema) => schema,
            Err(err) if err.requires_login() => return Err(err.into()),
            Err(err) => match policy {
                SchemaFallback::FailOpen => {
                    warn!(course_id = %course_id, error = %err, "form structure unavailable, using fallback");
                    notices.push(Notice::error(SCHEMA_FALLBACK));
                    FormStructure::fallback()
                }
                SchemaFallback::FailClosed => {
                    warn!(course_id = %course_id, error = %err, "form structure unavailable");
                    return Err(err.into());
                }
            },
        };

        let wizard = match api.fetch_application(&student_id, &course_id).await {
            Ok(draft) => {
                if !draft.is_submitted() {
                    notices.push(Notice::success(DRAFT_RESUMED));
                }
                Wizard::restore(schema, draft)
            }
            Err(ApiError::NotFound(_)) => {
                debug!(course_id = %course_id, "no stored application");
                Wizard::new(schema)
            }
            Err(err) if err.requires_login() => return Err(err.into()),
            Err(err) => {
                warn!(course_id = %course_id, error = %err, "failed to load stored application");
                notices.push(Notice::error(DRAFT_LOAD_FAILED));
                Wizard::new(schema)
            }
        };

        info!(course_id = %course_id, section = %wizard.active(), "application opened");
        Ok(Self {
            api,
            session,
            course_id,
            student_id,
            wizard,
            notices,
        })
    }

    /// Course being applied for
    #[inline]
    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Underlying wizard
    #[inline]
    #[must_use]
    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Wizard for field edits
    #[inline]
    pub fn wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    /// Pending notices, oldest first
    #[inline]
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn reject(&mut self, err: impl Into<SessionError>) -> SessionError {
        let err = err.into();
        self.notices.push(Notice::error(err.user_message()));
        err
    }

    /// Validate and advance; the first pass through a section saves a draft
    ///
    /// A failed implicit save is reported as a notice and does not undo the advance.
    ///
    /// # Errors
    /// `SessionError::Wizard` when the section has errors or the application is submitted.
    pub async fn next(&mut self) -> Result<Advance, SessionError> {
        let advance = match self.wizard.next() {
            Ok(advance) => advance,
            Err(err) => return Err(self.reject(err)),
        };
        if advance.save_due {
            if let Err(err) = self.save_section(advance.from).await {
                debug!(section = %advance.from, error = %err, "implicit save failed");
            }
        }
        Ok(advance)
    }

    /// Open a section directly
    ///
    /// # Errors
    /// `SessionError::Wizard` if the section is locked.
    pub fn jump(&mut self, target: Section) -> Result<Section, SessionError> {
        match self.wizard.jump(target) {
            Ok(section) => Ok(section),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Save a draft from the active section
    ///
    /// # Errors
    /// Encoding or backend failures; wizard state is unchanged.
    pub async fn save(&mut self) -> Result<ApiMessage, SessionError> {
        self.save_section(self.wizard.active()).await
    }

    async fn save_section(&mut self, section: Section) -> Result<ApiMessage, SessionError> {
        let payload = match self
            .wizard
            .draft_payload(&self.course_id, &self.student_id, section)
        {
            Ok(payload) => payload,
            Err(err) => return Err(self.reject(err)),
        };
        match self.api.save_draft(&payload).await {
            Ok(ack) => {
                self.wizard.mark_saved(section);
                info!(section = %section, "draft saved");
                self.notices.push(Notice::success(ack.message.clone()));
                Ok(ack)
            }
            Err(err) => {
                warn!(section = %section, error = %err, "draft save failed");
                let message = match &err {
                    ApiError::Server { message, .. } => message.clone(),
                    other if other.requires_login() => other.to_string(),
                    other => format!("Failed to save draft: {other}"),
                };
                self.notices.push(Notice::error(message));
                Err(err.into())
            }
        }
    }

    /// Run the final checks and submit
    ///
    /// A malformed credential is cleared from the session.
    ///
    /// # Errors
    /// `SessionError::Submit` for a failed check, `SessionError::Api` for a backend failure.
    pub async fn submit(&mut self) -> Result<ApiMessage, SessionError> {
        let credential = self.session.credential();
        let payload = match self.wizard.prepare_submission(
            &self.course_id,
            &self.student_id,
            credential.as_deref(),
        ) {
            Ok(payload) => payload,
            Err(err) => {
                if matches!(err, SubmitError::MalformedCredential) {
                    self.session.clear_credential();
                }
                return Err(self.reject(err));
            }
        };

        match self.api.submit_application(&payload).await {
            Ok(ack) => {
                self.wizard.mark_submitted();
                info!(course_id = %self.course_id, "application submitted");
                self.notices.push(Notice::success(SUBMITTED));
                Ok(ack)
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                Err(self.reject(err))
            }
        }
    }
}
