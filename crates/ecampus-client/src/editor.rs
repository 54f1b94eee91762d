//! Course editor session
//!
//! Loads a course's description and saved form structure, and unlocks
//! the structure editor once a complete description is on the backend.

use crate::api::{AdmissionApi, ApiError, ApiMessage};
use crate::error::SessionError;
use ecampus_editor::{CourseDescription, EditorError, StructureEditor};
use ecampus_schema::FormStructure;
use tracing::{debug, info, warn};

/// A content administrator editing one course
#[derive(Debug)]
pub struct EditorSession<A> {
    api: A,
    course_id: String,
    description: CourseDescription,
    saved_structure: Option<FormStructure>,
    structure: Option<StructureEditor>,
}

impl<A: AdmissionApi> EditorSession<A> {
    /// Load the description and any saved structure
    ///
    /// # Errors
    /// Backend failures other than 404; a missing description starts blank.
    pub async fn open(api: A, course_id: impl Into<String>) -> Result<Self, SessionError> {
        let course_id = course_id.into();
        let description = match api.fetch_description(&course_id).await {
            Ok(description) => description,
            Err(ApiError::NotFound(_)) => CourseDescription::default(),
            Err(err) => return Err(err.into()),
        };
        let saved_structure = match api.fetch_form_structure(&course_id).await {
            Ok(structure) => Some(structure),
            Err(ApiError::NotFound(_)) => None,
            Err(err) if err.requires_login() => return Err(err.into()),
            Err(err) => {
                warn!(course_id = %course_id, error = %err, "failed to load form structure");
                None
            }
        };

        let mut session = Self {
            api,
            course_id,
            description,
            saved_structure,
            structure: None,
        };
        session.unlock();
        Ok(session)
    }

    fn unlock(&mut self) {
        if self.structure.is_some() {
            return;
        }
        let opened = match &self.saved_structure {
            Some(saved) => StructureEditor::from_structure(&self.description, saved),
            None => StructureEditor::open(&self.description),
        };
        match opened {
            Ok(editor) => {
                debug!(course_id = %self.course_id, "structure editor unlocked");
                self.structure = Some(editor);
            }
            Err(err) => debug!(course_id = %self.course_id, error = %err, "structure editor locked"),
        }
    }

    /// Course being edited
    #[inline]
    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Description being edited
    #[inline]
    #[must_use]
    pub fn description(&self) -> &CourseDescription {
        &self.description
    }

    /// Mutable description
    #[inline]
    pub fn description_mut(&mut self) -> &mut CourseDescription {
        &mut self.description
    }

    /// Last structure loaded from or saved to the backend
    #[inline]
    #[must_use]
    pub fn saved_structure(&self) -> Option<&FormStructure> {
        self.saved_structure.as_ref()
    }

    /// Whether the structure editor is available
    #[inline]
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.structure.is_some()
    }

    /// Structure editor
    ///
    /// # Errors
    /// `EditorError::Locked` until a complete description has been saved.
    pub fn structure_mut(&mut self) -> Result<&mut StructureEditor, SessionError> {
        self.structure.as_mut().ok_or(EditorError::Locked.into())
    }

    /// Save the description; a complete save unlocks the structure editor
    ///
    /// # Errors
    /// `EditorError::DescriptionIncomplete` or a backend failure.
    pub async fn save_description(&mut self) -> Result<ApiMessage, SessionError> {
        let request = self.description.request_body()?;
        let ack = self.api.save_description(&self.course_id, &request).await?;
        info!(course_id = %self.course_id, "course description saved");
        self.unlock();
        Ok(ack)
    }

    /// Save the form structure, replacing the previous one
    ///
    /// # Errors
    /// `EditorError::Locked`, `EditorError::ProgramTypeRequired`, a schema
    /// violation or a backend failure.
    pub async fn save_structure(&mut self) -> Result<ApiMessage, SessionError> {
        if !self.description.is_complete() {
            return Err(EditorError::Locked.into());
        }
        let editor = self.structure.as_ref().ok_or(EditorError::Locked)?;
        let request = editor.save_request(self.course_id.clone())?;
        let ack = self.api.save_form_structure(&request).await?;
        info!(course_id = %self.course_id, "form structure saved");
        self.saved_structure = Some(request.structure);
        Ok(ack)
    }
}
