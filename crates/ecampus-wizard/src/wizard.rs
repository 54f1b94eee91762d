//! Application wizard state machine
//!
//! Tracks the active section, which sections are complete and saved,
//! the field error map, and the review overlay. Network calls are not
//! made here: [`Wizard::next`] reports when an implicit save is due and
//! the caller issues it, then records the outcome with
//! [`Wizard::mark_saved`].
//!
//! Once [`Wizard::mark_submitted`] is called the wizard is terminal and
//! every mutating operation fails with [`WizardError::AlreadySubmitted`].

use crate::documents::{self, FileUpload};
use crate::draft::{ApplicationDraft, DraftStatus};
use crate::education::{EducationDetails, EducationEntry};
use crate::error::{SubmitError, WizardError};
use crate::form::{DocumentSlot, FormData, FormField};
use crate::payload::ApplicationPayload;
use crate::render::{EditAction, ReviewSection, ReviewView, SectionView};
use crate::rules::{self, entry_error_key, entry_error_keys};
use crate::section::{FormContext, Section};
use crate::validation::{is_credential, is_email, is_identity_number, FieldErrors};
use chrono::Datelike;
use ecampus_schema::{AcademicLevel, DocumentType, FormStructure, SubfieldSpec};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Whether the read-only review overlay is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Filling in sections
    #[default]
    Editing,
    /// Read-only review overlay
    Reviewing,
}

/// Lifecycle of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    /// Accepting changes
    #[default]
    Open,
    /// Terminal
    Submitted,
}

/// Outcome of a successful Next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Section that was validated and completed
    pub from: Section,
    /// Section now active (same as `from` on the last section)
    pub to: Section,
    /// `from` has not been saved yet this session
    pub save_due: bool,
}

/// The application wizard
#[derive(Debug, Clone)]
pub struct Wizard {
    schema: FormStructure,
    form: FormData,
    education: EducationDetails,
    active: Section,
    completed: BTreeSet<Section>,
    saved: BTreeSet<Section>,
    errors: FieldErrors,
    mode: Mode,
    edit_section: Option<Section>,
    lifecycle: Lifecycle,
    current_year: i32,
}

impl Wizard {
    /// Fresh wizard at the first section
    #[must_use]
    pub fn new(schema: FormStructure) -> Self {
        Self {
            schema,
            form: FormData::new(),
            education: EducationDetails::new(),
            active: Section::FIRST,
            completed: BTreeSet::new(),
            saved: BTreeSet::new(),
            errors: FieldErrors::new(),
            mode: Mode::Editing,
            edit_section: None,
            lifecycle: Lifecycle::Open,
            current_year: chrono::Local::now().year(),
        }
    }

    /// Resume from a stored draft
    ///
    /// Sections before the stored one are complete; sections up to and
    /// including it are saved. A submitted draft opens read-only in
    /// review mode.
    #[must_use]
    pub fn restore(schema: FormStructure, draft: ApplicationDraft) -> Self {
        let active = Section::clamped(draft.last_active_section);
        let mut wizard = Self::new(schema);
        wizard.form = draft.form_data;
        wizard.education = draft.education_details;
        wizard.active = active;
        wizard.completed = Section::ALL
            .into_iter()
            .filter(|s| s.index() < active.index())
            .collect();
        wizard.saved = Section::ALL
            .into_iter()
            .filter(|s| s.index() <= active.index())
            .collect();
        if draft.status == DraftStatus::Submitted {
            wizard.lifecycle = Lifecycle::Submitted;
            wizard.mode = Mode::Reviewing;
        }
        debug!(section = %active, status = ?draft.status, "restored application draft");
        wizard
    }

    /// Override the year used to bound year of passing
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Form structure in use
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FormStructure {
        &self.schema
    }

    /// Fixed fields and documents
    #[inline]
    #[must_use]
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Education entries
    #[inline]
    #[must_use]
    pub fn education(&self) -> &EducationDetails {
        &self.education
    }

    /// Section currently shown
    #[inline]
    #[must_use]
    pub fn active(&self) -> Section {
        self.active
    }

    /// Sections that passed validation
    #[inline]
    #[must_use]
    pub fn completed(&self) -> &BTreeSet<Section> {
        &self.completed
    }

    /// Section passed validation
    #[inline]
    #[must_use]
    pub fn is_completed(&self, section: Section) -> bool {
        self.completed.contains(&section)
    }

    /// Sections stored by an implicit or manual save
    #[inline]
    #[must_use]
    pub fn saved(&self) -> &BTreeSet<Section> {
        &self.saved
    }

    /// Section was saved
    #[inline]
    #[must_use]
    pub fn is_saved(&self, section: Section) -> bool {
        self.saved.contains(&section)
    }

    /// Errors from the latest validation run and later edits
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Editing or review overlay
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Review overlay is shown
    #[inline]
    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.mode == Mode::Reviewing
    }

    /// Section re-entered from the review overlay
    #[inline]
    #[must_use]
    pub fn edit_section(&self) -> Option<Section> {
        self.edit_section
    }

    /// Open or submitted
    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Application has been submitted
    #[inline]
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.lifecycle == Lifecycle::Submitted
    }

    /// Context handed to section contracts
    #[must_use]
    pub fn context(&self) -> FormContext<'_> {
        FormContext {
            schema: &self.schema,
            form: &self.form,
            education: &self.education,
            current_year: self.current_year,
        }
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        match self.lifecycle {
            Lifecycle::Open => Ok(()),
            Lifecycle::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    // ---- Editing ----

    /// Assign a text field
    ///
    /// # Errors
    /// `WizardError::AlreadySubmitted` once submitted.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.form.set(field, value);
        Ok(())
    }

    /// Accept or withdraw the declaration
    ///
    /// # Errors
    /// `WizardError::AlreadySubmitted` once submitted.
    pub fn set_agreement(&mut self, agreed: bool) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.form.set_agreement(agreed);
        Ok(())
    }

    fn required_spec(&self, level: AcademicLevel) -> Result<&SubfieldSpec, WizardError> {
        if !self.schema.requires_level(level) {
            return Err(WizardError::LevelNotRequired(level));
        }
        self.schema
            .level_spec(level)
            .ok_or(WizardError::LevelNotRequired(level))
    }

    /// Add a blank entry for a required level
    ///
    /// Returns `false` when the level already has its entry.
    ///
    /// # Errors
    /// `WizardError::LevelNotRequired` or `WizardError::AlreadySubmitted`.
    pub fn add_education(&mut self, level: AcademicLevel) -> Result<bool, WizardError> {
        self.ensure_open()?;
        let spec = self.required_spec(level)?.clone();
        self.errors.remove(&rules::missing_level_key(level));
        Ok(self.education.add_entry(&spec))
    }

    /// Remove an entry and clear its errors
    ///
    /// # Errors
    /// `WizardError::NoSuchEntry` or `WizardError::AlreadySubmitted`.
    pub fn remove_education(
        &mut self,
        level: AcademicLevel,
        index: usize,
    ) -> Result<EducationEntry, WizardError> {
        self.ensure_open()?;
        let removed = self.education.remove_entry(level, index)?;
        let keys = match self.schema.level_spec(level) {
            Some(spec) => entry_error_keys(spec, index),
            None => Vec::new(),
        };
        for key in keys {
            self.errors.remove(&key);
        }
        Ok(removed)
    }

    /// Set one value of an entry
    ///
    /// A stored non-empty value clears that field's error. Returns
    /// whether the value was stored (malformed year input is ignored).
    ///
    /// # Errors
    /// `WizardError::NoSuchEntry` or `WizardError::AlreadySubmitted`.
    pub fn set_education_value(
        &mut self,
        level: AcademicLevel,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<bool, WizardError> {
        self.ensure_open()?;
        let stored = self.education.set_value(level, index, key, value)?;
        if stored && !value.trim().is_empty() {
            self.errors.remove(&entry_error_key(level, index, key));
        }
        Ok(stored)
    }

    /// Add an empty slot for a required document
    ///
    /// # Errors
    /// `WizardError::Attachment` naming the violated tray rule.
    pub fn add_document(&mut self, document: DocumentType) -> Result<usize, WizardError> {
        self.ensure_open()?;
        Ok(documents::add_slot(&self.schema, &mut self.form, document)?)
    }

    /// Remove a document slot, keeping errors attached to their documents
    ///
    /// # Errors
    /// `WizardError::Attachment` if the index is out of range.
    pub fn remove_document(&mut self, index: usize) -> Result<DocumentSlot, WizardError> {
        self.ensure_open()?;
        Ok(documents::remove_slot(&mut self.form, &mut self.errors, index)?)
    }

    /// Attach a file to a document slot
    ///
    /// # Errors
    /// `WizardError::Attachment` naming the violated file constraint.
    pub fn attach_file(&mut self, index: usize, upload: FileUpload) -> Result<(), WizardError> {
        self.ensure_open()?;
        documents::attach_to_slot(&mut self.form, &mut self.errors, index, upload)?;
        Ok(())
    }

    // ---- Navigation ----

    fn validate(&mut self, section: Section) -> usize {
        let errors = section.contract().validate(&self.context());
        let count = errors.len();
        self.errors = errors;
        count
    }

    /// Validate the active section and advance
    ///
    /// # Errors
    /// - `WizardError::ValidationFailed` with the errors stored in [`Wizard::errors`]
    /// - `WizardError::AlreadySubmitted` once submitted
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        self.ensure_open()?;
        let from = self.active;
        let count = self.validate(from);
        if count > 0 {
            debug!(section = %from, count, "section validation failed");
            return Err(WizardError::ValidationFailed {
                section: from,
                count,
            });
        }

        self.completed.insert(from);
        let save_due = !self.saved.contains(&from);
        let to = from.next().unwrap_or(from);
        self.active = to;
        debug!(from = %from, to = %to, save_due, "advanced");
        Ok(Advance { from, to, save_due })
    }

    /// Go back one section and leave review mode
    ///
    /// # Errors
    /// `WizardError::AlreadySubmitted` once submitted.
    pub fn back(&mut self) -> Result<Section, WizardError> {
        self.ensure_open()?;
        self.active = self.active.previous().unwrap_or(Section::FIRST);
        self.mode = Mode::Editing;
        self.edit_section = None;
        Ok(self.active)
    }

    /// Whether a section may be opened directly
    #[must_use]
    pub fn can_jump(&self, target: Section) -> bool {
        target <= self.active
            || target.previous().is_some_and(|p| self.completed.contains(&p))
            || self.completed.contains(&target)
    }

    /// Open a section directly and leave review mode
    ///
    /// # Errors
    /// - `WizardError::SectionLocked` unless the section is reachable
    /// - `WizardError::AlreadySubmitted` once submitted
    pub fn jump(&mut self, target: Section) -> Result<Section, WizardError> {
        self.ensure_open()?;
        if !self.can_jump(target) {
            debug!(target = %target, active = %self.active, "jump rejected");
            return Err(WizardError::SectionLocked { target });
        }
        self.active = target;
        self.mode = Mode::Editing;
        self.edit_section = None;
        Ok(target)
    }

    /// Open the review overlay from the last section
    ///
    /// # Errors
    /// `WizardError::ReviewUnavailable` on any other section.
    pub fn view_form(&mut self) -> Result<ReviewView, WizardError> {
        if self.is_submitted() {
            return Ok(self.review());
        }
        if !self.active.is_last() {
            return Err(WizardError::ReviewUnavailable);
        }
        self.mode = Mode::Reviewing;
        Ok(self.review())
    }

    /// Leave review mode to edit a section
    ///
    /// # Errors
    /// `WizardError::NotReviewing` outside review mode.
    pub fn edit_from_review(&mut self, section: Section) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.is_reviewing() {
            return Err(WizardError::NotReviewing);
        }
        self.edit_section = Some(section);
        self.active = section;
        self.mode = Mode::Editing;
        Ok(())
    }

    /// Leave review mode at the last section
    ///
    /// # Errors
    /// `WizardError::NotReviewing` outside review mode.
    pub fn close_review(&mut self) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.is_reviewing() {
            return Err(WizardError::NotReviewing);
        }
        self.mode = Mode::Editing;
        self.edit_section = None;
        self.active = Section::LAST;
        Ok(())
    }

    // ---- Persistence ----

    /// Draft payload recording `last_active` as the section saved from
    ///
    /// # Errors
    /// `WizardError::AlreadySubmitted` or an encoding failure.
    pub fn draft_payload(
        &self,
        course_id: &str,
        student_id: &str,
        last_active: Section,
    ) -> Result<ApplicationPayload, WizardError> {
        self.ensure_open()?;
        Ok(ApplicationPayload::draft(
            course_id,
            student_id,
            &self.form,
            &self.education,
            self.schema.program_type(),
            last_active.index(),
        )?)
    }

    /// Record a successful save of a section
    pub fn mark_saved(&mut self, section: Section) {
        self.saved.insert(section);
    }

    /// Run the final checks and build the submission payload
    ///
    /// Only the Declaration section submits, and it must validate. Each
    /// failure is also recorded in the error map under its field.
    ///
    /// # Errors
    /// The first failing [`SubmitError`].
    pub fn prepare_submission(
        &mut self,
        course_id: &str,
        student_id: &str,
        credential: Option<&str>,
    ) -> Result<ApplicationPayload, SubmitError> {
        if self.is_submitted() {
            return Err(SubmitError::AlreadySubmitted);
        }

        if self.active != Section::LAST {
            debug!(section = %self.active, "submission outside the last section");
            return Err(SubmitError::NotOnLastSection {
                active: self.active,
            });
        }

        let count = self.validate(Section::LAST);
        if count > 0 {
            return Err(SubmitError::SectionInvalid {
                section: Section::LAST,
                count,
            });
        }

        if let Err(err) = self.final_checks(credential) {
            if let Some(key) = err.field_key() {
                let message = match &err {
                    SubmitError::IdentityNumber => rules::IDENTITY_NUMBER_MESSAGE.to_string(),
                    SubmitError::Email => rules::EMAIL_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                self.errors.replace(key, message);
            }
            debug!(error = %err, "submission rejected");
            return Err(err);
        }

        Ok(ApplicationPayload::submission(
            course_id,
            student_id,
            &self.form,
            &self.education,
            self.schema.program_type(),
        )?)
    }

    fn final_checks(&self, credential: Option<&str>) -> Result<(), SubmitError> {
        if !is_identity_number(self.form.get(FormField::AadhaarNumber)) {
            return Err(SubmitError::IdentityNumber);
        }
        if !is_email(self.form.get(FormField::Email)) {
            return Err(SubmitError::Email);
        }
        match credential {
            None => return Err(SubmitError::MissingCredential),
            Some(token) if !is_credential(token) => return Err(SubmitError::MalformedCredential),
            Some(_) => {}
        }

        let required = self.schema.required_documents();
        let valid: Vec<DocumentType> = self.form.valid_documents().map(DocumentSlot::document).collect();
        if valid.len() != required.len() {
            return Err(SubmitError::DocumentCount {
                expected: required.len(),
                actual: valid.len(),
            });
        }
        let mut seen = BTreeSet::new();
        for document in &valid {
            if !seen.insert(*document) {
                return Err(SubmitError::DuplicateDocument(*document));
            }
            if !self.schema.requires_document(*document) {
                return Err(SubmitError::UnexpectedDocument(*document));
            }
        }
        if let Some(missing) = required.iter().find(|d| !seen.contains(*d)) {
            return Err(SubmitError::MissingDocument(*missing));
        }
        Ok(())
    }

    /// Enter the terminal state after the backend accepted the submission
    pub fn mark_submitted(&mut self) {
        info!("application submitted");
        self.lifecycle = Lifecycle::Submitted;
        self.mode = Mode::Reviewing;
        self.edit_section = None;
    }

    /// Snapshot of the application in stored-draft form
    #[must_use]
    pub fn to_draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            form_data: self.form.clone(),
            education_details: self.education.clone(),
            program_type: Some(self.schema.program_type()),
            last_active_section: self.active.index(),
            status: match self.lifecycle {
                Lifecycle::Open => DraftStatus::Draft,
                Lifecycle::Submitted => DraftStatus::Submitted,
            },
        }
    }

    // ---- Rendering ----

    /// View of the active section
    #[must_use]
    pub fn render(&self) -> SectionView {
        self.render_section(self.active)
    }

    /// View of any section
    #[must_use]
    pub fn render_section(&self, section: Section) -> SectionView {
        section.contract().render(&self.context())
    }

    /// Read-only summary of every section
    #[must_use]
    pub fn review(&self) -> ReviewView {
        let editable = !self.is_submitted();
        ReviewView {
            sections: Section::ALL
                .into_iter()
                .map(|section| ReviewSection {
                    view: self.render_section(section),
                    edit: EditAction {
                        label: "Edit",
                        target: section,
                    },
                })
                .collect(),
            editable,
        }
    }
}
