//! The six wizard sections and their contracts
//!
//! Every [`Section`] is bound to a [`SectionContract`] that knows how to
//! validate and render it against a [`FormContext`].

use crate::documents::{pending_documents, slot_key};
use crate::education::EducationDetails;
use crate::form::{FormData, FormField};
use crate::render::{FieldDescriptor, FieldGroup, InputKind, SectionView};
use crate::rules::{self, custom_field_key, subfield_key};
use crate::validation::FieldErrors;
use ecampus_schema::{FieldKind, FormStructure, Subfield};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard section, in navigation order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    /// Name, birth date, gender, nationality, Aadhaar
    PersonalDetails,
    /// Phone, emails, addresses
    ContactInformation,
    /// Parent or guardian names, occupations and contacts
    ParentDetails,
    /// Education entries per level
    AcademicDetails,
    /// Required document uploads
    DocumentsUpload,
    /// Final agreement; the only section that submits
    Declaration,
}

impl Section {
    /// All sections in order
    pub const ALL: [Section; 6] = [
        Section::PersonalDetails,
        Section::ContactInformation,
        Section::ParentDetails,
        Section::AcademicDetails,
        Section::DocumentsUpload,
        Section::Declaration,
    ];

    /// First section
    pub const FIRST: Section = Section::PersonalDetails;

    /// Last section
    pub const LAST: Section = Section::Declaration;

    /// Zero-based position
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Section at a position
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Section at a position, clamped to the last section
    #[inline]
    #[must_use]
    pub fn clamped(index: usize) -> Self {
        Self::from_index(index).unwrap_or(Self::LAST)
    }

    /// Heading shown for the section
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Section::PersonalDetails => "Personal Details",
            Section::ContactInformation => "Contact Information",
            Section::ParentDetails => "Parent/Guardian Details",
            Section::AcademicDetails => "Academic Details",
            Section::DocumentsUpload => "Documents Upload",
            Section::Declaration => "Declaration",
        }
    }

    /// Following section, `None` after the last
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Preceding section, `None` before the first
    #[inline]
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// This is the final section
    #[inline]
    #[must_use]
    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// Contract implementing this section
    #[must_use]
    pub fn contract(self) -> &'static dyn SectionContract {
        match self {
            Section::PersonalDetails => &PersonalDetails,
            Section::ContactInformation => &ContactInformation,
            Section::ParentDetails => &ParentDetails,
            Section::AcademicDetails => &AcademicDetails,
            Section::DocumentsUpload => &DocumentsUpload,
            Section::Declaration => &Declaration,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Read-only view of everything a section contract needs
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    /// Active form structure
    pub schema: &'a FormStructure,
    /// Fixed fields and documents
    pub form: &'a FormData,
    /// Education entries
    pub education: &'a EducationDetails,
    /// Upper bound for year of passing
    pub current_year: i32,
}

/// Validation and rendering of one section
pub trait SectionContract: Send + Sync {
    /// Section this contract implements
    fn section(&self) -> Section;

    /// Complete error map for the section
    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors;

    /// Fields to draw for the section
    fn render(&self, ctx: &FormContext<'_>) -> SectionView;
}

fn text_fields(section: Section, form: &FormData, fields: &[(FormField, InputKind)]) -> SectionView {
    let descriptors = fields
        .iter()
        .map(|(field, input)| {
            FieldDescriptor::new(field.key(), field.label(), input.clone())
                .with_required(*field != FormField::AlternateEmail)
                .with_value(form.get(*field))
        })
        .collect();
    SectionView::new(section).with_group(FieldGroup::new(section.title(), descriptors))
}

struct PersonalDetails;

impl SectionContract for PersonalDetails {
    fn section(&self) -> Section {
        Section::PersonalDetails
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::personal(ctx.form)
    }

    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        text_fields(
            self.section(),
            ctx.form,
            &[
                (FormField::FullName, InputKind::Text),
                (FormField::Dob, InputKind::Date),
                (FormField::Gender, InputKind::select(["Male", "Female", "Other"])),
                (FormField::Nationality, InputKind::Text),
                (FormField::AadhaarNumber, InputKind::Text),
            ],
        )
    }
}

struct ContactInformation;

impl SectionContract for ContactInformation {
    fn section(&self) -> Section {
        Section::ContactInformation
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::contact(ctx.form)
    }

    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        text_fields(
            self.section(),
            ctx.form,
            &[
                (FormField::PhoneNumber, InputKind::Phone),
                (FormField::Email, InputKind::Email),
                (FormField::AlternateEmail, InputKind::Email),
                (FormField::CurrentAddress, InputKind::TextArea),
                (FormField::PermanentAddress, InputKind::TextArea),
                (FormField::EmergencyContact, InputKind::Phone),
            ],
        )
    }
}

struct ParentDetails;

impl SectionContract for ParentDetails {
    fn section(&self) -> Section {
        Section::ParentDetails
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::parents(ctx.form)
    }

    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        text_fields(
            self.section(),
            ctx.form,
            &[
                (FormField::FathersName, InputKind::Text),
                (FormField::MothersName, InputKind::Text),
                (FormField::FathersOccupation, InputKind::Text),
                (FormField::MothersOccupation, InputKind::Text),
                (FormField::FathersContact, InputKind::Phone),
                (FormField::MothersContact, InputKind::Phone),
            ],
        )
    }
}

struct AcademicDetails;

fn subfield_input(subfield: Subfield) -> InputKind {
    match subfield {
        Subfield::Percentage => InputKind::Number,
        Subfield::YearOfPassing => InputKind::Number,
        Subfield::Stream => InputKind::select(Subfield::STREAM_OPTIONS),
        _ => InputKind::Text,
    }
}

fn custom_input(kind: &FieldKind) -> InputKind {
    match kind {
        FieldKind::Text => InputKind::Text,
        FieldKind::Number => InputKind::Number,
        FieldKind::Date => InputKind::Date,
        FieldKind::Dropdown(options) => InputKind::Select(options.clone()),
    }
}

impl SectionContract for AcademicDetails {
    fn section(&self) -> Section {
        Section::AcademicDetails
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::academic(ctx.schema, ctx.education, ctx.current_year)
    }

    /// One group per required level and entry
    ///
    /// A level without an entry still yields a group with no values so
    /// the front end knows which fields the entry will hold.
    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        let mut view = SectionView::new(self.section());
        for spec in ctx.schema.required_specs() {
            let level = spec.level();
            let entries = ctx.education.entries(level);
            let count = entries.len().max(1);
            for index in 0..count {
                let entry = entries.get(index);
                let value = |key: &str| entry.map_or("", |e| e.get(key)).to_string();

                let fixed = spec.enabled_subfields().map(|sf| {
                    let label = if sf == Subfield::Percentage {
                        level.percentage_label()
                    } else {
                        sf.label()
                    };
                    FieldDescriptor::new(subfield_key(sf, level, index), label, subfield_input(sf))
                        .with_value(value(sf.entry_key()))
                });
                let custom = spec.custom_fields().iter().map(|f| {
                    FieldDescriptor::new(
                        custom_field_key(f.name(), level, index),
                        f.label(),
                        custom_input(f.kind()),
                    )
                    .with_required(f.is_required())
                    .with_value(value(f.name()))
                });
                view = view.with_group(FieldGroup::new(level.title(), fixed.chain(custom).collect()));
            }
        }
        view
    }
}

struct DocumentsUpload;

impl SectionContract for DocumentsUpload {
    fn section(&self) -> Section {
        Section::DocumentsUpload
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::documents(ctx.schema, ctx.form)
    }

    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        let pending: Vec<String> = pending_documents(ctx.schema, ctx.form)
            .map(|d| d.label().to_string())
            .collect();
        let picker = FieldDescriptor::new("documentType", "Select Document Type", InputKind::Select(pending))
            .with_required(false);
        let slots = ctx.form.documents().iter().enumerate().map(|(index, slot)| {
            FieldDescriptor::new(slot_key(index), slot.document().label(), InputKind::File)
                .with_value(slot.file_name().unwrap_or_default())
        });
        SectionView::new(self.section()).with_group(FieldGroup::new(
            self.section().title(),
            std::iter::once(picker).chain(slots).collect(),
        ))
    }
}

struct Declaration;

impl SectionContract for Declaration {
    fn section(&self) -> Section {
        Section::Declaration
    }

    fn validate(&self, ctx: &FormContext<'_>) -> FieldErrors {
        rules::declaration(ctx.form)
    }

    fn render(&self, ctx: &FormContext<'_>) -> SectionView {
        let agreement = FieldDescriptor::new(
            "agreement",
            "I declare that the information provided is true and correct",
            InputKind::Checkbox,
        )
        .with_value(ctx.form.agreement().to_string());
        SectionView::new(self.section())
            .with_group(FieldGroup::new(self.section().title(), vec![agreement]))
    }
}
