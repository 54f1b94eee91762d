//! Applicant form data
//!
//! The fixed personal, contact and parent fields, the declaration flag
//! and the document tray. Values are set through [`FormField`] so phone
//! numbers are normalized on the way in.

use crate::documents::FileUpload;
use crate::validation::normalize_phone;
use ecampus_schema::DocumentType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed text field of the application form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// `fullName`
    FullName,
    /// `dob`, `YYYY-MM-DD`
    Dob,
    /// `gender`
    Gender,
    /// `nationality`
    Nationality,
    /// `aadhaarNumber`, twelve digits
    AadhaarNumber,
    /// `phoneNumber`
    PhoneNumber,
    /// `email`
    Email,
    /// `alternateEmail`, optional
    AlternateEmail,
    /// `currentAddress`
    CurrentAddress,
    /// `permanentAddress`
    PermanentAddress,
    /// `emergencyContact`
    EmergencyContact,
    /// `fathersName`
    FathersName,
    /// `mothersName`
    MothersName,
    /// `fathersOccupation`
    FathersOccupation,
    /// `mothersOccupation`
    MothersOccupation,
    /// `fathersContact`
    FathersContact,
    /// `mothersContact`
    MothersContact,
}

impl FormField {
    /// Every text field, in form order
    pub const ALL: [FormField; 17] = [
        FormField::FullName,
        FormField::Dob,
        FormField::Gender,
        FormField::Nationality,
        FormField::AadhaarNumber,
        FormField::PhoneNumber,
        FormField::Email,
        FormField::AlternateEmail,
        FormField::CurrentAddress,
        FormField::PermanentAddress,
        FormField::EmergencyContact,
        FormField::FathersName,
        FormField::MothersName,
        FormField::FathersOccupation,
        FormField::MothersOccupation,
        FormField::FathersContact,
        FormField::MothersContact,
    ];

    /// Wire and error-map key
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Dob => "dob",
            FormField::Gender => "gender",
            FormField::Nationality => "nationality",
            FormField::AadhaarNumber => "aadhaarNumber",
            FormField::PhoneNumber => "phoneNumber",
            FormField::Email => "email",
            FormField::AlternateEmail => "alternateEmail",
            FormField::CurrentAddress => "currentAddress",
            FormField::PermanentAddress => "permanentAddress",
            FormField::EmergencyContact => "emergencyContact",
            FormField::FathersName => "fathersName",
            FormField::MothersName => "mothersName",
            FormField::FathersOccupation => "fathersOccupation",
            FormField::MothersOccupation => "mothersOccupation",
            FormField::FathersContact => "fathersContact",
            FormField::MothersContact => "mothersContact",
        }
    }

    /// Label shown next to the input
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FormField::FullName => "Full Name",
            FormField::Dob => "Date of Birth",
            FormField::Gender => "Gender",
            FormField::Nationality => "Nationality",
            FormField::AadhaarNumber => "Aadhaar Number",
            FormField::PhoneNumber => "Phone Number",
            FormField::Email => "Email Address",
            FormField::AlternateEmail => "Alternate Email Address (Optional)",
            FormField::CurrentAddress => "Current Address",
            FormField::PermanentAddress => "Permanent Address",
            FormField::EmergencyContact => "Emergency Contact Number",
            FormField::FathersName => "Father's Name",
            FormField::MothersName => "Mother's Name",
            FormField::FathersOccupation => "Father's Occupation",
            FormField::MothersOccupation => "Mother's Occupation",
            FormField::FathersContact => "Father's Contact Number",
            FormField::MothersContact => "Mother's Contact Number",
        }
    }

    /// Phone-type fields have whitespace stripped on assignment
    #[inline]
    #[must_use]
    pub fn is_phone(self) -> bool {
        matches!(
            self,
            FormField::PhoneNumber
                | FormField::EmergencyContact
                | FormField::FathersContact
                | FormField::MothersContact
        )
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}

/// A document slot in the tray
///
/// The file itself never travels in JSON; drafts keep the file name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSlot {
    #[serde(rename = "type")]
    document: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(skip)]
    file: Option<FileUpload>,
}

impl DocumentSlot {
    /// Empty slot awaiting a file
    #[must_use]
    pub fn new(document: DocumentType) -> Self {
        Self {
            document,
            file_name: None,
            file: None,
        }
    }

    /// Document this slot holds
    #[inline]
    #[must_use]
    pub fn document(&self) -> DocumentType {
        self.document
    }

    /// Attached file, if any
    #[inline]
    #[must_use]
    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    /// File name of the attached or previously saved file
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Slot holds a non-empty file
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.file.as_ref().is_some_and(|f| !f.is_empty())
    }

    pub(crate) fn attach(&mut self, file: FileUpload) {
        self.file_name = Some(file.file_name().to_string());
        self.file = Some(file);
    }
}

/// The applicant's form data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    full_name: String,
    dob: String,
    gender: String,
    nationality: String,
    aadhaar_number: String,
    phone_number: String,
    email: String,
    alternate_email: String,
    current_address: String,
    permanent_address: String,
    emergency_contact: String,
    fathers_name: String,
    mothers_name: String,
    fathers_occupation: String,
    mothers_occupation: String,
    fathers_contact: String,
    mothers_contact: String,
    documents: Vec<DocumentSlot>,
    agreement: bool,
}

impl FormData {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a text field
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Dob => &self.dob,
            FormField::Gender => &self.gender,
            FormField::Nationality => &self.nationality,
            FormField::AadhaarNumber => &self.aadhaar_number,
            FormField::PhoneNumber => &self.phone_number,
            FormField::Email => &self.email,
            FormField::AlternateEmail => &self.alternate_email,
            FormField::CurrentAddress => &self.current_address,
            FormField::PermanentAddress => &self.permanent_address,
            FormField::EmergencyContact => &self.emergency_contact,
            FormField::FathersName => &self.fathers_name,
            FormField::MothersName => &self.mothers_name,
            FormField::FathersOccupation => &self.fathers_occupation,
            FormField::MothersOccupation => &self.mothers_occupation,
            FormField::FathersContact => &self.fathers_contact,
            FormField::MothersContact => &self.mothers_contact,
        }
    }

    /// Assign a text field, stripping whitespace from phone fields
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let value = if field.is_phone() {
            normalize_phone(&value)
        } else {
            value
        };
        *self.slot_mut(field) = value;
    }

    /// Set a field, builder style
    #[must_use]
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FullName => &mut self.full_name,
            FormField::Dob => &mut self.dob,
            FormField::Gender => &mut self.gender,
            FormField::Nationality => &mut self.nationality,
            FormField::AadhaarNumber => &mut self.aadhaar_number,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::Email => &mut self.email,
            FormField::AlternateEmail => &mut self.alternate_email,
            FormField::CurrentAddress => &mut self.current_address,
            FormField::PermanentAddress => &mut self.permanent_address,
            FormField::EmergencyContact => &mut self.emergency_contact,
            FormField::FathersName => &mut self.fathers_name,
            FormField::MothersName => &mut self.mothers_name,
            FormField::FathersOccupation => &mut self.fathers_occupation,
            FormField::MothersOccupation => &mut self.mothers_occupation,
            FormField::FathersContact => &mut self.fathers_contact,
            FormField::MothersContact => &mut self.mothers_contact,
        }
    }

    /// Declaration accepted
    #[inline]
    #[must_use]
    pub fn agreement(&self) -> bool {
        self.agreement
    }

    /// Accept or withdraw the declaration
    pub fn set_agreement(&mut self, agreed: bool) {
        self.agreement = agreed;
    }

    /// Document tray, in insertion order
    #[inline]
    #[must_use]
    pub fn documents(&self) -> &[DocumentSlot] {
        &self.documents
    }

    pub(crate) fn documents_mut(&mut self) -> &mut Vec<DocumentSlot> {
        &mut self.documents
    }

    /// Slots holding a non-empty file
    pub fn valid_documents(&self) -> impl Iterator<Item = &DocumentSlot> {
        self.documents.iter().filter(|d| d.is_valid())
    }
}
