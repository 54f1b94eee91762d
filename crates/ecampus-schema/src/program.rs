//! Program types and the document catalog

use crate::error::SchemaError;
use crate::level::AcademicLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Program type a course belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProgramType {
    /// Undergraduate program
    #[serde(rename = "UG")]
    Undergraduate,
    /// Postgraduate program
    #[serde(rename = "PG")]
    Postgraduate,
}

impl ProgramType {
    /// All program types
    pub const ALL: [ProgramType; 2] = [ProgramType::Undergraduate, ProgramType::Postgraduate];

    /// Wire code ("UG" / "PG")
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ProgramType::Undergraduate => "UG",
            ProgramType::Postgraduate => "PG",
        }
    }

    /// Academic levels an application for this program may ask for
    #[inline]
    #[must_use]
    pub fn academic_levels(self) -> &'static [AcademicLevel] {
        match self {
            ProgramType::Undergraduate => &[AcademicLevel::Tenth, AcademicLevel::Twelth],
            ProgramType::Postgraduate => &AcademicLevel::ALL,
        }
    }

    /// Check whether the program offers a level
    #[inline]
    #[must_use]
    pub fn offers(self, level: AcademicLevel) -> bool {
        self.academic_levels().contains(&level)
    }

    /// Documents a schema for this program may require
    #[must_use]
    pub fn document_catalog(self) -> &'static [DocumentType] {
        use DocumentType::*;
        match self {
            ProgramType::Undergraduate => &[
                TenthMarksheet,
                TwelfthMarksheet,
                Aadhaar,
                Pan,
                DrivingLicense,
                PassportPhoto,
                Signature,
            ],
            ProgramType::Postgraduate => &[
                TenthMarksheet,
                TwelfthMarksheet,
                GraduationMarksheet,
                PostgraduateMarksheet,
                Aadhaar,
                Pan,
                DrivingLicense,
                PassportPhoto,
                Signature,
            ],
        }
    }
}

impl Default for ProgramType {
    fn default() -> Self {
        ProgramType::Postgraduate
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProgramType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UG" | "ug" => Ok(ProgramType::Undergraduate),
            "PG" | "pg" => Ok(ProgramType::Postgraduate),
            other => Err(SchemaError::UnknownProgramType(other.to_string())),
        }
    }
}

/// Document types an application can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Class 10 marksheet
    #[serde(rename = "10th Marksheet")]
    TenthMarksheet,
    /// Class 12 marksheet
    #[serde(rename = "12th Marksheet")]
    TwelfthMarksheet,
    /// Graduation marksheet
    #[serde(rename = "Graduation Marksheet")]
    GraduationMarksheet,
    /// Postgraduate marksheet
    #[serde(rename = "Postgraduate Marksheet")]
    PostgraduateMarksheet,
    /// Aadhaar card
    #[serde(rename = "Aadhaar")]
    Aadhaar,
    /// PAN card
    #[serde(rename = "PAN")]
    Pan,
    /// Driving license
    #[serde(rename = "Driving License")]
    DrivingLicense,
    /// Passport-size photo; images only
    #[serde(rename = "Image (Passport Photo)")]
    PassportPhoto,
    /// Signature; images only
    #[serde(rename = "Signature")]
    Signature,
}

impl DocumentType {
    /// Every document type known to the portal
    pub const ALL: [DocumentType; 9] = [
        DocumentType::TenthMarksheet,
        DocumentType::TwelfthMarksheet,
        DocumentType::GraduationMarksheet,
        DocumentType::PostgraduateMarksheet,
        DocumentType::Aadhaar,
        DocumentType::Pan,
        DocumentType::DrivingLicense,
        DocumentType::PassportPhoto,
        DocumentType::Signature,
    ];

    /// Human-readable label, identical to the wire value
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::TenthMarksheet => "10th Marksheet",
            DocumentType::TwelfthMarksheet => "12th Marksheet",
            DocumentType::GraduationMarksheet => "Graduation Marksheet",
            DocumentType::PostgraduateMarksheet => "Postgraduate Marksheet",
            DocumentType::Aadhaar => "Aadhaar",
            DocumentType::Pan => "PAN",
            DocumentType::DrivingLicense => "Driving License",
            DocumentType::PassportPhoto => "Image (Passport Photo)",
            DocumentType::Signature => "Signature",
        }
    }

    /// Image-designated documents only accept `image/*` uploads
    #[inline]
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(self, DocumentType::PassportPhoto | DocumentType::Signature)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DocumentType::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SchemaError::UnknownDocument(trimmed.to_string()))
    }
}
