//! Academic levels and their fixed subfields
//!
//! A level belongs to one of two phases. School levels (10th, 12th) are
//! graded in percent; college levels (graduation, postgraduate) on a
//! 10-point CGPA scale. Each phase has its own set of fixed subfields.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic level of a qualification
///
/// Wire keys keep the backend spelling (`twelth`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicLevel {
    /// 10th standard
    Tenth,
    /// 12th standard
    Twelth,
    /// Undergraduate degree
    Graduation,
    /// Postgraduate degree
    Postgraduate,
}

/// Schooling phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Board examinations, graded in percent
    School,
    /// University degrees, graded in CGPA
    College,
}

const SCHOOL_SUBFIELDS: [Subfield; 5] = [
    Subfield::SchoolName,
    Subfield::Board,
    Subfield::YearOfPassing,
    Subfield::Percentage,
    Subfield::Subjects,
];

const SENIOR_SCHOOL_SUBFIELDS: [Subfield; 6] = [
    Subfield::SchoolName,
    Subfield::Board,
    Subfield::Stream,
    Subfield::YearOfPassing,
    Subfield::Percentage,
    Subfield::Subjects,
];

const COLLEGE_SUBFIELDS: [Subfield; 6] = [
    Subfield::CollegeName,
    Subfield::University,
    Subfield::Degree,
    Subfield::Branch,
    Subfield::YearOfPassing,
    Subfield::Percentage,
];

impl AcademicLevel {
    /// All levels in ascending order
    pub const ALL: [AcademicLevel; 4] = [
        AcademicLevel::Tenth,
        AcademicLevel::Twelth,
        AcademicLevel::Graduation,
        AcademicLevel::Postgraduate,
    ];

    /// Wire key
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            AcademicLevel::Tenth => "tenth",
            AcademicLevel::Twelth => "twelth",
            AcademicLevel::Graduation => "graduation",
            AcademicLevel::Postgraduate => "postgraduate",
        }
    }

    /// Display title used in section headings
    #[inline]
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            AcademicLevel::Tenth => "10th",
            AcademicLevel::Twelth => "12th",
            AcademicLevel::Graduation => "Graduation",
            AcademicLevel::Postgraduate => "Postgraduate",
        }
    }

    /// Suffix that namespaces per-entry error keys
    ///
    /// Fixed subfields share names across levels of the same phase, so
    /// `board10_0` and `board12_0` must stay distinct.
    #[inline]
    #[must_use]
    pub fn error_suffix(self) -> &'static str {
        match self {
            AcademicLevel::Tenth => "10",
            AcademicLevel::Twelth => "12",
            AcademicLevel::Graduation => "Grad",
            AcademicLevel::Postgraduate => "PG",
        }
    }

    /// Schooling phase
    #[inline]
    #[must_use]
    pub fn phase(self) -> Phase {
        match self {
            AcademicLevel::Tenth | AcademicLevel::Twelth => Phase::School,
            AcademicLevel::Graduation | AcademicLevel::Postgraduate => Phase::College,
        }
    }

    /// Upper bound for the percentage subfield
    #[inline]
    #[must_use]
    pub fn percentage_ceiling(self) -> f64 {
        match self.phase() {
            Phase::School => 100.0,
            Phase::College => 10.0,
        }
    }

    /// Label of the percentage subfield for this level
    #[inline]
    #[must_use]
    pub fn percentage_label(self) -> &'static str {
        match self.phase() {
            Phase::School => "Percentage",
            Phase::College => "CGPA",
        }
    }

    /// Fixed subfields that apply to this level, in display order
    #[must_use]
    pub fn subfields(self) -> &'static [Subfield] {
        match self {
            AcademicLevel::Tenth => &SCHOOL_SUBFIELDS,
            AcademicLevel::Twelth => &SENIOR_SCHOOL_SUBFIELDS,
            AcademicLevel::Graduation | AcademicLevel::Postgraduate => &COLLEGE_SUBFIELDS,
        }
    }
}

impl fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AcademicLevel {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        AcademicLevel::ALL
            .into_iter()
            .find(|l| l.key() == key)
            .ok_or_else(|| SchemaError::UnknownLevel(key.to_string()))
    }
}

/// Fixed subfield of an academic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subfield {
    /// Percentage or CGPA
    Percentage,
    /// Year the qualification was obtained
    YearOfPassing,
    /// Examination board (school)
    Board,
    /// School name (school)
    SchoolName,
    /// Subjects studied (school)
    Subjects,
    /// Stream (12th only)
    Stream,
    /// Awarding university (college)
    University,
    /// College name (college)
    CollegeName,
    /// Degree title (college)
    Degree,
    /// Branch / specialisation (college)
    Branch,
}

impl Subfield {
    /// Every fixed subfield
    pub const ALL: [Subfield; 10] = [
        Subfield::Percentage,
        Subfield::YearOfPassing,
        Subfield::Board,
        Subfield::SchoolName,
        Subfield::Subjects,
        Subfield::Stream,
        Subfield::University,
        Subfield::CollegeName,
        Subfield::Degree,
        Subfield::Branch,
    ];

    /// Options offered for the 12th-standard stream
    pub const STREAM_OPTIONS: [&'static str; 3] = ["Science", "Commerce", "Arts"];

    /// Key of the flag in the schema's subfield specification
    #[must_use]
    pub fn flag_key(self) -> &'static str {
        match self {
            Subfield::Percentage => "percentage",
            Subfield::YearOfPassing => "yearOfPassing",
            Subfield::Board => "board",
            Subfield::SchoolName => "schoolName",
            Subfield::Subjects => "subjects",
            Subfield::Stream => "stream",
            Subfield::University => "university",
            Subfield::CollegeName => "collegeName",
            Subfield::Degree => "degree",
            Subfield::Branch => "branch",
        }
    }

    /// Key under which an education entry stores the value
    #[inline]
    #[must_use]
    pub fn entry_key(self) -> &'static str {
        match self {
            Subfield::YearOfPassing => "year",
            other => other.flag_key(),
        }
    }

    /// Prefix of the per-entry error key
    #[inline]
    #[must_use]
    pub fn error_prefix(self) -> &'static str {
        match self {
            Subfield::SchoolName => "school",
            Subfield::CollegeName => "college",
            Subfield::YearOfPassing => "year",
            other => other.flag_key(),
        }
    }

    /// Editor / form label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Subfield::Percentage => "Percentage",
            Subfield::YearOfPassing => "Year of Passing",
            Subfield::Board => "Board",
            Subfield::SchoolName => "School Name",
            Subfield::Subjects => "Subjects",
            Subfield::Stream => "Stream",
            Subfield::University => "University",
            Subfield::CollegeName => "College Name",
            Subfield::Degree => "Degree",
            Subfield::Branch => "Branch",
        }
    }

    /// Check whether the subfield belongs to a level
    #[inline]
    #[must_use]
    pub fn applies_to(self, level: AcademicLevel) -> bool {
        level.subfields().contains(&self)
    }
}

impl fmt::Display for Subfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_key())
    }
}

impl FromStr for Subfield {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subfield::ALL
            .into_iter()
            .find(|sf| sf.flag_key() == s)
            .ok_or_else(|| SchemaError::UnknownSubfield(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_only_for_twelth() {
        assert!(Subfield::Stream.applies_to(AcademicLevel::Twelth));
        assert!(!Subfield::Stream.applies_to(AcademicLevel::Tenth));
        assert!(!Subfield::Stream.applies_to(AcademicLevel::Graduation));
    }

    #[test]
    fn phase_specific_subfields() {
        assert!(Subfield::Board.applies_to(AcademicLevel::Tenth));
        assert!(!Subfield::Board.applies_to(AcademicLevel::Postgraduate));
        assert!(Subfield::University.applies_to(AcademicLevel::Graduation));
        assert!(!Subfield::University.applies_to(AcademicLevel::Twelth));
        for level in AcademicLevel::ALL {
            assert!(Subfield::Percentage.applies_to(level));
            assert!(Subfield::YearOfPassing.applies_to(level));
        }
    }

    #[test]
    fn percentage_ceiling_by_phase() {
        assert_eq!(AcademicLevel::Tenth.percentage_ceiling(), 100.0);
        assert_eq!(AcademicLevel::Postgraduate.percentage_ceiling(), 10.0);
        assert_eq!(AcademicLevel::Graduation.percentage_label(), "CGPA");
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for level in AcademicLevel::ALL {
            assert_eq!(level.key().parse::<AcademicLevel>().unwrap(), level);
        }
        for subfield in Subfield::ALL {
            assert_eq!(subfield.flag_key().parse::<Subfield>().unwrap(), subfield);
        }
        assert!("twelfth".parse::<AcademicLevel>().is_err());
    }

    #[test]
    fn entry_and_error_keys() {
        assert_eq!(Subfield::YearOfPassing.entry_key(), "year");
        assert_eq!(Subfield::SchoolName.error_prefix(), "school");
        assert_eq!(Subfield::CollegeName.entry_key(), "collegeName");
        assert_eq!(Subfield::CollegeName.error_prefix(), "college");
    }

    #[test]
    fn wire_spelling_is_preserved() {
        let json = serde_json::to_string(&AcademicLevel::Twelth).unwrap();
        assert_eq!(json, "\"twelth\"");
        let sf: Subfield = serde_json::from_str("\"yearOfPassing\"").unwrap();
        assert_eq!(sf, Subfield::YearOfPassing);
    }
}
