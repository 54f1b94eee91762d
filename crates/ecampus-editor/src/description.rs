//! Course description
//!
//! Descriptive content of a course. The structure editor stays locked
//! until every field here is filled in.

use crate::error::{EditorError, EditorResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ecampus_schema::ProgramType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted course image (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// One of the two course images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// `image1`
    First,
    /// `image2`
    Second,
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSlot::First => f.write_str("Image 1"),
            ImageSlot::Second => f.write_str("Image 2"),
        }
    }
}

/// Field checked by the completeness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptionField {
    /// Free-text program description
    ProgramDescription,
    /// First course image
    Image1,
    /// Second course image
    Image2,
    /// Department vision
    Vision,
    /// Department mission
    Mission,
    /// Positive number of years
    YearsOfDepartment,
    /// At least one semester with subjects
    Syllabus,
    /// At least one objective
    ProgramEducationalObjectives,
    /// At least one outcome
    ProgramOutcomes,
    /// UG or PG selection
    ProgramType,
}

impl DescriptionField {
    /// Label shown in the incomplete-description message
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DescriptionField::ProgramDescription => "Program Description",
            DescriptionField::Image1 => "Image 1",
            DescriptionField::Image2 => "Image 2",
            DescriptionField::Vision => "Vision",
            DescriptionField::Mission => "Mission",
            DescriptionField::YearsOfDepartment => "Years of Department",
            DescriptionField::Syllabus => "Syllabus",
            DescriptionField::ProgramEducationalObjectives => "Program Educational Objectives",
            DescriptionField::ProgramOutcomes => "Program Outcomes",
            DescriptionField::ProgramType => "Program Type",
        }
    }
}

/// A semester of the syllabus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    /// Semester name
    #[serde(default)]
    pub semester: String,
    /// Subject names
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Semester {
    /// Named with at least one subject, none blank
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.semester.trim().is_empty()
            && !self.subjects.is_empty()
            && self.subjects.iter().all(|s| !s.trim().is_empty())
    }
}

/// Split newline-separated text into trimmed, non-empty lines
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Encode image bytes as a base64 data URL
#[must_use]
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Editable course description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireDescription")]
pub struct CourseDescription {
    title: String,
    program_description: String,
    image1: Option<String>,
    image2: Option<String>,
    vision: String,
    mission: String,
    years_of_department: String,
    syllabus: Vec<Semester>,
    program_educational_objectives: String,
    program_outcomes: String,
    program_type: Option<ProgramType>,
}

impl Default for CourseDescription {
    fn default() -> Self {
        Self {
            title: String::new(),
            program_description: String::new(),
            image1: None,
            image2: None,
            vision: String::new(),
            mission: String::new(),
            years_of_department: String::new(),
            syllabus: vec![Semester::default()],
            program_educational_objectives: String::new(),
            program_outcomes: String::new(),
            program_type: None,
        }
    }
}

impl CourseDescription {
    /// Blank description with one empty semester
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Course title (display only)
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Program description text
    #[inline]
    #[must_use]
    pub fn program_description(&self) -> &str {
        &self.program_description
    }

    /// Replace the program description
    pub fn set_program_description(&mut self, text: impl Into<String>) {
        self.program_description = text.into();
    }

    /// Vision statement
    #[inline]
    #[must_use]
    pub fn vision(&self) -> &str {
        &self.vision
    }

    /// Replace the vision statement
    pub fn set_vision(&mut self, text: impl Into<String>) {
        self.vision = text.into();
    }

    /// Mission statement
    #[inline]
    #[must_use]
    pub fn mission(&self) -> &str {
        &self.mission
    }

    /// Replace the mission statement
    pub fn set_mission(&mut self, text: impl Into<String>) {
        self.mission = text.into();
    }

    /// Years of department as entered
    #[inline]
    #[must_use]
    pub fn years_of_department(&self) -> &str {
        &self.years_of_department
    }

    /// Replace the years of department text
    pub fn set_years_of_department(&mut self, years: impl Into<String>) {
        self.years_of_department = years.into();
    }

    /// Objectives as entered, one per line
    #[inline]
    #[must_use]
    pub fn program_educational_objectives(&self) -> &str {
        &self.program_educational_objectives
    }

    /// Replace the objectives text
    pub fn set_program_educational_objectives(&mut self, text: impl Into<String>) {
        self.program_educational_objectives = text.into();
    }

    /// Outcomes as entered, one per line
    #[inline]
    #[must_use]
    pub fn program_outcomes(&self) -> &str {
        &self.program_outcomes
    }

    /// Replace the outcomes text
    pub fn set_program_outcomes(&mut self, text: impl Into<String>) {
        self.program_outcomes = text.into();
    }

    /// Selected program type
    #[inline]
    #[must_use]
    pub fn program_type(&self) -> Option<ProgramType> {
        self.program_type
    }

    /// Select the program type
    pub fn set_program_type(&mut self, program_type: ProgramType) {
        self.program_type = Some(program_type);
    }

    /// Image data URL
    #[must_use]
    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::First => self.image1.as_deref(),
            ImageSlot::Second => self.image2.as_deref(),
        }
    }

    /// Store an uploaded image as a data URL
    ///
    /// # Errors
    /// - `EditorError::NotAnImage` unless the MIME type is `image/*`
    /// - `EditorError::ImageTooLarge` above [`MAX_IMAGE_BYTES`]
    pub fn set_image(&mut self, slot: ImageSlot, mime_type: &str, bytes: &[u8]) -> EditorResult<()> {
        if !mime_type.starts_with("image/") {
            return Err(EditorError::NotAnImage {
                slot,
                mime_type: mime_type.to_string(),
            });
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(EditorError::ImageTooLarge {
                slot,
                size: bytes.len(),
            });
        }
        let url = data_url(mime_type, bytes);
        match slot {
            ImageSlot::First => self.image1 = Some(url),
            ImageSlot::Second => self.image2 = Some(url),
        }
        Ok(())
    }

    /// Syllabus semesters
    #[inline]
    #[must_use]
    pub fn syllabus(&self) -> &[Semester] {
        &self.syllabus
    }

    /// Append a blank semester, returning its index
    pub fn add_semester(&mut self) -> usize {
        self.syllabus.push(Semester::default());
        self.syllabus.len() - 1
    }

    /// Rename a semester
    ///
    /// # Errors
    /// `EditorError::NoSuchSemester` if the index is out of range.
    pub fn rename_semester(&mut self, index: usize, name: impl Into<String>) -> EditorResult<()> {
        let semester = self
            .syllabus
            .get_mut(index)
            .ok_or(EditorError::NoSuchSemester(index))?;
        semester.semester = name.into();
        Ok(())
    }

    /// Append a blank subject to a semester, returning its index
    ///
    /// # Errors
    /// `EditorError::NoSuchSemester` if the index is out of range.
    pub fn add_subject(&mut self, semester: usize) -> EditorResult<usize> {
        let entry = self
            .syllabus
            .get_mut(semester)
            .ok_or(EditorError::NoSuchSemester(semester))?;
        entry.subjects.push(String::new());
        Ok(entry.subjects.len() - 1)
    }

    /// Edit a subject
    ///
    /// # Errors
    /// `EditorError::NoSuchSemester` or `EditorError::NoSuchSubject`.
    pub fn set_subject(
        &mut self,
        semester: usize,
        subject: usize,
        name: impl Into<String>,
    ) -> EditorResult<()> {
        let slot = self
            .syllabus
            .get_mut(semester)
            .ok_or(EditorError::NoSuchSemester(semester))?
            .subjects
            .get_mut(subject)
            .ok_or(EditorError::NoSuchSubject { semester, subject })?;
        *slot = name.into();
        Ok(())
    }

    fn years(&self) -> Option<u32> {
        self.years_of_department
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|y| *y > 0)
    }

    /// Fields that still block the structure editor
    #[must_use]
    pub fn missing_fields(&self) -> Vec<DescriptionField> {
        let blank = |s: &str| s.trim().is_empty();
        let mut missing = Vec::new();
        if blank(&self.program_description) {
            missing.push(DescriptionField::ProgramDescription);
        }
        if self.image1.is_none() {
            missing.push(DescriptionField::Image1);
        }
        if self.image2.is_none() {
            missing.push(DescriptionField::Image2);
        }
        if blank(&self.vision) {
            missing.push(DescriptionField::Vision);
        }
        if blank(&self.mission) {
            missing.push(DescriptionField::Mission);
        }
        if self.years().is_none() {
            missing.push(DescriptionField::YearsOfDepartment);
        }
        if self.syllabus.is_empty() || !self.syllabus.iter().all(Semester::is_complete) {
            missing.push(DescriptionField::Syllabus);
        }
        if split_lines(&self.program_educational_objectives).is_empty() {
            missing.push(DescriptionField::ProgramEducationalObjectives);
        }
        if split_lines(&self.program_outcomes).is_empty() {
            missing.push(DescriptionField::ProgramOutcomes);
        }
        if self.program_type.is_none() {
            missing.push(DescriptionField::ProgramType);
        }
        missing
    }

    /// Every field filled in
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Body for the add-description endpoint
    ///
    /// # Errors
    /// `EditorError::DescriptionIncomplete` naming the missing fields.
    pub fn request_body(&self) -> EditorResult<DescriptionRequest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(EditorError::DescriptionIncomplete(missing));
        }
        let (Some(years), Some(program_type), Some(image1), Some(image2)) = (
            self.years(),
            self.program_type,
            self.image1.clone(),
            self.image2.clone(),
        ) else {
            return Err(EditorError::DescriptionIncomplete(self.missing_fields()));
        };

        Ok(DescriptionRequest {
            program_description: self.program_description.trim().to_string(),
            image1,
            image2,
            vision: self.vision.trim().to_string(),
            mission: self.mission.trim().to_string(),
            years_of_department: years,
            syllabus: self.syllabus.clone(),
            program_educational_objectives: split_lines(&self.program_educational_objectives),
            program_outcomes: split_lines(&self.program_outcomes),
            program_type,
        })
    }
}

/// JSON body saved by the add-description endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    /// Program description text
    pub program_description: String,
    /// First image as a data URL
    pub image1: String,
    /// Second image as a data URL
    pub image2: String,
    /// Vision statement
    pub vision: String,
    /// Mission statement
    pub mission: String,
    /// Years of department
    pub years_of_department: u32,
    /// Syllabus by semester
    pub syllabus: Vec<Semester>,
    /// Objectives, one per entry
    pub program_educational_objectives: Vec<String>,
    /// Outcomes, one per entry
    pub program_outcomes: Vec<String>,
    /// Program type
    pub program_type: ProgramType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireDescription {
    title: Option<String>,
    program_description: Option<String>,
    description: Option<String>,
    image1: Option<String>,
    image2: Option<String>,
    vision: Option<String>,
    mission: Option<String>,
    years_of_department: Option<serde_json::Value>,
    syllabus: Option<Vec<Semester>>,
    program_educational_objectives: Vec<String>,
    program_outcomes: Vec<String>,
    program_type: Option<ProgramType>,
}

impl From<WireDescription> for CourseDescription {
    fn from(wire: WireDescription) -> Self {
        let years = match wire.years_of_department {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let syllabus = wire
            .syllabus
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| vec![Semester::default()]);
        Self {
            title: wire.title.unwrap_or_else(|| "Unknown Course".to_string()),
            program_description: wire
                .program_description
                .or(wire.description)
                .unwrap_or_default(),
            image1: wire.image1.filter(|s| !s.is_empty()),
            image2: wire.image2.filter(|s| !s.is_empty()),
            vision: wire.vision.unwrap_or_default(),
            mission: wire.mission.unwrap_or_default(),
            years_of_department: years,
            syllabus,
            program_educational_objectives: wire.program_educational_objectives.join("\n"),
            program_outcomes: wire.program_outcomes.join("\n"),
            program_type: wire.program_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A description with every field filled in
    fn complete() -> CourseDescription {
        let mut d = CourseDescription::new("B.Tech CSE");
        d.set_program_description("Four-year programme");
        d.set_image(ImageSlot::First, "image/png", &[1, 2, 3]).unwrap();
        d.set_image(ImageSlot::Second, "image/jpeg", &[4, 5]).unwrap();
        d.set_vision("Excellence");
        d.set_mission("Teaching");
        d.set_years_of_department("12");
        d.rename_semester(0, "Semester 1").unwrap();
        let s = d.add_subject(0).unwrap();
        d.set_subject(0, s, "Mathematics").unwrap();
        d.set_program_educational_objectives("PEO1\n\n  PEO2 ");
        d.set_program_outcomes("PO1");
        d.set_program_type(ProgramType::Undergraduate);
        d
    }

    #[test]
    fn blank_description_lists_everything() {
        let missing = CourseDescription::new("x").missing_fields();
        assert_eq!(missing.len(), 10);
    }

    #[test]
    fn complete_description() {
        assert!(complete().is_complete());
    }

    #[test]
    fn semester_needs_named_non_blank_subjects() {
        let mut d = complete();
        let sem = d.add_semester();
        assert_eq!(d.missing_fields(), vec![DescriptionField::Syllabus]);
        d.rename_semester(sem, "Semester 2").unwrap();
        let sub = d.add_subject(sem).unwrap();
        assert!(!d.is_complete());
        d.set_subject(sem, sub, "Physics").unwrap();
        assert!(d.is_complete());
        assert!(matches!(d.set_subject(9, 0, "x"), Err(EditorError::NoSuchSemester(9))));
        assert!(matches!(
            d.set_subject(0, 9, "x"),
            Err(EditorError::NoSuchSubject { semester: 0, subject: 9 })
        ));
    }

    #[test]
    fn years_must_be_positive() {
        let mut d = complete();
        d.set_years_of_department("0");
        assert_eq!(d.missing_fields(), vec![DescriptionField::YearsOfDepartment]);
        d.set_years_of_department("many");
        assert!(!d.is_complete());
    }

    #[test]
    fn images_become_data_urls() {
        let d = complete();
        assert_eq!(d.image(ImageSlot::First), Some("data:image/png;base64,AQID"));
    }

    #[test]
    fn image_limits() {
        let mut d = CourseDescription::new("x");
        let big = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            d.set_image(ImageSlot::Second, "image/png", &big),
            Err(EditorError::ImageTooLarge { slot: ImageSlot::Second, .. })
        ));
        assert!(matches!(
            d.set_image(ImageSlot::First, "application/pdf", &[1]),
            Err(EditorError::NotAnImage { .. })
        ));
        assert!(d.image(ImageSlot::First).is_none());
    }

    #[test]
    fn request_body_shapes_lists_and_numbers() {
        let body = complete().request_body().unwrap();
        assert_eq!(body.years_of_department, 12);
        assert_eq!(body.program_educational_objectives, vec!["PEO1", "PEO2"]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["yearsOfDepartment"], 12);
        assert_eq!(json["programType"], "UG");
        assert_eq!(json["syllabus"][0]["subjects"][0], "Mathematics");
    }

    #[test]
    fn incomplete_request_is_rejected() {
        let err = CourseDescription::new("x").request_body().unwrap_err();
        assert!(matches!(err, EditorError::DescriptionIncomplete(ref f) if f.len() == 10));
    }

    #[test]
    fn parses_backend_description() {
        let json = r#"{
            "title": "MBA",
            "description": "Legacy text",
            "yearsOfDepartment": 7,
            "programEducationalObjectives": ["A", "B"],
            "programOutcomes": [],
            "syllabus": [],
            "programType": "PG"
        }"#;
        let d: CourseDescription = serde_json::from_str(json).unwrap();
        assert_eq!(d.title(), "MBA");
        assert_eq!(d.program_description(), "Legacy text");
        assert_eq!(d.years_of_department(), "7");
        assert_eq!(d.program_educational_objectives(), "A\nB");
        assert_eq!(d.syllabus().len(), 1);
        assert_eq!(d.program_type(), Some(ProgramType::Postgraduate));
    }
}
