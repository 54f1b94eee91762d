//! Section validation rules
//!
//! Each function re-checks one section from scratch and returns the
//! complete error map for it. The first failing rule for a field wins.

use crate::education::{EducationDetails, EducationEntry};
use crate::form::{FormData, FormField};
use crate::validation::{
    is_blank, is_email, is_identity_number, is_iso_date, is_number, is_phone, is_year_of_passing,
    parse_score, FieldErrors,
};
use ecampus_schema::{
    AcademicLevel, CustomFieldSpec, FieldKind, FormStructure, Phase, Subfield, SubfieldSpec,
};

/// Message when the identity number is not 12 digits
pub const IDENTITY_NUMBER_MESSAGE: &str = "Valid 12-digit Aadhaar number is required";

/// Message when the primary email is malformed
pub const EMAIL_MESSAGE: &str = "Valid email is required";

/// Message when the declaration is not accepted
pub const AGREEMENT_MESSAGE: &str = "You must agree to the terms and conditions";

fn require(errors: &mut FieldErrors, form: &FormData, field: FormField, message: &str) {
    if is_blank(form.get(field)) {
        errors.insert(field.key(), message);
    }
}

fn require_phone(errors: &mut FieldErrors, form: &FormData, field: FormField, message: &str) {
    if !is_phone(form.get(field)) {
        errors.insert(field.key(), message);
    }
}

/// Personal Details
#[must_use]
pub fn personal(form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, form, FormField::FullName, "Full name is required");
    require(&mut errors, form, FormField::Dob, "Date of birth is required");
    require(&mut errors, form, FormField::Gender, "Gender is required");
    require(&mut errors, form, FormField::Nationality, "Nationality is required");
    if !is_identity_number(form.get(FormField::AadhaarNumber)) {
        errors.insert(FormField::AadhaarNumber.key(), IDENTITY_NUMBER_MESSAGE);
    }
    errors
}

/// Contact Information
#[must_use]
pub fn contact(form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_phone(
        &mut errors,
        form,
        FormField::PhoneNumber,
        "Valid 10-digit phone number is required",
    );
    if !is_email(form.get(FormField::Email)) {
        errors.insert(FormField::Email.key(), EMAIL_MESSAGE);
    }
    let alternate = form.get(FormField::AlternateEmail);
    if !is_blank(alternate) && !is_email(alternate) {
        errors.insert(
            FormField::AlternateEmail.key(),
            "Valid alternate email is required",
        );
    }
    require(
        &mut errors,
        form,
        FormField::CurrentAddress,
        "Current address is required",
    );
    require(
        &mut errors,
        form,
        FormField::PermanentAddress,
        "Permanent address is required",
    );
    require_phone(
        &mut errors,
        form,
        FormField::EmergencyContact,
        "Valid 10-digit emergency contact is required",
    );
    errors
}

/// Parent/Guardian Details
#[must_use]
pub fn parents(form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, form, FormField::FathersName, "Father's name is required");
    require(&mut errors, form, FormField::MothersName, "Mother's name is required");
    require(
        &mut errors,
        form,
        FormField::FathersOccupation,
        "Father's occupation is required",
    );
    require(
        &mut errors,
        form,
        FormField::MothersOccupation,
        "Mother's occupation is required",
    );
    require_phone(
        &mut errors,
        form,
        FormField::FathersContact,
        "Valid 10-digit father's contact is required",
    );
    require_phone(
        &mut errors,
        form,
        FormField::MothersContact,
        "Valid 10-digit mother's contact is required",
    );
    errors
}

/// Error key for a level with no entry
#[must_use]
pub fn missing_level_key(level: AcademicLevel) -> String {
    format!("academicDetails_{}", level.error_suffix())
}

/// Error key of a fixed subfield in an entry
#[must_use]
pub fn subfield_key(subfield: Subfield, level: AcademicLevel, index: usize) -> String {
    format!("{}{}_{index}", subfield.error_prefix(), level.error_suffix())
}

/// Error key of a custom field in an entry
#[must_use]
pub fn custom_field_key(name: &str, level: AcademicLevel, index: usize) -> String {
    format!("{name}_{}_{index}", level.key())
}

/// Error key for an entry value stored under `entry_key`
#[must_use]
pub fn entry_error_key(level: AcademicLevel, index: usize, entry_key: &str) -> String {
    level
        .subfields()
        .iter()
        .find(|sf| sf.entry_key() == entry_key)
        .map_or_else(
            || custom_field_key(entry_key, level, index),
            |sf| subfield_key(*sf, level, index),
        )
}

/// Every error key an entry can produce
#[must_use]
pub fn entry_error_keys(spec: &SubfieldSpec, index: usize) -> Vec<String> {
    let level = spec.level();
    level
        .subfields()
        .iter()
        .map(|sf| subfield_key(*sf, level, index))
        .chain(
            spec.custom_fields()
                .iter()
                .map(|f| custom_field_key(f.name(), level, index)),
        )
        .collect()
}

fn blank_message(subfield: Subfield, level: AcademicLevel) -> String {
    match subfield {
        Subfield::Percentage => match level.phase() {
            Phase::School => "Valid percentage is required".to_string(),
            Phase::College => "Valid CGPA is required".to_string(),
        },
        Subfield::Subjects => "Subjects are required".to_string(),
        Subfield::SchoolName => "School name is required".to_string(),
        Subfield::CollegeName => "College name is required".to_string(),
        Subfield::YearOfPassing => "Year of passing is required".to_string(),
        other => format!("{} is required", other.label()),
    }
}

fn check_subfield(
    subfield: Subfield,
    level: AcademicLevel,
    value: &str,
    current_year: i32,
) -> Option<String> {
    if is_blank(value) {
        return Some(blank_message(subfield, level));
    }
    match subfield {
        Subfield::Percentage if parse_score(value, level.percentage_ceiling()).is_none() => {
            Some(blank_message(subfield, level))
        }
        Subfield::YearOfPassing if !is_year_of_passing(value, current_year) => {
            Some(format!("Year of passing must be between 1900 and {current_year}"))
        }
        Subfield::Stream if !Subfield::STREAM_OPTIONS.contains(&value.trim()) => {
            Some("Select a valid stream".to_string())
        }
        _ => None,
    }
}

fn check_custom_field(field: &CustomFieldSpec, value: &str) -> Option<String> {
    if is_blank(value) {
        return field
            .is_required()
            .then(|| format!("{} is required", field.label()));
    }
    match field.kind() {
        FieldKind::Number if !is_number(value) => Some(format!("{} must be a number", field.label())),
        FieldKind::Date if !is_iso_date(value) => {
            Some(format!("{} must be a date (YYYY-MM-DD)", field.label()))
        }
        FieldKind::Dropdown(options) if !options.iter().any(|o| o == value.trim()) => {
            Some(format!("{} must be one of the listed options", field.label()))
        }
        _ => None,
    }
}

/// Validate a single education entry
#[must_use]
pub fn entry(spec: &SubfieldSpec, entry: &EducationEntry, index: usize, current_year: i32) -> FieldErrors {
    let level = spec.level();
    let mut errors = FieldErrors::new();
    for subfield in spec.enabled_subfields() {
        if let Some(message) = check_subfield(subfield, level, entry.get(subfield.entry_key()), current_year) {
            errors.insert(subfield_key(subfield, level, index), message);
        }
    }
    for field in spec.custom_fields() {
        if let Some(message) = check_custom_field(field, entry.get(field.name())) {
            errors.insert(custom_field_key(field.name(), level, index), message);
        }
    }
    errors
}

/// Academic Details
#[must_use]
pub fn academic(schema: &FormStructure, education: &EducationDetails, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for spec in schema.required_specs() {
        let level = spec.level();
        let entries = education.entries(level);
        if entries.is_empty() {
            errors.insert(
                missing_level_key(level),
                format!("Please provide details for {}.", level.title()),
            );
        }
        for (index, item) in entries.iter().enumerate() {
            errors.merge(entry(spec, item, index, current_year));
        }
    }
    errors
}

/// Documents Upload
#[must_use]
pub fn documents(schema: &FormStructure, form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let required = schema.required_documents();
    let slots = form.documents();

    let mut problems: Vec<String> = required
        .iter()
        .filter(|d| !slots.iter().any(|s| s.document() == **d))
        .map(|d| format!("{d} is required"))
        .collect();
    problems.extend(
        slots
            .iter()
            .filter(|s| !schema.requires_document(s.document()))
            .map(|s| format!("{} is not required for this course", s.document())),
    );
    if slots.len() != required.len() {
        problems.push(format!(
            "Exactly {} documents must be uploaded",
            required.len()
        ));
    }
    if !problems.is_empty() {
        errors.insert("documents", problems.join(", "));
    }

    for (index, slot) in slots.iter().enumerate() {
        if !slot.is_valid() {
            errors.insert(
                crate::documents::slot_key(index),
                format!("File for {} is required", slot.document()),
            );
        }
    }
    errors
}

/// Declaration
#[must_use]
pub fn declaration(form: &FormData) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !form.agreement() {
        errors.insert("agreement", AGREEMENT_MESSAGE);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{add_slot, attach_to_slot, FileUpload};
    use ecampus_schema::{DocumentType, ProgramType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn filled_personal() -> FormData {
        FormData::new()
            .with(FormField::FullName, "Asha Rao")
            .with(FormField::Dob, "2004-05-01")
            .with(FormField::Gender, "Female")
            .with(FormField::Nationality, "Indian")
            .with(FormField::AadhaarNumber, "123456789012")
    }

    fn pg_schema() -> FormStructure {
        let tenth = SubfieldSpec::new(AcademicLevel::Tenth)
            .with(Subfield::Percentage)
            .unwrap()
            .with(Subfield::YearOfPassing)
            .unwrap()
            .with(Subfield::SchoolName)
            .unwrap();
        let graduation = SubfieldSpec::new(AcademicLevel::Graduation)
            .with(Subfield::Percentage)
            .unwrap()
            .with_custom_field(
                CustomFieldSpec::new(
                    "medium",
                    "Medium",
                    FieldKind::Dropdown(vec!["English".into(), "Hindi".into()]),
                )
                .unwrap()
                .with_required(true),
            )
            .unwrap();
        FormStructure::new(
            ProgramType::Postgraduate,
            vec![AcademicLevel::Tenth, AcademicLevel::Graduation],
            [tenth, graduation],
            vec![DocumentType::TenthMarksheet, DocumentType::Aadhaar],
        )
        .unwrap()
    }

    #[test]
    fn identity_number_must_be_twelve_digits() {
        let short = filled_personal().with(FormField::AadhaarNumber, "12345678901");
        let errors = personal(&short);
        assert_eq!(errors.get("aadhaarNumber"), Some(IDENTITY_NUMBER_MESSAGE));
        assert_eq!(errors.len(), 1);

        assert!(personal(&filled_personal()).is_empty());
    }

    #[test]
    fn contact_rules() {
        let form = FormData::new()
            .with(FormField::PhoneNumber, "+91 98765 43210")
            .with(FormField::Email, "asha@uni.edu")
            .with(FormField::AlternateEmail, "bad-address")
            .with(FormField::CurrentAddress, "Pune")
            .with(FormField::PermanentAddress, " ")
            .with(FormField::EmergencyContact, "12345");
        let errors = contact(&form);
        assert!(!errors.contains("phoneNumber"));
        assert!(errors.contains("alternateEmail"));
        assert!(errors.contains("permanentAddress"));
        assert!(errors.contains("emergencyContact"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn parents_rules() {
        let errors = parents(&FormData::new());
        assert_eq!(errors.len(), 6);
        assert_eq!(
            errors.get("fathersContact"),
            Some("Valid 10-digit father's contact is required")
        );
    }

    #[test]
    fn missing_levels_are_keyed_by_suffix() {
        let errors = academic(&pg_schema(), &EducationDetails::new(), 2026);
        assert_eq!(
            errors.get("academicDetails_10"),
            Some("Please provide details for 10th.")
        );
        assert!(errors.contains("academicDetails_Grad"));
    }

    #[test]
    fn entry_fields_are_checked() {
        let schema = pg_schema();
        let mut education = EducationDetails::new();
        for spec in schema.required_specs() {
            education.add_entry(spec);
        }
        education.set_value(AcademicLevel::Tenth, 0, "percentage", "104").unwrap();
        education.set_value(AcademicLevel::Tenth, 0, "year", "2031").unwrap();
        education.set_value(AcademicLevel::Graduation, 0, "percentage", "8.2").unwrap();
        education.set_value(AcademicLevel::Graduation, 0, "medium", "Tamil").unwrap();

        let errors = academic(&schema, &education, 2026);
        assert_eq!(errors.get("percentage10_0"), Some("Valid percentage is required"));
        assert_eq!(
            errors.get("year10_0"),
            Some("Year of passing must be between 1900 and 2026")
        );
        assert_eq!(errors.get("school10_0"), Some("School name is required"));
        assert!(!errors.contains("percentageGrad_0"));
        assert_eq!(
            errors.get("medium_graduation_0"),
            Some("Medium must be one of the listed options")
        );
        // board is not enabled for the 10th in this schema
        assert!(!errors.contains("board10_0"));
    }

    #[test]
    fn cgpa_ceiling_for_college_levels() {
        let schema = pg_schema();
        let mut education = EducationDetails::new();
        education.add_entry(schema.level_spec(AcademicLevel::Graduation).unwrap());
        education.set_value(AcademicLevel::Graduation, 0, "percentage", "11").unwrap();
        let errors = academic(&schema, &education, 2026);
        assert_eq!(errors.get("percentageGrad_0"), Some("Valid CGPA is required"));
        assert_eq!(errors.get("medium_graduation_0"), Some("Medium is required"));
    }

    #[test]
    fn entry_error_key_maps_entry_keys() {
        assert_eq!(entry_error_key(AcademicLevel::Tenth, 0, "schoolName"), "school10_0");
        assert_eq!(entry_error_key(AcademicLevel::Twelth, 1, "year"), "year12_1");
        assert_eq!(entry_error_key(AcademicLevel::Postgraduate, 0, "rollNo"), "rollNo_postgraduate_0");
    }

    #[test]
    fn documents_subset_reports_missing_and_count() {
        let schema = pg_schema();
        let mut form = FormData::new();
        add_slot(&schema, &mut form, DocumentType::Aadhaar).unwrap();
        let errors = documents(&schema, &form);
        assert_eq!(
            errors.get("documents"),
            Some("10th Marksheet is required, Exactly 2 documents must be uploaded")
        );
        assert_eq!(errors.get("document_0"), Some("File for Aadhaar is required"));
    }

    #[test]
    fn documents_exact_set_passes() {
        let schema = pg_schema();
        let mut form = FormData::new();
        let mut errors = FieldErrors::new();
        for (i, doc) in [DocumentType::TenthMarksheet, DocumentType::Aadhaar].into_iter().enumerate() {
            add_slot(&schema, &mut form, doc).unwrap();
            attach_to_slot(
                &mut form,
                &mut errors,
                i,
                FileUpload::new(format!("{i}.pdf"), "application/pdf", vec![1]),
            )
            .unwrap();
        }
        assert!(documents(&schema, &form).is_empty());
    }

    #[test]
    fn declaration_requires_agreement() {
        let mut form = FormData::new();
        assert_eq!(declaration(&form).get("agreement"), Some(AGREEMENT_MESSAGE));
        form.set_agreement(true);
        assert!(declaration(&form).is_empty());
    }

    proptest! {
        #[test]
        fn prop_custom_required_flag_controls_blank(required in any::<bool>()) {
            let field = CustomFieldSpec::new("rollNo", "Roll Number", FieldKind::Text)
                .unwrap()
                .with_required(required);
            let spec = SubfieldSpec::new(AcademicLevel::Tenth).with_custom_field(field).unwrap();
            let errors = entry(&spec, &EducationEntry::template(&spec), 0, 2026);
            prop_assert_eq!(errors.contains("rollNo_tenth_0"), required);
        }

        #[test]
        fn prop_school_percentage_bounds(score in 0u32..=200) {
            let spec = SubfieldSpec::new(AcademicLevel::Tenth).with(Subfield::Percentage).unwrap();
            let mut item = EducationEntry::template(&spec);
            item.set("percentage", score.to_string());
            let errors = entry(&spec, &item, 0, 2026);
            prop_assert_eq!(errors.contains("percentage10_0"), score > 100);
        }
    }
}
