//! Form structure editor
//!
//! Mirrors a [`FormStructure`] for all four academic levels so toggling
//! a level off and on again keeps its subfield choices. Opening the
//! editor requires a complete [`CourseDescription`].

use crate::description::CourseDescription;
use crate::error::{EditorError, EditorResult};
use ecampus_schema::{
    AcademicLevel, CustomFieldSpec, DocumentType, FieldKind, FieldType, FormStructure,
    ProgramType, SchemaError, Subfield, SubfieldSpec,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Custom field as typed into the add-field form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomField {
    /// Entry key the value is stored under
    pub name: String,
    /// Label shown to applicants
    pub label: String,
    /// Input type
    pub field_type: FieldType,
    /// Raw dropdown options textarea
    pub options_input: String,
}

impl NewCustomField {
    /// Field with no dropdown options
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            options_input: String::new(),
        }
    }

    /// Set the raw dropdown options text
    #[must_use]
    pub fn with_options(mut self, input: impl Into<String>) -> Self {
        self.options_input = input.into();
        self
    }

    fn into_spec(self) -> EditorResult<CustomFieldSpec> {
        let kind = match self.field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Date => FieldKind::Date,
            FieldType::Dropdown => FieldKind::Dropdown(parse_options(&self.options_input)),
        };
        Ok(CustomFieldSpec::new(self.name, self.label, kind)?)
    }
}

/// Split a dropdown options textarea into options
///
/// Newlines and commas separate options; a literal `/n` counts as a newline.
#[must_use]
pub fn parse_options(input: &str) -> Vec<String> {
    input
        .replace("/n", "\n")
        .split(['\n', ','])
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

/// JSON body of the save-form-structure endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRequest {
    /// Course the structure belongs to
    pub course_id: String,
    /// Structure to store
    #[serde(flatten)]
    pub structure: FormStructure,
}

/// Editable form structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureEditor {
    program_type: Option<ProgramType>,
    required_levels: Vec<AcademicLevel>,
    subfields: BTreeMap<AcademicLevel, SubfieldSpec>,
    required_documents: Vec<DocumentType>,
}

impl StructureEditor {
    /// Open a blank editor, seeded with the description's program type
    ///
    /// # Errors
    /// `EditorError::Locked` while the description is incomplete.
    pub fn open(description: &CourseDescription) -> EditorResult<Self> {
        if !description.is_complete() {
            tracing::debug!(missing = ?description.missing_fields(), "structure editor locked");
            return Err(EditorError::Locked);
        }
        Ok(Self {
            program_type: description.program_type(),
            required_levels: Vec::new(),
            subfields: AcademicLevel::ALL
                .into_iter()
                .map(|l| (l, SubfieldSpec::new(l)))
                .collect(),
            required_documents: Vec::new(),
        })
    }

    /// Open an editor on a previously saved structure
    ///
    /// # Errors
    /// `EditorError::Locked` while the description is incomplete.
    pub fn from_structure(
        description: &CourseDescription,
        structure: &FormStructure,
    ) -> EditorResult<Self> {
        let mut editor = Self::open(description)?;
        editor.program_type = Some(structure.program_type());
        editor.required_levels = structure.required_levels().to_vec();
        editor.required_documents = structure.required_documents().to_vec();
        for level in AcademicLevel::ALL {
            if let Some(spec) = structure.level_spec(level) {
                editor.subfields.insert(level, spec.clone());
            }
        }
        Ok(editor)
    }

    /// Selected program type
    #[inline]
    #[must_use]
    pub fn program_type(&self) -> Option<ProgramType> {
        self.program_type
    }

    /// Required levels in ascending order
    #[inline]
    #[must_use]
    pub fn required_levels(&self) -> &[AcademicLevel] {
        &self.required_levels
    }

    /// Subfield specification of a level, required or not
    #[must_use]
    pub fn level_spec(&self, level: AcademicLevel) -> Option<&SubfieldSpec> {
        self.subfields.get(&level)
    }

    /// Documents applicants must upload
    #[inline]
    #[must_use]
    pub fn required_documents(&self) -> &[DocumentType] {
        &self.required_documents
    }

    /// Switch program type, dropping levels and documents it does not offer
    pub fn set_program_type(&mut self, program_type: ProgramType) {
        let before = (self.required_levels.len(), self.required_documents.len());
        self.required_levels.retain(|l| program_type.offers(*l));
        let catalog = program_type.document_catalog();
        self.required_documents.retain(|d| catalog.contains(d));
        if before != (self.required_levels.len(), self.required_documents.len()) {
            tracing::debug!(%program_type, "pruned selections not offered by program type");
        }
        self.program_type = Some(program_type);
    }

    fn selected_program(&self) -> EditorResult<ProgramType> {
        self.program_type.ok_or(EditorError::ProgramTypeRequired)
    }

    fn spec_mut(&mut self, level: AcademicLevel) -> &mut SubfieldSpec {
        self.subfields
            .entry(level)
            .or_insert_with(|| SubfieldSpec::new(level))
    }

    /// Require or release a level, returning whether it is now required
    ///
    /// # Errors
    /// - `EditorError::ProgramTypeRequired` before a program type is chosen
    /// - `SchemaError::LevelNotOffered` for levels outside the program
    pub fn toggle_level(&mut self, level: AcademicLevel) -> EditorResult<bool> {
        let program = self.selected_program()?;
        if let Some(pos) = self.required_levels.iter().position(|l| *l == level) {
            self.required_levels.remove(pos);
            return Ok(false);
        }
        if !program.offers(level) {
            return Err(SchemaError::LevelNotOffered { level, program }.into());
        }
        self.required_levels.push(level);
        self.required_levels.sort_unstable();
        Ok(true)
    }

    /// Flip a fixed subfield of a level
    ///
    /// # Errors
    /// `SchemaError::SubfieldNotApplicable` if the subfield belongs to another phase.
    pub fn toggle_subfield(&mut self, level: AcademicLevel, subfield: Subfield) -> EditorResult<bool> {
        Ok(self.spec_mut(level).toggle(subfield)?)
    }

    /// Add a custom field to a level; new fields are optional
    ///
    /// # Errors
    /// - `SchemaError::IncompleteCustomField` for a blank name or label
    /// - `SchemaError::DropdownWithoutOptions` for a dropdown with no options
    /// - `SchemaError::ReservedCustomFieldName` if the name is a fixed entry key
    /// - `SchemaError::DuplicateCustomField` if the name is taken in the level
    pub fn add_custom_field(&mut self, level: AcademicLevel, field: NewCustomField) -> EditorResult<()> {
        let spec = field.into_spec()?;
        self.spec_mut(level).add_custom_field(spec)?;
        Ok(())
    }

    /// Remove a custom field from a level
    ///
    /// # Errors
    /// `SchemaError::UnknownCustomField` if no field has that name.
    pub fn remove_custom_field(
        &mut self,
        level: AcademicLevel,
        name: &str,
    ) -> EditorResult<CustomFieldSpec> {
        self.spec_mut(level)
            .remove_custom_field(name)
            .ok_or_else(|| {
                SchemaError::UnknownCustomField {
                    level,
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Flip a custom field's required flag
    ///
    /// # Errors
    /// `SchemaError::UnknownCustomField` if no field has that name.
    pub fn toggle_custom_required(&mut self, level: AcademicLevel, name: &str) -> EditorResult<bool> {
        Ok(self.spec_mut(level).toggle_custom_required(name)?)
    }

    /// Require or release a document, returning whether it is now required
    ///
    /// # Errors
    /// - `EditorError::ProgramTypeRequired` before a program type is chosen
    /// - `SchemaError::DocumentNotInCatalog` for documents outside the catalog
    pub fn toggle_document(&mut self, document: DocumentType) -> EditorResult<bool> {
        let program = self.selected_program()?;
        if let Some(pos) = self.required_documents.iter().position(|d| *d == document) {
            self.required_documents.remove(pos);
            return Ok(false);
        }
        if !program.document_catalog().contains(&document) {
            return Err(SchemaError::DocumentNotInCatalog { document, program }.into());
        }
        self.required_documents.push(document);
        Ok(true)
    }

    /// Validated structure
    ///
    /// # Errors
    /// `EditorError::ProgramTypeRequired`, or the first violated schema invariant.
    pub fn build(&self) -> EditorResult<FormStructure> {
        let program = self.selected_program()?;
        Ok(FormStructure::new(
            program,
            self.required_levels.clone(),
            self.subfields.values().cloned(),
            self.required_documents.clone(),
        )?)
    }

    /// Body for the save-form-structure endpoint
    ///
    /// # Errors
    /// Same as [`StructureEditor::build`].
    pub fn save_request(&self, course_id: impl Into<String>) -> EditorResult<StructureRequest> {
        Ok(StructureRequest {
            course_id: course_id.into(),
            structure: self.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::ImageSlot;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn description(program: ProgramType) -> CourseDescription {
        let mut d = CourseDescription::new("B.Tech");
        d.set_program_description("About");
        d.set_image(ImageSlot::First, "image/png", &[1]).unwrap();
        d.set_image(ImageSlot::Second, "image/png", &[2]).unwrap();
        d.set_vision("V");
        d.set_mission("M");
        d.set_years_of_department("3");
        d.rename_semester(0, "Sem 1").unwrap();
        d.add_subject(0).unwrap();
        d.set_subject(0, 0, "Maths").unwrap();
        d.set_program_educational_objectives("PEO");
        d.set_program_outcomes("PO");
        d.set_program_type(program);
        d
    }

    fn editor(program: ProgramType) -> StructureEditor {
        StructureEditor::open(&description(program)).unwrap()
    }

    #[test]
    fn locked_until_description_complete() {
        let err = StructureEditor::open(&CourseDescription::new("x")).unwrap_err();
        assert_eq!(err, EditorError::Locked);
    }

    #[test]
    fn options_split_on_newlines_commas_and_literal_slash_n() {
        assert_eq!(
            parse_options("English, Hindi/nTamil\n\n , Urdu"),
            vec!["English", "Hindi", "Tamil", "Urdu"]
        );
        assert!(parse_options(" ,\n").is_empty());
    }

    #[test]
    fn dropdown_needs_options() {
        let mut e = editor(ProgramType::Undergraduate);
        let err = e
            .add_custom_field(
                AcademicLevel::Tenth,
                NewCustomField::new("medium", "Medium", FieldType::Dropdown).with_options(" , "),
            )
            .unwrap_err();
        assert_eq!(err, EditorError::Schema(SchemaError::DropdownWithoutOptions("medium".into())));
    }

    #[test]
    fn custom_field_names_unique_per_level() {
        let mut e = editor(ProgramType::Postgraduate);
        let field = NewCustomField::new("rollNo", "Roll Number", FieldType::Number);
        e.add_custom_field(AcademicLevel::Tenth, field.clone()).unwrap();
        assert!(matches!(
            e.add_custom_field(AcademicLevel::Tenth, field.clone()),
            Err(EditorError::Schema(SchemaError::DuplicateCustomField { .. }))
        ));
        e.add_custom_field(AcademicLevel::Twelth, field).unwrap();
        let spec = e.level_spec(AcademicLevel::Tenth).unwrap();
        assert!(!spec.custom_fields()[0].is_required());
        assert!(e.toggle_custom_required(AcademicLevel::Tenth, "rollNo").unwrap());
        e.remove_custom_field(AcademicLevel::Tenth, "rollNo").unwrap();
        assert!(e.remove_custom_field(AcademicLevel::Tenth, "rollNo").is_err());
    }

    #[test]
    fn custom_field_cannot_reuse_fixed_entry_key() {
        let mut e = editor(ProgramType::Postgraduate);
        let year = NewCustomField::new("year", "Academic Year", FieldType::Text);
        assert!(matches!(
            e.add_custom_field(AcademicLevel::Tenth, year),
            Err(EditorError::Schema(SchemaError::ReservedCustomFieldName { .. }))
        ));
        let university = NewCustomField::new("university", "University", FieldType::Text);
        assert!(e.add_custom_field(AcademicLevel::Graduation, university.clone()).is_err());
        // Only college levels have a fixed university field.
        e.add_custom_field(AcademicLevel::Tenth, university).unwrap();
    }

    #[test]
    fn switching_to_ug_prunes_college_levels_and_documents() {
        let mut e = editor(ProgramType::Postgraduate);
        e.toggle_level(AcademicLevel::Graduation).unwrap();
        e.toggle_level(AcademicLevel::Tenth).unwrap();
        e.toggle_document(DocumentType::GraduationMarksheet).unwrap();
        e.toggle_document(DocumentType::Aadhaar).unwrap();
        e.set_program_type(ProgramType::Undergraduate);
        assert_eq!(e.required_levels(), &[AcademicLevel::Tenth]);
        assert_eq!(e.required_documents(), &[DocumentType::Aadhaar]);
        assert!(e.toggle_level(AcademicLevel::Postgraduate).is_err());
    }

    #[test]
    fn toggling_level_keeps_subfield_choices() {
        let mut e = editor(ProgramType::Undergraduate);
        e.toggle_level(AcademicLevel::Twelth).unwrap();
        e.toggle_subfield(AcademicLevel::Twelth, Subfield::Stream).unwrap();
        assert!(!e.toggle_level(AcademicLevel::Twelth).unwrap());
        assert!(e.toggle_level(AcademicLevel::Twelth).unwrap());
        let structure = e.build().unwrap();
        let spec = structure.level_spec(AcademicLevel::Twelth).unwrap();
        assert!(spec.is_enabled(Subfield::Stream));
    }

    #[test]
    fn save_request_is_flat() {
        let mut e = editor(ProgramType::Undergraduate);
        e.toggle_level(AcademicLevel::Tenth).unwrap();
        e.toggle_subfield(AcademicLevel::Tenth, Subfield::Percentage).unwrap();
        e.toggle_document(DocumentType::TenthMarksheet).unwrap();
        let json = serde_json::to_value(e.save_request("course-1").unwrap()).unwrap();
        assert_eq!(json["courseId"], "course-1");
        assert_eq!(json["programType"], "UG");
        assert_eq!(json["requiredAcademicFields"], serde_json::json!(["tenth"]));
        assert_eq!(json["requiredAcademicSubfields"]["tenth"]["percentage"], true);
        assert_eq!(json["requiredDocuments"], serde_json::json!(["10th Marksheet"]));
    }

    #[test]
    fn reopens_saved_structure() {
        let mut e = editor(ProgramType::Postgraduate);
        e.toggle_level(AcademicLevel::Graduation).unwrap();
        e.add_custom_field(
            AcademicLevel::Graduation,
            NewCustomField::new("thesis", "Thesis", FieldType::Text),
        )
        .unwrap();
        let built = e.build().unwrap();
        let reopened =
            StructureEditor::from_structure(&description(ProgramType::Postgraduate), &built).unwrap();
        assert_eq!(reopened.build().unwrap(), built);
    }

    proptest! {
        #[test]
        fn built_levels_always_offered(
            ops in proptest::collection::vec((0usize..4, any::<bool>()), 0..20)
        ) {
            let mut e = editor(ProgramType::Postgraduate);
            for (i, switch) in ops {
                if switch {
                    let next = if e.program_type() == Some(ProgramType::Undergraduate) {
                        ProgramType::Postgraduate
                    } else {
                        ProgramType::Undergraduate
                    };
                    e.set_program_type(next);
                } else {
                    let _ = e.toggle_level(AcademicLevel::ALL[i]);
                }
            }
            let structure = e.build().unwrap();
            for level in structure.required_levels() {
                prop_assert!(structure.program_type().offers(*level));
            }
        }
    }
}
