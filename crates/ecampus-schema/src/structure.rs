//! Form structure: the per-course application schema
//!
//! Authored by a content administrator, read by the application wizard.
//! All invariants are checked when a [`FormStructure`] is built, whether
//! by the editor or by deserializing a backend payload, so consumers never
//! need to guard against a required level without a subfield entry.

use crate::custom_field::CustomFieldSpec;
use crate::error::{SchemaError, SchemaResult};
use crate::level::{AcademicLevel, Subfield};
use crate::program::{DocumentType, ProgramType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which subfields one academic level collects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfieldSpec {
    level: AcademicLevel,
    enabled: BTreeSet<Subfield>,
    custom_fields: Vec<CustomFieldSpec>,
}

impl SubfieldSpec {
    /// Empty specification for a level
    #[inline]
    #[must_use]
    pub fn new(level: AcademicLevel) -> Self {
        Self {
            level,
            enabled: BTreeSet::new(),
            custom_fields: Vec::new(),
        }
    }

    /// Builder form of [`SubfieldSpec::set`]
    ///
    /// # Errors
    /// `SchemaError::SubfieldNotApplicable` if the subfield belongs to another phase
    pub fn with(mut self, subfield: Subfield) -> SchemaResult<Self> {
        self.set(subfield, true)?;
        Ok(self)
    }

    /// Builder form of [`SubfieldSpec::add_custom_field`]
    ///
    /// # Errors
    /// `SchemaError::DuplicateCustomField` if the name is taken
    pub fn with_custom_field(mut self, field: CustomFieldSpec) -> SchemaResult<Self> {
        self.add_custom_field(field)?;
        Ok(self)
    }

    /// Level this specification describes
    #[inline]
    #[must_use]
    pub fn level(&self) -> AcademicLevel {
        self.level
    }

    /// Enable or disable a fixed subfield
    ///
    /// # Errors
    /// `SchemaError::SubfieldNotApplicable` when enabling a subfield of another phase
    pub fn set(&mut self, subfield: Subfield, enabled: bool) -> SchemaResult<()> {
        if !subfield.applies_to(self.level) {
            if !enabled {
                return Ok(());
            }
            return Err(SchemaError::SubfieldNotApplicable {
                level: self.level,
                subfield,
            });
        }
        if enabled {
            self.enabled.insert(subfield);
        } else {
            self.enabled.remove(&subfield);
        }
        Ok(())
    }

    /// Flip a fixed subfield, returning the new state
    ///
    /// # Errors
    /// `SchemaError::SubfieldNotApplicable` if the subfield belongs to another phase
    pub fn toggle(&mut self, subfield: Subfield) -> SchemaResult<bool> {
        let next = !self.is_enabled(subfield);
        self.set(subfield, next)?;
        Ok(next)
    }

    /// Whether a fixed subfield is collected
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, subfield: Subfield) -> bool {
        self.enabled.contains(&subfield)
    }

    /// Enabled fixed subfields in the level's display order
    pub fn enabled_subfields(&self) -> impl Iterator<Item = Subfield> + '_ {
        self.level
            .subfields()
            .iter()
            .copied()
            .filter(|sf| self.enabled.contains(sf))
    }

    /// Custom fields in definition order
    #[inline]
    #[must_use]
    pub fn custom_fields(&self) -> &[CustomFieldSpec] {
        &self.custom_fields
    }

    /// Look up a custom field by name
    #[must_use]
    pub fn custom_field(&self, name: &str) -> Option<&CustomFieldSpec> {
        self.custom_fields.iter().find(|f| f.name() == name)
    }

    /// Append a custom field
    ///
    /// Education entries store fixed values and custom values in one map,
    /// so a custom name may not equal any fixed entry key of the level.
    ///
    /// # Errors
    /// - `SchemaError::ReservedCustomFieldName` if the name is a fixed entry key
    /// - `SchemaError::DuplicateCustomField` if the name is already used in this level
    pub fn add_custom_field(&mut self, field: CustomFieldSpec) -> SchemaResult<()> {
        if self
            .level
            .subfields()
            .iter()
            .any(|sf| sf.entry_key() == field.name())
        {
            return Err(SchemaError::ReservedCustomFieldName {
                level: self.level,
                name: field.name().to_string(),
            });
        }
        if self.custom_field(field.name()).is_some() {
            return Err(SchemaError::DuplicateCustomField {
                level: self.level,
                name: field.name().to_string(),
            });
        }
        self.custom_fields.push(field);
        Ok(())
    }

    /// Remove a custom field by name
    pub fn remove_custom_field(&mut self, name: &str) -> Option<CustomFieldSpec> {
        let idx = self.custom_fields.iter().position(|f| f.name() == name)?;
        Some(self.custom_fields.remove(idx))
    }

    /// Flip a custom field's required flag, returning the new value
    ///
    /// # Errors
    /// `SchemaError::UnknownCustomField` if no field has that name
    pub fn toggle_custom_required(&mut self, name: &str) -> SchemaResult<bool> {
        let level = self.level;
        self.custom_fields
            .iter_mut()
            .find(|f| f.name() == name)
            .map(CustomFieldSpec::toggle_required)
            .ok_or_else(|| SchemaError::UnknownCustomField {
                level,
                name: name.to_string(),
            })
    }
}

/// Application schema for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireFormStructure", into = "WireFormStructure")]
pub struct FormStructure {
    program_type: ProgramType,
    required_levels: Vec<AcademicLevel>,
    subfields: BTreeMap<AcademicLevel, SubfieldSpec>,
    required_documents: Vec<DocumentType>,
}

impl FormStructure {
    /// Build a validated structure
    ///
    /// `subfields` may describe levels that are not required; those are
    /// kept so the editor can round-trip them.
    ///
    /// # Errors
    /// Any [`SchemaError`] naming the first violated invariant.
    pub fn new(
        program_type: ProgramType,
        required_levels: Vec<AcademicLevel>,
        subfields: impl IntoIterator<Item = SubfieldSpec>,
        required_documents: Vec<DocumentType>,
    ) -> SchemaResult<Self> {
        let subfields: BTreeMap<AcademicLevel, SubfieldSpec> =
            subfields.into_iter().map(|s| (s.level(), s)).collect();

        let mut seen = BTreeSet::new();
        for &level in &required_levels {
            if !seen.insert(level) {
                return Err(SchemaError::DuplicateLevel(level));
            }
            if !program_type.offers(level) {
                return Err(SchemaError::LevelNotOffered {
                    level,
                    program: program_type,
                });
            }
            if !subfields.contains_key(&level) {
                return Err(SchemaError::MissingSubfieldSpec(level));
            }
        }

        let catalog = program_type.document_catalog();
        let mut seen_docs = BTreeSet::new();
        for &document in &required_documents {
            if !seen_docs.insert(document) {
                return Err(SchemaError::DuplicateDocument(document));
            }
            if !catalog.contains(&document) {
                return Err(SchemaError::DocumentNotInCatalog {
                    document,
                    program: program_type,
                });
            }
        }

        Ok(Self {
            program_type,
            required_levels,
            subfields,
            required_documents,
        })
    }

    /// Default schema used when the course schema cannot be fetched
    ///
    /// Postgraduate, no required levels, no required documents, an empty
    /// subfield specification for every level.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            program_type: ProgramType::Postgraduate,
            required_levels: Vec::new(),
            subfields: AcademicLevel::ALL
                .into_iter()
                .map(|l| (l, SubfieldSpec::new(l)))
                .collect(),
            required_documents: Vec::new(),
        }
    }

    /// Program type
    #[inline]
    #[must_use]
    pub fn program_type(&self) -> ProgramType {
        self.program_type
    }

    /// Required academic levels in schema order
    #[inline]
    #[must_use]
    pub fn required_levels(&self) -> &[AcademicLevel] {
        &self.required_levels
    }

    /// Whether a level must be filled in
    #[inline]
    #[must_use]
    pub fn requires_level(&self, level: AcademicLevel) -> bool {
        self.required_levels.contains(&level)
    }

    /// Subfield specification of any described level
    #[inline]
    #[must_use]
    pub fn level_spec(&self, level: AcademicLevel) -> Option<&SubfieldSpec> {
        self.subfields.get(&level)
    }

    /// Required levels paired with their specification
    pub fn required_specs(&self) -> impl Iterator<Item = &SubfieldSpec> + '_ {
        // Construction guarantees every required level is described.
        self.required_levels
            .iter()
            .filter_map(|level| self.subfields.get(level))
    }

    /// Required documents in schema order
    #[inline]
    #[must_use]
    pub fn required_documents(&self) -> &[DocumentType] {
        &self.required_documents
    }

    /// Whether a document type is required
    #[inline]
    #[must_use]
    pub fn requires_document(&self, document: DocumentType) -> bool {
        self.required_documents.contains(&document)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFormStructure {
    #[serde(default)]
    program_type: Option<ProgramType>,
    #[serde(default)]
    required_academic_fields: Vec<AcademicLevel>,
    #[serde(default)]
    required_academic_subfields: BTreeMap<AcademicLevel, WireSubfieldSpec>,
    #[serde(default)]
    required_documents: Vec<DocumentType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSubfieldSpec {
    #[serde(default)]
    custom_fields: Vec<CustomFieldSpec>,
    #[serde(flatten)]
    flags: BTreeMap<String, serde_json::Value>,
}

impl WireSubfieldSpec {
    fn into_spec(self, level: AcademicLevel) -> SchemaResult<SubfieldSpec> {
        let mut spec = SubfieldSpec::new(level);
        for (key, value) in self.flags {
            // Storage metadata such as `_id` rides along with the flags.
            let Ok(subfield) = key.parse::<Subfield>() else {
                continue;
            };
            if value.as_bool().unwrap_or(false) {
                spec.set(subfield, true)?;
            }
        }
        for field in self.custom_fields {
            spec.add_custom_field(field)?;
        }
        Ok(spec)
    }

    fn from_spec(spec: SubfieldSpec) -> Self {
        let flags = spec
            .level
            .subfields()
            .iter()
            .map(|sf| {
                (
                    sf.flag_key().to_string(),
                    serde_json::Value::Bool(spec.enabled.contains(sf)),
                )
            })
            .collect();
        Self {
            custom_fields: spec.custom_fields,
            flags,
        }
    }
}

impl TryFrom<WireFormStructure> for FormStructure {
    type Error = SchemaError;

    fn try_from(wire: WireFormStructure) -> Result<Self, Self::Error> {
        let subfields = wire
            .required_academic_subfields
            .into_iter()
            .map(|(level, spec)| spec.into_spec(level))
            .collect::<SchemaResult<Vec<_>>>()?;

        FormStructure::new(
            wire.program_type.unwrap_or_default(),
            wire.required_academic_fields,
            subfields,
            wire.required_documents,
        )
    }
}

impl From<FormStructure> for WireFormStructure {
    fn from(structure: FormStructure) -> Self {
        Self {
            program_type: Some(structure.program_type),
            required_academic_fields: structure.required_levels,
            required_academic_subfields: structure
                .subfields
                .into_iter()
                .map(|(level, spec)| (level, WireSubfieldSpec::from_spec(spec)))
                .collect(),
            required_documents: structure.required_documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_field::FieldKind;
    use pretty_assertions::assert_eq;

    fn tenth_spec() -> SubfieldSpec {
        SubfieldSpec::new(AcademicLevel::Tenth)
            .with(Subfield::Percentage)
            .unwrap()
            .with(Subfield::Board)
            .unwrap()
    }

    #[test]
    fn required_level_needs_a_spec() {
        let err = FormStructure::new(
            ProgramType::Postgraduate,
            vec![AcademicLevel::Tenth, AcademicLevel::Graduation],
            [tenth_spec()],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::MissingSubfieldSpec(AcademicLevel::Graduation));
    }

    #[test]
    fn ug_rejects_college_levels() {
        let err = FormStructure::new(
            ProgramType::Undergraduate,
            vec![AcademicLevel::Graduation],
            [SubfieldSpec::new(AcademicLevel::Graduation)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::LevelNotOffered { .. }));
    }

    #[test]
    fn duplicate_levels_and_documents_rejected() {
        let err = FormStructure::new(
            ProgramType::Postgraduate,
            vec![AcademicLevel::Tenth, AcademicLevel::Tenth],
            [tenth_spec()],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateLevel(AcademicLevel::Tenth));

        let err = FormStructure::new(
            ProgramType::Postgraduate,
            vec![],
            Vec::<SubfieldSpec>::new(),
            vec![DocumentType::Pan, DocumentType::Pan],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateDocument(DocumentType::Pan));
    }

    #[test]
    fn documents_must_come_from_catalog() {
        let err = FormStructure::new(
            ProgramType::Undergraduate,
            vec![],
            Vec::<SubfieldSpec>::new(),
            vec![DocumentType::PostgraduateMarksheet],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DocumentNotInCatalog { .. }));
    }

    #[test]
    fn subfield_of_other_phase_rejected() {
        let err = SubfieldSpec::new(AcademicLevel::Graduation)
            .with(Subfield::Board)
            .unwrap_err();
        assert!(matches!(err, SchemaError::SubfieldNotApplicable { .. }));
        // Disabling an inapplicable subfield is a no-op.
        let mut spec = SubfieldSpec::new(AcademicLevel::Graduation);
        assert!(spec.set(Subfield::Board, false).is_ok());
    }

    #[test]
    fn custom_field_names_unique_per_level() {
        let field = CustomFieldSpec::new("rollNo", "Roll Number", FieldKind::Text).unwrap();
        let mut spec = SubfieldSpec::new(AcademicLevel::Tenth);
        spec.add_custom_field(field.clone()).unwrap();
        let err = spec.add_custom_field(field.clone()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateCustomField { .. }));

        // Same name in another level is fine.
        let mut other = SubfieldSpec::new(AcademicLevel::Twelth);
        assert!(other.add_custom_field(field).is_ok());
    }

    #[test]
    fn toggles() {
        let mut spec = tenth_spec();
        assert!(!spec.toggle(Subfield::Percentage).unwrap());
        assert!(spec.toggle(Subfield::SchoolName).unwrap());
        let enabled: Vec<_> = spec.enabled_subfields().collect();
        assert_eq!(enabled, vec![Subfield::SchoolName, Subfield::Board]);

        assert!(spec.toggle_custom_required("missing").is_err());
    }

    #[test]
    fn fallback_is_empty_pg() {
        let fallback = FormStructure::fallback();
        assert_eq!(fallback.program_type(), ProgramType::Postgraduate);
        assert!(fallback.required_levels().is_empty());
        assert!(fallback.required_documents().is_empty());
        for level in AcademicLevel::ALL {
            assert!(fallback.level_spec(level).is_some());
        }
    }

    #[test]
    fn parses_backend_payload() {
        let json = serde_json::json!({
            "_id": "665f",
            "programType": "UG",
            "requiredAcademicFields": ["tenth", "twelth"],
            "requiredAcademicSubfields": {
                "tenth": {"percentage": true, "yearOfPassing": false, "board": true, "schoolName": true, "customFields": []},
                "twelth": {
                    "_id": "abc",
                    "percentage": true, "yearOfPassing": true, "board": false, "schoolName": false, "stream": true,
                    "customFields": [{"name": "rollNo", "label": "Roll Number", "type": "text", "required": true}]
                },
                "graduation": {"percentage": false, "university": false, "collegeName": false, "customFields": []}
            },
            "requiredDocuments": ["10th Marksheet", "Signature"]
        });

        let structure: FormStructure = serde_json::from_value(json).unwrap();
        assert_eq!(structure.program_type(), ProgramType::Undergraduate);
        assert_eq!(
            structure.required_levels(),
            &[AcademicLevel::Tenth, AcademicLevel::Twelth]
        );
        let twelth = structure.level_spec(AcademicLevel::Twelth).unwrap();
        assert!(twelth.is_enabled(Subfield::Stream));
        assert!(!twelth.is_enabled(Subfield::Board));
        assert_eq!(twelth.custom_fields().len(), 1);
        assert!(structure.requires_document(DocumentType::Signature));
        assert_eq!(structure.required_specs().count(), 2);
    }

    #[test]
    fn payload_missing_required_spec_fails() {
        let json = serde_json::json!({
            "programType": "PG",
            "requiredAcademicFields": ["graduation"],
            "requiredAcademicSubfields": {},
        });
        let err = serde_json::from_value::<FormStructure>(json).unwrap_err();
        assert!(err.to_string().contains("missing subfield specification"));
    }

    #[test]
    fn custom_field_cannot_shadow_fixed_entry_key() {
        let mut spec = SubfieldSpec::new(AcademicLevel::Tenth);
        let year = CustomFieldSpec::new("year", "Academic Year", FieldKind::Text).unwrap();
        let err = spec.add_custom_field(year).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ReservedCustomFieldName {
                level: AcademicLevel::Tenth,
                name: "year".into(),
            }
        );
        assert!(spec.custom_fields().is_empty());

        // `stream` is only a fixed key at the 12th level.
        let stream = CustomFieldSpec::new("stream", "Stream", FieldKind::Text).unwrap();
        assert!(spec.add_custom_field(stream.clone()).is_ok());
        let mut twelth = SubfieldSpec::new(AcademicLevel::Twelth);
        assert!(twelth.add_custom_field(stream).is_err());
    }

    #[test]
    fn wire_custom_field_cannot_shadow_fixed_entry_key() {
        let json = serde_json::json!({
            "programType": "UG",
            "requiredAcademicFields": ["tenth"],
            "requiredAcademicSubfields": {
                "tenth": {
                    "board": true,
                    "customFields": [
                        {"name": "board", "label": "Board Name", "type": "text", "required": true}
                    ]
                }
            },
            "requiredDocuments": []
        });
        let err = serde_json::from_value::<FormStructure>(json).unwrap_err();
        assert!(err.to_string().contains("'board' is reserved"));
    }

    #[test]
    fn missing_program_type_defaults_to_pg() {
        let structure: FormStructure = serde_json::from_str("{}").unwrap();
        assert_eq!(structure.program_type(), ProgramType::Postgraduate);
    }

    #[test]
    fn serialized_shape_carries_all_flags() {
        let structure = FormStructure::new(
            ProgramType::Postgraduate,
            vec![AcademicLevel::Tenth],
            [tenth_spec()],
            vec![DocumentType::Aadhaar],
        )
        .unwrap();
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["programType"], "PG");
        assert_eq!(json["requiredAcademicFields"], serde_json::json!(["tenth"]));
        assert_eq!(json["requiredAcademicSubfields"]["tenth"]["board"], true);
        assert_eq!(json["requiredAcademicSubfields"]["tenth"]["schoolName"], false);
        assert_eq!(
            json["requiredAcademicSubfields"]["tenth"]["customFields"],
            serde_json::json!([])
        );

        let back: FormStructure = serde_json::from_value(json).unwrap();
        assert_eq!(back, structure);
    }

    proptest::proptest! {
        #[test]
        fn levels_accepted_iff_offered(
            pg in proptest::bool::ANY,
            picks in proptest::collection::btree_set(0usize..4, 0..=4),
        ) {
            let program = if pg { ProgramType::Postgraduate } else { ProgramType::Undergraduate };
            let levels: Vec<AcademicLevel> = picks.iter().map(|&i| AcademicLevel::ALL[i]).collect();
            let specs = levels.iter().map(|&l| SubfieldSpec::new(l));
            let result = FormStructure::new(program, levels.clone(), specs, vec![]);
            let all_offered = levels.iter().all(|&l| program.offers(l));
            proptest::prop_assert_eq!(result.is_ok(), all_offered);
            if let Err(err) = result {
                proptest::prop_assert!(
                    matches!(err, SchemaError::LevelNotOffered { .. }),
                    "unexpected error: {}",
                    err
                );
            }
        }
    }
}
