//! Error types for the form schema
//!
//! Every variant names one invariant of [`FormStructure`](crate::FormStructure)
//! or one of its parts, so callers can tell a malformed backend payload
//! apart from a rejected editor action.

use crate::level::{AcademicLevel, Subfield};
use crate::program::{DocumentType, ProgramType};

/// Schema construction and parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A required level has no subfield specification
    #[error("missing subfield specification for required level '{0}'")]
    MissingSubfieldSpec(AcademicLevel),

    /// Level is not part of the program's academic ladder
    #[error("academic level '{level}' is not offered for {program} programs")]
    LevelNotOffered {
        /// Offending level
        level: AcademicLevel,
        /// Program of the structure
        program: ProgramType,
    },

    /// Level listed twice in the required levels
    #[error("academic level '{0}' is listed more than once")]
    DuplicateLevel(AcademicLevel),

    /// Fixed subfield does not belong to the level
    #[error("subfield '{subfield}' does not apply to level '{level}'")]
    SubfieldNotApplicable {
        /// Level being configured
        level: AcademicLevel,
        /// Subfield outside the level
        subfield: Subfield,
    },

    /// Custom field without a name or a label
    #[error("custom field needs both a name and a label")]
    IncompleteCustomField,

    /// Custom field name already used in the level
    #[error("a field named '{name}' already exists for level '{level}'")]
    DuplicateCustomField {
        /// Level holding the field
        level: AcademicLevel,
        /// Duplicated field name
        name: String,
    },

    /// Custom field name shadows a fixed entry key of the level
    #[error("'{name}' is reserved for a fixed field of level '{level}'")]
    ReservedCustomFieldName {
        /// Level holding the field
        level: AcademicLevel,
        /// Fixed entry key used as a name
        name: String,
    },

    /// Custom field not found in the level
    #[error("no custom field named '{name}' for level '{level}'")]
    UnknownCustomField {
        /// Level searched
        level: AcademicLevel,
        /// Requested field name
        name: String,
    },

    /// Dropdown custom field with no options
    #[error("dropdown field '{0}' needs at least one option")]
    DropdownWithoutOptions(String),

    /// Document outside the program's catalog
    #[error("document '{document}' is not in the {program} catalog")]
    DocumentNotInCatalog {
        /// Offending document
        document: DocumentType,
        /// Program of the structure
        program: ProgramType,
    },

    /// Document listed twice
    #[error("document '{0}' is listed more than once")]
    DuplicateDocument(DocumentType),

    /// Unrecognised program type string
    #[error("unknown program type: '{0}'")]
    UnknownProgramType(String),

    /// Unrecognised academic level key
    #[error("unknown academic level: '{0}'")]
    UnknownLevel(String),

    /// Unrecognised subfield key
    #[error("unknown subfield: '{0}'")]
    UnknownSubfield(String),

    /// Unrecognised document label
    #[error("unknown document type: '{0}'")]
    UnknownDocument(String),
}

/// Result alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_spec_display() {
        let err = SchemaError::MissingSubfieldSpec(AcademicLevel::Twelth);
        assert_eq!(
            err.to_string(),
            "missing subfield specification for required level 'twelth'"
        );
    }

    #[test]
    fn level_not_offered_display() {
        let err = SchemaError::LevelNotOffered {
            level: AcademicLevel::Graduation,
            program: ProgramType::Undergraduate,
        };
        assert!(err.to_string().contains("not offered for UG"));
    }

    #[test]
    fn reserved_name_display() {
        let err = SchemaError::ReservedCustomFieldName {
            level: AcademicLevel::Tenth,
            name: "year".into(),
        };
        assert_eq!(err.to_string(), "'year' is reserved for a fixed field of level 'tenth'");
    }
}
