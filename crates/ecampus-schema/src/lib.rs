//! E-Campus Form Schema
//!
//! The contract shared by the schema editor and the application wizard:
//! - Program types and their document catalogs
//! - Academic levels and the fixed subfields of each phase
//! - Custom fields with typed inputs
//! - [`FormStructure`], validated at construction and on deserialization
//!
//! # Example
//!
//! ```rust
//! use ecampus_schema::{AcademicLevel, DocumentType, FormStructure, ProgramType, Subfield, SubfieldSpec};
//!
//! # fn main() -> Result<(), ecampus_schema::SchemaError> {
//! let tenth = SubfieldSpec::new(AcademicLevel::Tenth).with(Subfield::Percentage)?;
//! let structure = FormStructure::new(
//!     ProgramType::Undergraduate,
//!     vec![AcademicLevel::Tenth],
//!     [tenth],
//!     vec![DocumentType::TenthMarksheet],
//! )?;
//! assert!(structure.requires_level(AcademicLevel::Tenth));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod custom_field;
pub mod error;
pub mod level;
pub mod program;
pub mod structure;

pub use custom_field::{CustomFieldSpec, FieldKind, FieldType};
pub use error::{SchemaError, SchemaResult};
pub use level::{AcademicLevel, Phase, Subfield};
pub use program::{DocumentType, ProgramType};
pub use structure::{FormStructure, SubfieldSpec};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with form schemas
    pub use crate::{
        AcademicLevel, CustomFieldSpec, DocumentType, FieldKind, FormStructure, ProgramType,
        SchemaError, Subfield, SubfieldSpec,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
