//! E-Campus command-line checks
//!
//! Offline validation of form structures and stored applications, and a
//! fetch of a course's structure from the backend.

#![warn(unreachable_pub)]

use anyhow::{Context, Result};
use ecampus_client::{AdmissionApi, ClientConfig, EnvOverrides, HttpBackend, SessionContext};
use ecampus_schema::FormStructure;
use ecampus_wizard::{ApplicationDraft, FieldErrors, Section, Wizard};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber; `RUST_LOG` overrides the default `info`
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // A subscriber may already be installed by an embedding test harness.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Read a UTF-8 input file
///
/// # Errors
/// Fails if the file cannot be read.
pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// One required level of a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    /// Level title, e.g. `10th`
    pub level: String,
    /// Enabled fixed subfields
    pub subfields: Vec<String>,
    /// Custom field labels; required ones carry a `*`
    pub custom_fields: Vec<String>,
}

/// Summary of a valid form structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    /// `UG` or `PG`
    pub program_type: String,
    /// Required levels in form order
    pub levels: Vec<LevelSummary>,
    /// Required document labels
    pub documents: Vec<String>,
}

impl SchemaReport {
    /// Summarize a structure
    #[must_use]
    pub fn new(structure: &FormStructure) -> Self {
        let levels = structure
            .required_specs()
            .map(|spec| LevelSummary {
                level: spec.level().title().to_string(),
                subfields: spec.enabled_subfields().map(|sf| sf.label().to_string()).collect(),
                custom_fields: spec
                    .custom_fields()
                    .iter()
                    .map(|f| {
                        let marker = if f.is_required() { "*" } else { "" };
                        format!("{}{marker}", f.label())
                    })
                    .collect(),
            })
            .collect();
        Self {
            program_type: structure.program_type().code().to_string(),
            levels,
            documents: structure
                .required_documents()
                .iter()
                .map(|d| d.label().to_string())
                .collect(),
        }
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program type: {}", self.program_type)?;
        if self.levels.is_empty() {
            writeln!(f, "Academic levels: none")?;
        }
        for level in &self.levels {
            writeln!(f, "Level {}", level.level)?;
            writeln!(f, "  subfields: {}", level.subfields.join(", "))?;
            if !level.custom_fields.is_empty() {
                writeln!(f, "  custom fields: {}", level.custom_fields.join(", "))?;
            }
        }
        write!(f, "Documents: {}", self.documents.join(", "))
    }
}

/// Parse and validate a form structure document
///
/// # Errors
/// Fails if the JSON is malformed or violates a schema invariant.
pub fn check_schema(text: &str) -> Result<SchemaReport> {
    let structure: FormStructure =
        serde_json::from_str(text).context("form structure is invalid")?;
    Ok(SchemaReport::new(&structure))
}

/// Validation result of one section
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    /// Validated section
    pub section: Section,
    /// Section title
    pub title: &'static str,
    /// Field errors, empty when the section passes
    pub errors: FieldErrors,
}

/// Validation result of a stored application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReport {
    /// Section the applicant last worked on
    pub active_section: Section,
    /// Application was already submitted
    pub submitted: bool,
    /// One report per section in form order
    pub sections: Vec<SectionReport>,
}

impl ApplicationReport {
    /// No section has errors
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.sections.iter().all(|s| s.errors.is_empty())
    }
}

impl fmt::Display for ApplicationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Active section: {} ({})",
            self.active_section.title(),
            if self.submitted { "submitted" } else { "draft" }
        )?;
        for report in &self.sections {
            if report.errors.is_empty() {
                writeln!(f, "[ok]   {}", report.title)?;
                continue;
            }
            writeln!(f, "[fail] {}", report.title)?;
            for (key, message) in report.errors.iter() {
                writeln!(f, "         {key}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Validate every section of a stored application against a structure
///
/// # Errors
/// Fails if the draft JSON is malformed.
pub fn check_application(
    structure: FormStructure,
    draft_text: &str,
    current_year: Option<i32>,
) -> Result<ApplicationReport> {
    let draft: ApplicationDraft =
        serde_json::from_str(draft_text).context("application draft is invalid")?;
    let mut wizard = Wizard::restore(structure, draft);
    if let Some(year) = current_year {
        wizard = wizard.with_current_year(year);
    }
    let ctx = wizard.context();
    let sections = Section::ALL
        .into_iter()
        .map(|section| SectionReport {
            section,
            title: section.title(),
            errors: section.contract().validate(&ctx),
        })
        .collect();
    Ok(ApplicationReport {
        active_section: wizard.active(),
        submitted: wizard.is_submitted(),
        sections,
    })
}

/// Fetch a course's structure using the config file and environment
///
/// # Errors
/// Config, credential or backend failures.
pub async fn fetch_schema(
    config: ClientConfig,
    env: &EnvOverrides,
    course_id: &str,
) -> Result<FormStructure> {
    let config = env.apply(config)?;
    let token = env.token.clone().context("ECAMPUS_TOKEN is not set")?;
    let session = Arc::new(SessionContext::new().with_credential(token));
    let backend = HttpBackend::new(config, session)?;
    tracing::info!(
        course_id,
        base_url = backend.config().base_url(),
        "fetching form structure"
    );
    Ok(backend.fetch_form_structure(course_id).await?)
}
