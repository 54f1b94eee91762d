//! Education details
//!
//! One list of entries per academic level, at most one entry each. An
//! entry is a string map whose keys come from the level's subfield
//! specification: every fixed entry key plus every custom field name.

use crate::error::WizardError;
use crate::validation::is_year_input;
use ecampus_schema::{AcademicLevel, SubfieldSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Values of one qualification, keyed by entry key or custom field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, serde_json::Value>")]
pub struct EducationEntry(IndexMap<String, String>);

impl EducationEntry {
    /// Blank entry with every key the level's specification defines
    #[must_use]
    pub fn template(spec: &SubfieldSpec) -> Self {
        let fixed = spec.level().subfields().iter().map(|sf| sf.entry_key());
        let custom = spec.custom_fields().iter().map(|f| f.name());
        Self(
            fixed
                .chain(custom)
                .map(|k| (k.to_string(), String::new()))
                .collect(),
        )
    }

    /// Value for a key, empty when absent
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }

    /// Set the value for a key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Iterate `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Stored drafts may carry numbers for percentage and year.
impl From<IndexMap<String, serde_json::Value>> for EducationEntry {
    fn from(raw: IndexMap<String, serde_json::Value>) -> Self {
        Self(
            raw.into_iter()
                .map(|(k, v)| {
                    let value = match v {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, value)
                })
                .collect(),
        )
    }
}

/// Entries for every academic level
///
/// Serializes all four level keys, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationDetails {
    tenth: Vec<EducationEntry>,
    twelth: Vec<EducationEntry>,
    graduation: Vec<EducationEntry>,
    postgraduate: Vec<EducationEntry>,
}

impl EducationDetails {
    /// No entries
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded for a level
    #[must_use]
    pub fn entries(&self, level: AcademicLevel) -> &[EducationEntry] {
        match level {
            AcademicLevel::Tenth => &self.tenth,
            AcademicLevel::Twelth => &self.twelth,
            AcademicLevel::Graduation => &self.graduation,
            AcademicLevel::Postgraduate => &self.postgraduate,
        }
    }

    fn entries_mut(&mut self, level: AcademicLevel) -> &mut Vec<EducationEntry> {
        match level {
            AcademicLevel::Tenth => &mut self.tenth,
            AcademicLevel::Twelth => &mut self.twelth,
            AcademicLevel::Graduation => &mut self.graduation,
            AcademicLevel::Postgraduate => &mut self.postgraduate,
        }
    }

    /// Add a blank entry unless the level already has one
    ///
    /// Returns whether an entry was added.
    pub fn add_entry(&mut self, spec: &SubfieldSpec) -> bool {
        let entries = self.entries_mut(spec.level());
        if !entries.is_empty() {
            return false;
        }
        entries.push(EducationEntry::template(spec));
        true
    }

    /// Remove an entry
    ///
    /// # Errors
    /// `WizardError::NoSuchEntry` if the index is out of range.
    pub fn remove_entry(
        &mut self,
        level: AcademicLevel,
        index: usize,
    ) -> Result<EducationEntry, WizardError> {
        let entries = self.entries_mut(level);
        if index >= entries.len() {
            return Err(WizardError::NoSuchEntry { level, index });
        }
        Ok(entries.remove(index))
    }

    /// Set one value of an entry
    ///
    /// The `year` key is trimmed and ignored unless it is at most four
    /// digits. Returns whether the value was stored.
    ///
    /// # Errors
    /// `WizardError::NoSuchEntry` if the index is out of range.
    pub fn set_value(
        &mut self,
        level: AcademicLevel,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<bool, WizardError> {
        let entry = self
            .entries_mut(level)
            .get_mut(index)
            .ok_or(WizardError::NoSuchEntry { level, index })?;

        let value = if key == "year" {
            let trimmed = value.trim();
            if !is_year_input(trimmed) {
                return Ok(false);
            }
            trimmed
        } else {
            value
        };
        entry.set(key, value);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecampus_schema::{CustomFieldSpec, FieldKind, Subfield};
    use pretty_assertions::assert_eq;

    fn twelth_spec() -> SubfieldSpec {
        SubfieldSpec::new(AcademicLevel::Twelth)
            .with(Subfield::Stream)
            .unwrap()
            .with_custom_field(CustomFieldSpec::new("rollNo", "Roll Number", FieldKind::Number).unwrap())
            .unwrap()
    }

    #[test]
    fn template_has_all_fixed_and_custom_keys() {
        let entry = EducationEntry::template(&twelth_spec());
        let keys: Vec<&str> = entry.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["schoolName", "board", "stream", "year", "percentage", "subjects", "rollNo"]
        );
        assert!(entry.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn one_entry_per_level() {
        let spec = twelth_spec();
        let mut details = EducationDetails::new();
        assert!(details.add_entry(&spec));
        assert!(!details.add_entry(&spec));
        assert_eq!(details.entries(AcademicLevel::Twelth).len(), 1);
    }

    #[test]
    fn year_input_is_sanitized() {
        let mut details = EducationDetails::new();
        details.add_entry(&twelth_spec());
        assert!(details.set_value(AcademicLevel::Twelth, 0, "year", " 2019 ").unwrap());
        assert_eq!(details.entries(AcademicLevel::Twelth)[0].get("year"), "2019");
        assert!(!details.set_value(AcademicLevel::Twelth, 0, "year", "20190").unwrap());
        assert!(!details.set_value(AcademicLevel::Twelth, 0, "year", "abcd").unwrap());
        assert_eq!(details.entries(AcademicLevel::Twelth)[0].get("year"), "2019");
        assert!(details.set_value(AcademicLevel::Twelth, 0, "board", " CBSE ").unwrap());
        assert_eq!(details.entries(AcademicLevel::Twelth)[0].get("board"), " CBSE ");
    }

    #[test]
    fn out_of_range_entry() {
        let mut details = EducationDetails::new();
        assert!(matches!(
            details.set_value(AcademicLevel::Tenth, 0, "board", "CBSE"),
            Err(WizardError::NoSuchEntry { index: 0, .. })
        ));
        assert!(details.remove_entry(AcademicLevel::Tenth, 0).is_err());
    }

    #[test]
    fn wire_carries_all_levels() {
        let json = serde_json::to_value(EducationDetails::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tenth": [], "twelth": [], "graduation": [], "postgraduate": []})
        );
    }

    #[test]
    fn numeric_values_from_storage_become_strings() {
        let json = r#"{"tenth":[{"percentage":91.5,"year":2018,"board":"ICSE","note":null}]}"#;
        let details: EducationDetails = serde_json::from_str(json).unwrap();
        let entry = &details.entries(AcademicLevel::Tenth)[0];
        assert_eq!(entry.get("percentage"), "91.5");
        assert_eq!(entry.get("year"), "2018");
        assert_eq!(entry.get("board"), "ICSE");
        assert_eq!(entry.get("note"), "");
        assert!(details.entries(AcademicLevel::Graduation).is_empty());
    }
}
