//! Field error map and value checks shared by the section rules
//!
//! The error map is keyed by field name. A validation run replaces the
//! whole map; within one run the first failing rule for a field wins.

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static IDENTITY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{12}$").expect("identity number pattern"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+91|0)?[0-9]{10}$").expect("phone pattern"));

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));

static CREDENTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("credential pattern")
});

static YEAR_INPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{0,4}$").expect("year pattern"));

/// Earliest selectable year of passing
pub const EARLIEST_YEAR: i32 = 1900;

/// Field-keyed validation messages, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    /// Empty error map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_insert_with(|| message.into());
    }

    /// Record an error, replacing any existing message for the field
    pub fn replace(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    /// Message for a field
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a field has an error
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Clear one field's error
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    /// Move a field's error to another key
    pub fn rekey(&mut self, from: &str, to: impl Into<String>) {
        if let Some(message) = self.0.shift_remove(from) {
            self.0.insert(to.into(), message);
        }
    }

    /// Keep only errors matching a predicate on the key
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|k, _| keep(k));
    }

    /// Merge another run's errors, keeping existing messages
    pub fn merge(&mut self, other: FieldErrors) {
        for (key, message) in other.0 {
            self.insert(key, message);
        }
    }

    /// No errors recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(key, message)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Value is missing or whitespace only
#[inline]
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Exactly 12 ASCII digits
#[must_use]
pub fn is_identity_number(value: &str) -> bool {
    IDENTITY_NUMBER.is_match(value)
}

/// Remove all whitespace from a phone number
#[must_use]
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Ten digits with an optional `+91` or `0` prefix, ignoring whitespace
#[must_use]
pub fn is_phone(value: &str) -> bool {
    PHONE.is_match(&normalize_phone(value))
}

/// Basic `x@y.z` shape
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Three dot-separated base64url segments
#[must_use]
pub fn is_credential(value: &str) -> bool {
    CREDENTIAL.is_match(value)
}

/// Accept a partially typed year (at most four digits)
#[must_use]
pub fn is_year_input(value: &str) -> bool {
    YEAR_INPUT.is_match(value)
}

/// Parse a percentage or CGPA bounded by `ceiling`
#[must_use]
pub fn parse_score(value: &str, ceiling: f64) -> Option<f64> {
    let score: f64 = value.trim().parse().ok()?;
    (score.is_finite() && (0.0..=ceiling).contains(&score)).then_some(score)
}

/// Four-digit year between [`EARLIEST_YEAR`] and `current_year`
#[must_use]
pub fn is_year_of_passing(value: &str, current_year: i32) -> bool {
    let value = value.trim();
    value.len() == 4
        && value
            .parse::<i32>()
            .is_ok_and(|y| (EARLIEST_YEAR..=current_year).contains(&y))
}

/// Finite number
#[must_use]
pub fn is_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// Calendar date in `YYYY-MM-DD` form
#[must_use]
pub fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok()
}
