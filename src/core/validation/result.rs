//! Per-resource validation results

use crate::domain::ids::ResourceKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder used when a resource has no type or id
pub const UNKNOWN: &str = "Unknown";

/// Outcome classification of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Valid,
    ValidWithWarnings,
    Invalid,
}

/// Findings for one resource
///
/// Any error makes the result invalid. Warnings never change validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub resource_type: String,
    pub resource_id: String,
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// A valid result with no findings
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records an error and marks the result invalid
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    /// Records a warning
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn status(&self) -> ValidationStatus {
        if !self.is_valid {
            ValidationStatus::Invalid
        } else if self.warnings.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::ValidWithWarnings
        }
    }

    /// Lookup key `(type, id)`
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_type, &self.resource_id)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        match self.status() {
            ValidationStatus::Valid => write!(f, "Valid {key}"),
            ValidationStatus::ValidWithWarnings => {
                write!(f, "Valid {key} with warnings: {}", self.warnings.join(", "))
            }
            ValidationStatus::Invalid => write!(f, "Invalid {key}: {}", self.errors.join(", ")),
        }
    }
}

/// Ordered results of one validation run, indexed by `(type, id)`
///
/// When several results share a key the first one owns the index entry, so
/// later lookups always append to the earliest result.
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    results: Vec<ValidationResult>,
    index: HashMap<ResourceKey, usize>,
    stopped_early: bool,
}

impl ValidationRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a run from previously collected results
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let mut run = Self::new();
        for result in results {
            run.push(result);
        }
        run
    }

    /// Appends a result
    pub fn push(&mut self, result: ValidationResult) {
        let position = self.results.len();
        self.index.entry(result.key()).or_insert(position);
        self.results.push(result);
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&ValidationResult> {
        self.index.get(key).map(|&i| &self.results[i])
    }

    /// Existing result for the key, or a fresh valid one appended to the run
    pub fn entry(&mut self, key: &ResourceKey) -> &mut ValidationResult {
        let position = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.push(ValidationResult::new(key.resource_type(), key.id()));
                self.results.len() - 1
            }
        };
        &mut self.results[position]
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when no result carries an error
    pub fn all_valid(&self) -> bool {
        self.results.iter().all(|r| r.is_valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_valid).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warnings.len()).sum()
    }

    /// Marks the run as cut short by fail-fast
    pub fn mark_stopped_early(&mut self) {
        self.stopped_early = true;
    }

    /// True when fail-fast skipped part of the batch
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let mut result = ValidationResult::new("Patient", "Patient-PT1");
        assert_eq!(result.status(), ValidationStatus::Valid);

        result.add_warning("minor");
        assert_eq!(result.status(), ValidationStatus::ValidWithWarnings);
        assert!(result.is_valid);

        result.add_error("major");
        assert_eq!(result.status(), ValidationStatus::Invalid);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_display() {
        let mut result = ValidationResult::new("Encounter", "Encounter-E1");
        assert_eq!(result.to_string(), "Valid Encounter/Encounter-E1");

        result.add_warning("w1");
        assert_eq!(
            result.to_string(),
            "Valid Encounter/Encounter-E1 with warnings: w1"
        );

        result.add_error("e1");
        result.add_error("e2");
        assert_eq!(result.to_string(), "Invalid Encounter/Encounter-E1: e1, e2");
    }

    #[test]
    fn test_serialized_field_names() {
        let result = ValidationResult::new("Patient", "Patient-PT1");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["resourceType"], "Patient");
        assert_eq!(json["resourceId"], "Patient-PT1");
        assert_eq!(json["isValid"], true);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_first_result_wins_index() {
        let mut run = ValidationRun::new();
        run.push(ValidationResult::new("Patient", "dup"));
        run.push(ValidationResult::new("Patient", "dup"));

        run.entry(&ResourceKey::new("Patient", "dup"))
            .add_error("dangling");

        assert_eq!(run.len(), 2);
        assert!(!run.results()[0].is_valid);
        assert!(run.results()[1].is_valid);
    }

    #[test]
    fn test_entry_creates_missing_result() {
        let mut run = ValidationRun::new();
        run.entry(&ResourceKey::new("Observation", "Observation-O1"))
            .add_error("Referenced Patient not found: Patient-PT9");

        assert_eq!(run.len(), 1);
        let key = ResourceKey::new("Observation", "Observation-O1");
        assert_eq!(run.get(&key).unwrap().errors.len(), 1);
        assert_eq!(run.invalid_count(), 1);
        assert!(!run.all_valid());
    }

    #[test]
    fn test_counts() {
        let mut a = ValidationResult::new("Patient", "a");
        a.add_warning("w");
        let mut b = ValidationResult::new("Patient", "b");
        b.add_error("e1");
        b.add_error("e2");

        let run = ValidationRun::from_results(vec![a, b]);
        assert_eq!(run.error_count(), 2);
        assert_eq!(run.warning_count(), 1);
        assert!(!run.stopped_early());
    }
}
