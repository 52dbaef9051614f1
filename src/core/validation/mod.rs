//! Two-pass resource validation
//!
//! - **Pass 1** ([`Validator::validate`]): structural checks on one resource at
//!   a time (required fields, id syntax, value sets, date syntax and
//!   resource-specific rules).
//! - **Pass 2** ([`cross_validate`]): referential checks across the whole
//!   batch.
//!
//! Bad resource content never produces an `Err`; it becomes errors and
//! warnings on a [`ValidationResult`]. Only unusable definition tables fail,
//! and they fail at construction.
//!
//! # Example
//!
//! ```
//! use ehrbridge::core::validation::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::with_defaults().unwrap();
//! let result = validator.validate(&json!({
//!     "resourceType": "Patient",
//!     "id": "Patient-PT1",
//!     "gender": "female"
//! }));
//!
//! assert!(result.is_valid);
//! ```

pub mod cross;
pub mod definitions;
pub mod report;
pub mod resource_set;
pub mod result;
mod rules;

pub use cross::cross_validate;
pub use definitions::ResourceDefinitions;
pub use report::{ValidationReport, ValidationStatistics};
pub use resource_set::{ResourceGroup, ResourceSet};
pub use result::{ValidationResult, ValidationRun, ValidationStatus};

use crate::domain::ids::ResourceType;
use crate::domain::Result;
use definitions::CompiledPatterns;
use result::UNKNOWN;
use rules::display_value;
use serde_json::Value;
use std::str::FromStr;

/// Structural rule engine over raw resource documents
#[derive(Debug, Clone)]
pub struct Validator {
    definitions: ResourceDefinitions,
    patterns: CompiledPatterns,
    fail_fast: bool,
}

impl Validator {
    /// Creates a validator from definition tables
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Definitions`](crate::domain::BridgeError::Definitions)
    /// when a supported resource type has no definitions or a syntax pattern
    /// does not compile.
    pub fn new(definitions: ResourceDefinitions) -> Result<Self> {
        definitions.check_complete()?;
        let patterns = CompiledPatterns::compile(&definitions.patterns)?;

        Ok(Self {
            definitions,
            patterns,
            fail_fast: false,
        })
    }

    /// Creates a validator from the built-in tables
    pub fn with_defaults() -> Result<Self> {
        Self::new(ResourceDefinitions::default())
    }

    /// Stops Pass 1 at the first invalid resource
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Pass 1 for a single resource
    pub fn validate(&self, resource: &Value) -> ValidationResult {
        let Some(type_value) = resource.get("resourceType") else {
            let mut result = ValidationResult::new(UNKNOWN, UNKNOWN);
            result.add_error("Missing resourceType");
            return result;
        };

        let resource_type = display_value(type_value);
        let resource_id = resource
            .get("id")
            .map(display_value)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let mut result = ValidationResult::new(&resource_type, resource_id);

        // Anything with a resourceType key is an object
        let Some(object) = resource.as_object() else {
            return result;
        };

        if !self.definitions.supports(&resource_type) {
            result.add_warning(format!("Unsupported resource type: {resource_type}"));
            return result;
        }

        for field in self.definitions.required_for(&resource_type) {
            if !object.contains_key(field) {
                result.add_error(format!("Missing required field: {field}"));
            }
        }

        if let Some(id) = object.get("id") {
            if !id.as_str().is_some_and(|id| self.patterns.id.is_match(id)) {
                result.add_error(format!("Invalid id format: {}", display_value(id)));
            }
        }

        for rule in self.definitions.value_sets_for(&resource_type) {
            if let Some(value) = object.get(&rule.field) {
                let allowed = value
                    .as_str()
                    .is_some_and(|v| rule.allowed.iter().any(|a| a == v));
                if !allowed {
                    result.add_error(format!(
                        "Invalid {}: {}. Must be one of: {}",
                        rule.field,
                        display_value(value),
                        rule.allowed.join(", ")
                    ));
                }
            }
        }

        for path in self.definitions.date_fields_for(&resource_type) {
            rules::check_date_field(object, path, &self.patterns, &mut result);
        }

        match ResourceType::from_str(&resource_type) {
            Ok(ResourceType::Patient) => rules::validate_patient(object, &self.patterns, &mut result),
            Ok(ResourceType::Encounter) => {
                rules::validate_encounter(object, &self.patterns, &mut result)
            }
            Ok(ResourceType::Observation) => {
                rules::validate_observation(object, &self.patterns, &mut result)
            }
            Ok(ResourceType::MedicationRequest) => {
                rules::validate_medication_request(object, &self.patterns, &mut result)
            }
            Err(_) => {}
        }

        result
    }

    /// Pass 1 over a whole batch, group by group
    ///
    /// With fail-fast enabled the run stops after the first invalid resource,
    /// skipping the rest of its group and every later group.
    pub fn validate_all(&self, resources: &ResourceSet) -> ValidationRun {
        tracing::info!(total = resources.len(), "Starting validation of all resources");

        let mut run = ValidationRun::new();

        'groups: for group in resources.groups() {
            tracing::info!(
                resource_type = %group.resource_type,
                count = group.resources.len(),
                "Validating resources"
            );

            for resource in &group.resources {
                let result = self.validate(resource);

                match result.status() {
                    ValidationStatus::Invalid => tracing::warn!("{result}"),
                    ValidationStatus::ValidWithWarnings => tracing::info!("{result}"),
                    ValidationStatus::Valid => tracing::debug!("{result}"),
                }

                let invalid = !result.is_valid;
                run.push(result);

                if invalid && self.fail_fast {
                    tracing::info!("Stopping validation due to fail-fast setting");
                    run.mark_stopped_early();
                    break 'groups;
                }
            }
        }

        crate::log_validation_complete!(run.len(), run.error_count(), run.warning_count());

        run
    }
}
