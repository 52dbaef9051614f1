//! Cross-resource reference validation
//!
//! Needs the whole batch: every reference is resolved against a lookup of all
//! `(type, id)` pairs present. Findings are appended to the referring
//! resource's existing result and never remove earlier errors.

use super::resource_set::ResourceSet;
use super::result::ValidationRun;
use crate::domain::ids::{ReferenceTarget, ResourceKey, ResourceType};
use serde_json::Value;
use std::collections::HashSet;

/// Reference fields resolved for each referring type
fn checked_references(resource_type: &str) -> &'static [(&'static str, ResourceType)] {
    const SUBJECT: (&str, ResourceType) = ("subject", ResourceType::Patient);
    const ENCOUNTER: (&str, ResourceType) = ("encounter", ResourceType::Encounter);

    match resource_type {
        "Encounter" => &[SUBJECT],
        "Observation" | "MedicationRequest" => &[SUBJECT, ENCOUNTER],
        _ => &[],
    }
}

/// Resolves references across the batch, appending a
/// `Referenced <Type> not found: <id>` error for every dangling target
///
/// Resources without a string `id` are skipped. A resource with no prior
/// result gets a fresh one appended to the run when it needs an error.
pub fn cross_validate(resources: &ResourceSet, mut run: ValidationRun) -> ValidationRun {
    tracing::info!("Starting cross-validation between resources");

    let known: HashSet<ResourceKey> = resources
        .groups()
        .iter()
        .flat_map(|group| {
            group.resources.iter().filter_map(move |resource| {
                resource
                    .get("id")
                    .and_then(Value::as_str)
                    .map(|id| ResourceKey::new(&group.resource_type, id))
            })
        })
        .collect();

    for group in resources.groups() {
        let fields = checked_references(&group.resource_type);
        if fields.is_empty() {
            continue;
        }

        tracing::info!(
            resource_type = %group.resource_type,
            count = group.resources.len(),
            "Cross-validating references"
        );

        for resource in &group.resources {
            let Some(id) = resource.get("id").and_then(Value::as_str) else {
                continue;
            };

            let dangling: Vec<String> = fields
                .iter()
                .filter_map(|(field, target_type)| {
                    let literal = resource
                        .get(*field)
                        .and_then(|r| r.get("reference"))
                        .and_then(Value::as_str)?;
                    let target = ReferenceTarget::parse(literal)
                        .filter(|t| t.resource_type == target_type.as_str())?;

                    (!known.contains(&target.to_key()))
                        .then(|| format!("Referenced {target_type} not found: {}", target.id))
                })
                .collect();

            if dangling.is_empty() {
                continue;
            }

            let result = run.entry(&ResourceKey::new(&group.resource_type, id));
            for error in dangling {
                tracing::debug!(resource = %result.key(), error = %error, "Dangling reference");
                result.add_error(error);
            }
        }
    }

    tracing::info!("Cross-validation completed");
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::result::ValidationResult;
    use serde_json::json;

    fn batch(with_patient: bool) -> ResourceSet {
        let mut set = ResourceSet::new();
        if with_patient {
            set.push("Patient", json!({"resourceType": "Patient", "id": "ABC123"}));
        }
        set.push(
            "Observation",
            json!({
                "resourceType": "Observation",
                "id": "O1",
                "subject": {"reference": "Patient/ABC123"},
                "encounter": {"reference": "Encounter/E404"}
            }),
        );
        set.push(
            "MedicationRequest",
            json!({
                "resourceType": "MedicationRequest",
                "id": "M1",
                "subject": {"display": "no literal reference"},
                "encounter": {"reference": "Patient/ABC123"}
            }),
        );
        set
    }

    #[test]
    fn test_dangling_references_reported() {
        let run = ValidationRun::from_results(vec![ValidationResult::new("Observation", "O1")]);
        let run = cross_validate(&batch(true), run);

        assert_eq!(run.len(), 1);
        assert_eq!(
            run.results()[0].errors,
            vec!["Referenced Encounter not found: E404"]
        );
    }

    #[test]
    fn test_missing_patient_downgrades_result() {
        let mut prior = ValidationResult::new("Observation", "O1");
        prior.add_warning("kept");
        let run = cross_validate(&batch(false), ValidationRun::from_results(vec![prior]));

        let result = &run.results()[0];
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "Referenced Patient not found: ABC123",
                "Referenced Encounter not found: E404"
            ]
        );
        assert_eq!(result.warnings, vec!["kept"]);
    }

    #[test]
    fn test_fresh_result_created_when_missing() {
        let run = cross_validate(&batch(true), ValidationRun::new());
        assert_eq!(run.len(), 1);
        assert_eq!(run.results()[0].resource_type, "Observation");
        assert_eq!(run.results()[0].resource_id, "O1");
    }

    #[test]
    fn test_resources_without_id_skipped() {
        let mut set = ResourceSet::new();
        set.push(
            "Encounter",
            json!({"resourceType": "Encounter", "subject": {"reference": "Patient/X"}}),
        );
        assert!(cross_validate(&set, ValidationRun::new()).is_empty());
    }
}
