//! Validate command implementation
//!
//! Loads FHIR resources from disk, runs structural validation and optionally
//! the cross-reference pass, then writes the report.

use super::{build_validator, load_or_report, report_failure};
use crate::adapters::filesystem;
use crate::config::EhrBridgeConfig;
use crate::core::validation::{cross_validate, ResourceSet, ValidationReport};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory holding the resources to validate (defaults to output.fhir_dir)
    #[arg(long)]
    pub input_dir: Option<String>,

    /// Override the report directory
    #[arg(long)]
    pub report_dir: Option<String>,

    /// Check references between resources after structural validation
    #[arg(long)]
    pub cross_validate: bool,

    /// Stop at the first invalid resource
    #[arg(long)]
    pub fail_fast: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting validate command");

        let mut config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        if let Some(dir) = &self.report_dir {
            config.output.report_dir = dir.clone();
        }
        config.validation.cross_validate |= self.cross_validate;
        config.validation.fail_fast |= self.fail_fast;

        let input_dir = self
            .input_dir
            .clone()
            .unwrap_or_else(|| config.output.fhir_dir.clone());
        println!("🔍 Validating FHIR resources in {input_dir}");

        let resources = match filesystem::load_resource_set(&input_dir) {
            Ok(resources) => resources,
            Err(e) => return Ok(report_failure(&e, "Failed to load FHIR resources")),
        };

        let report = match validate_resources(&config, &resources) {
            Ok(report) => report,
            Err(e) => return Ok(report_failure(&e, "Validation failed")),
        };

        Ok(finish_report(&config, &report))
    }
}

/// Runs the configured validation passes over a resource set
pub(crate) fn validate_resources(
    config: &EhrBridgeConfig,
    resources: &ResourceSet,
) -> Result<ValidationReport> {
    let validator = build_validator(config, config.validation.fail_fast)?;
    let mut run = validator.validate_all(resources);

    if config.validation.cross_validate {
        if run.stopped_early() {
            tracing::info!("Skipping cross-validation after fail-fast stop");
        } else {
            run = cross_validate(resources, run);
        }
    }

    Ok(ValidationReport::new(run.into_results()))
}

/// Writes the report, prints the summary and returns the exit code
pub(crate) fn finish_report(config: &EhrBridgeConfig, report: &ValidationReport) -> i32 {
    if let Err(e) = filesystem::write_report(&config.output.report_dir, report) {
        return report_failure(&e, "Failed to write validation report");
    }

    println!();
    print!("{}", report.format_summary());
    println!();
    println!("📄 Report written to {}", config.output.report_dir);

    if report.is_success() {
        println!("✅ All resources are valid");
        0
    } else {
        println!(
            "⚠️  {} of {} resources are invalid",
            report.statistics.invalid, report.statistics.total
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dangling_set() -> ResourceSet {
        let mut set = ResourceSet::new();
        set.push(
            "Encounter",
            json!({
                "resourceType": "Encounter",
                "id": "Encounter-E1",
                "status": "finished",
                "class": {"code": "AMB"},
                "subject": {"reference": "Patient/Patient-P404"}
            }),
        );
        set
    }

    #[test]
    fn test_cross_validation_is_opt_in() {
        let mut config = EhrBridgeConfig::default();
        let report = validate_resources(&config, &dangling_set()).unwrap();
        assert!(report.is_success());

        config.validation.cross_validate = true;
        let report = validate_resources(&config, &dangling_set()).unwrap();
        assert!(!report.is_success());
        assert_eq!(
            report.results[0].errors,
            vec!["Referenced Patient not found: Patient-P404"]
        );
    }

    #[test]
    fn test_validate_args_flags() {
        let args = ValidateArgs {
            input_dir: None,
            report_dir: Some("out".to_string()),
            cross_validate: true,
            fail_fast: false,
        };
        assert!(args.cross_validate);
        assert_eq!(args.report_dir.as_deref(), Some("out"));
    }
}
