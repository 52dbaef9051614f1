//! Validate config command implementation
//!
//! Implements the `validate-config` command for checking the ehrbridge
//! configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct CheckConfigArgs {}

impl CheckConfigArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded configuration is a valid one.
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source System: {}", config.source.system);
        println!("  Legacy Input: {}", config.source.input_dir);
        println!("  FHIR Output: {}", config.output.fhir_dir);
        println!("  Reports: {}", config.output.report_dir);
        println!(
            "  Strict Source IDs: {}",
            config.mapping.require_source_ids
        );

        let overrides = config.mapping.gender.len()
            + config.mapping.encounter_status.len()
            + config.mapping.medication_status.len()
            + config.mapping.language.len();
        println!("  Mapping Overrides: {overrides}");
        println!("  Fail Fast: {}", config.validation.fail_fast);
        println!("  Cross-Validate: {}", config.validation.cross_validate);
        println!(
            "  Definitions: {}",
            config
                .validation
                .definitions_file
                .as_deref()
                .unwrap_or("built-in")
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[validation]\ncross_validate = true\n").unwrap();
        file.flush().unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert_eq!(CheckConfigArgs {}.execute(&path).unwrap(), 0);
    }

    #[test]
    fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[application]\nlog_level = \"loud\"\n").unwrap();
        file.flush().unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert_eq!(CheckConfigArgs {}.execute(&path).unwrap(), 2);
    }
}
