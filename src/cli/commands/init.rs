//! Init command implementation
//!
//! Implements the `init` command for generating a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ehrbridge.toml")]
    pub output: String,

    /// Include example mapping overrides and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing ehrbridge configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Place patients.json, encounters.json, observations.json and");
                println!("     medications.json in the [source] input_dir");
                println!("  3. Validate configuration: ehrbridge validate-config");
                println!("  4. Run the pipeline: ehrbridge run --cross-validate");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# ehrbridge configuration file
# Legacy EHR export to FHIR R4 mapper and validator

[application]
log_level = "info"

[source]
system = "legacy-ehr"
input_dir = "data/legacy"

[output]
fhir_dir = "data/fhir"
report_dir = "data/reports"

[mapping]
require_source_ids = false

[validation]
fail_fast = false
cross_validate = true

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# ehrbridge configuration file
# Legacy EHR export to FHIR R4 mapper and validator
#
# Any value may reference an environment variable, e.g.
#   input_dir = "${EHRBRIDGE_DATA_ROOT}/legacy"
# and any setting may be overridden with EHRBRIDGE_<SECTION>_<KEY>, e.g.
#   EHRBRIDGE_VALIDATION_FAIL_FAST=true

[application]
# trace | debug | info | warn | error
log_level = "info"

[source]
# Source system name; identifiers are stamped with urn:oid:<system>
system = "2.16.840.1.113883.3.9999"

# Directory with patients.json, encounters.json, observations.json, medications.json
input_dir = "data/legacy"

[output]
# Per-type resource files and bundle.json
fhir_dir = "data/fhir"

# validation_results.json and validation_summary.txt
report_dir = "data/reports"

[mapping]
# Fail instead of generating a UUID when a legacy record has no identifier
require_source_ids = false

# Overrides are merged over the built-in tables.
# Values must be codes of the target value set.
[mapping.gender]
N = "unknown"

[mapping.encounter_status]
closed = "finished"
scheduled = "planned"

[mapping.medication_status]
suspended = "on-hold"

[mapping.language]
Dutch = "nl"
Italian = "it"

[validation]
# Stop at the first invalid resource
fail_fast = false

# Check that subject and encounter references resolve within the batch
cross_validate = true

# Replace the built-in required fields, value sets and patterns
# definitions_file = "definitions.json"

[logging]
# JSON log files in addition to console output
local_enabled = true
local_path = "logs"

# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
