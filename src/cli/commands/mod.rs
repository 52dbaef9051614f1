//! CLI command implementations
//!
//! Every command returns the process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success, every validated resource valid |
//! | 1 | Some resources invalid |
//! | 2 | Configuration error |
//! | 3 | Missing input |
//! | 5 | Fatal error |

pub mod check_config;
pub mod init;
pub mod run;
pub mod transform;
pub mod validate;

use crate::adapters::filesystem;
use crate::config::{load_config, EhrBridgeConfig};
use crate::core::validation::{ResourceDefinitions, Validator};
use crate::domain::{BridgeError, Result};

/// Loads the configuration, reporting a failure as exit code 2
pub(crate) fn load_or_report(config_path: &str) -> std::result::Result<EhrBridgeConfig, i32> {
    load_config(config_path).map_err(|e| report_failure(&e, "Failed to load configuration"))
}

/// Prints and logs a domain error, returning its exit code
pub(crate) fn report_failure(error: &BridgeError, context: &str) -> i32 {
    crate::log_error_with_context!(error, context);
    println!("❌ {context}");
    println!("   Error: {error}");
    error.exit_code()
}

/// Builds the validator, reading the definitions file when one is configured
pub(crate) fn build_validator(config: &EhrBridgeConfig, fail_fast: bool) -> Result<Validator> {
    let definitions = match &config.validation.definitions_file {
        Some(path) => {
            tracing::info!(path = %path, "Loading resource definitions");
            filesystem::load_definitions(path)?
        }
        None => ResourceDefinitions::default(),
    };

    Ok(Validator::new(definitions)?.with_fail_fast(fail_fast))
}
