//! Configuration schema types
//!
//! Every section and every field has a default, so an empty file (or a file
//! carrying only the sections an operator cares about) is a valid configuration.

use crate::domain::codes::{AdministrativeGender, EncounterStatus, MedicationRequestStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Main ehrbridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EhrBridgeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Legacy source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Legacy code table overrides
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Validation behaviour
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EhrBridgeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.output.validate()?;
        self.mapping.validate()?;
        self.validation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Legacy source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source system name, stamped as `urn:oid:<system>` on mapped identifiers
    #[serde(default = "default_source_system")]
    pub system: String,

    /// Directory holding the legacy JSON collections
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            system: default_source_system(),
            input_dir: default_input_dir(),
        }
    }
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.system.trim().is_empty() {
            return Err("source.system cannot be empty".to_string());
        }
        if self.input_dir.trim().is_empty() {
            return Err("source.input_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving per-type resource files and the bundle
    #[serde(default = "default_fhir_dir")]
    pub fhir_dir: String,

    /// Directory receiving the validation report
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fhir_dir: default_fhir_dir(),
            report_dir: default_report_dir(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.fhir_dir.trim().is_empty() {
            return Err("output.fhir_dir cannot be empty".to_string());
        }
        if self.report_dir.trim().is_empty() {
            return Err("output.report_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Mapping configuration
///
/// The override tables map a legacy value to a standard code and are merged
/// over the built-in tables, so only additions and replacements need listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Fail instead of generating an identifier when a legacy id is missing
    #[serde(default)]
    pub require_source_ids: bool,

    /// Legacy gender code → administrative gender
    #[serde(default)]
    pub gender: HashMap<String, String>,

    /// Legacy encounter status → encounter status
    #[serde(default)]
    pub encounter_status: HashMap<String, String>,

    /// Legacy medication status → medication request status
    #[serde(default)]
    pub medication_status: HashMap<String, String>,

    /// Language name → BCP-47 code
    #[serde(default)]
    pub language: HashMap<String, String>,
}

impl MappingConfig {
    fn validate(&self) -> Result<(), String> {
        check_codes::<AdministrativeGender>("gender", &self.gender)?;
        check_codes::<EncounterStatus>("encounter_status", &self.encounter_status)?;
        check_codes::<MedicationRequestStatus>("medication_status", &self.medication_status)?;

        for (name, code) in &self.language {
            if code.trim().is_empty() {
                return Err(format!("mapping.language.{name} cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Every override target must be a code of the standard value set
fn check_codes<T: FromStr<Err = String>>(
    section: &str,
    overrides: &HashMap<String, String>,
) -> Result<(), String> {
    for (legacy, code) in overrides {
        T::from_str(code).map_err(|e| format!("mapping.{section}.{legacy}: {e}"))?;
    }
    Ok(())
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Stop at the first invalid resource
    #[serde(default)]
    pub fail_fast: bool,

    /// Run the cross-reference pass after structural validation
    #[serde(default)]
    pub cross_validate: bool,

    /// JSON document replacing the built-in resource definitions
    #[serde(default)]
    pub definitions_file: Option<String>,
}

impl ValidationConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.definitions_file {
            if path.trim().is_empty() {
                return Err("validation.definitions_file cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_system() -> String {
    "unknown".to_string()
}

fn default_input_dir() -> String {
    "data/legacy".to_string()
}

fn default_fhir_dir() -> String {
    "data/fhir".to_string()
}

fn default_report_dir() -> String {
    "data/reports".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
