//! Configuration management for ehrbridge.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! ehrbridge uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `EHRBRIDGE_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ehrbridge::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ehrbridge.toml")?;
//!
//! println!("Legacy input: {}", config.source.input_dir);
//! println!("FHIR output: {}", config.output.fhir_dir);
//! println!("Cross-validate: {}", config.validation.cross_validate);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`SourceConfig`] - Identifier system and legacy input directory
//! - [`OutputConfig`] - Resource and report directories
//! - [`MappingConfig`] - Strict identifiers and code table overrides
//! - [`ValidationConfig`] - Fail-fast, cross-validation, definitions file
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! system = "2.16.840.1.113883.3.9999"
//! input_dir = "${EHRBRIDGE_DATA}/legacy"
//!
//! [output]
//! fhir_dir = "out/fhir"
//! report_dir = "out/reports"
//!
//! [mapping.encounter_status]
//! closed = "finished"
//!
//! [validation]
//! cross_validate = true
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, EhrBridgeConfig, LoggingConfig, MappingConfig, OutputConfig, SourceConfig,
    ValidationConfig,
};
