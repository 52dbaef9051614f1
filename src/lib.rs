// ehrbridge - Legacy EHR to FHIR R4 Mapper and Validator
// Copyright (c) 2025 ehrbridge Contributors
// Licensed under the MIT License

//! # ehrbridge - Legacy EHR to FHIR R4
//!
//! ehrbridge turns loosely-typed legacy EHR exports (patients, encounters,
//! observations and medications) into FHIR R4 resources, then checks the
//! result for conformance.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** legacy records, optionally narrowed by patient and date range
//! - **Mapping** them deterministically to Patient, Encounter, Observation and
//!   MedicationRequest resources
//! - **Validating** each resource structurally, then every reference across
//!   the batch
//! - **Reporting** per-resource results with aggregate statistics
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Extraction filter, mapper, validator
//! - [`adapters`] - JSON file input and output
//! - [`domain`] - Legacy records, FHIR resources, codes and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ehrbridge::adapters::filesystem;
//! use ehrbridge::config::load_config;
//! use ehrbridge::core::mapping::Mapper;
//! use ehrbridge::core::validation::{cross_validate, ResourceSet, ValidationReport, Validator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ehrbridge.toml")?;
//!
//!     let batch = filesystem::load_legacy_batch(&config.source.input_dir)?;
//!     let collections = Mapper::from_config(&config)?.map_batch(&batch)?;
//!     filesystem::write_bundle(&config.output.fhir_dir, &collections.to_bundle())?;
//!
//!     let resources = ResourceSet::from_collections(&collections)?;
//!     let run = Validator::with_defaults()?.validate_all(&resources);
//!     let report = ValidationReport::new(cross_validate(&resources, run).into_results());
//!
//!     println!("{}", report.format_summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only conditions that halt a batch are errors ([`domain::BridgeError`]).
//! Unknown legacy codes fall back to defaults, and malformed resources become
//! validation findings.
//!
//! ```rust,no_run
//! use ehrbridge::domain::BridgeError;
//!
//! fn example() -> Result<(), BridgeError> {
//!     let batch = ehrbridge::adapters::filesystem::load_legacy_batch("data/legacy")?;
//!     println!("{} legacy records", batch.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! ehrbridge uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(patients = 12, "Loaded legacy records");
//! warn!(kind = "observations", "Missing observation_id, generated one");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
