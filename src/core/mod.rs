//! Core business logic for ehrbridge.
//!
//! This module contains the mapping-and-validation engine.
//!
//! # Modules
//!
//! - [`extract`] - Identifier and date-range filtering of a legacy batch
//! - [`mapping`] - Legacy record to standardized resource translation
//! - [`validation`] - Structural and cross-reference validation, and reporting
//!
//! # Workflow
//!
//! 1. **Load**: Read the four legacy collections
//! 2. **Extract** (optional): Narrow the batch by patient or date range
//! 3. **Map**: Translate every record into standardized resources
//! 4. **Validate**: Check each resource on its own
//! 5. **Cross-validate** (optional): Resolve references across the batch
//! 6. **Report**: Aggregate statistics and per-resource findings
//!
//! # Example
//!
//! ```rust
//! use ehrbridge::core::mapping::Mapper;
//! use ehrbridge::core::validation::{cross_validate, ResourceSet, ValidationReport, Validator};
//! use ehrbridge::domain::legacy::{LegacyBatch, LegacyPatient};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = LegacyBatch {
//!     patients: vec![LegacyPatient {
//!         patient_id: Some("PT1".to_string()),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let collections = Mapper::new("legacy-ehr").map_batch(&batch)?;
//! let resources = ResourceSet::from_collections(&collections)?;
//!
//! let validator = Validator::with_defaults()?;
//! let run = cross_validate(&resources, validator.validate_all(&resources));
//! let report = ValidationReport::new(run.into_results());
//!
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod extract;
pub mod mapping;
pub mod validation;
