//! External system integrations for ehrbridge.
//!
//! - [`filesystem`] - JSON files in and out: legacy collections, FHIR
//!   resources and bundles, validation reports, definitions documents
//!
//! Adapters isolate I/O from the mapping and validation engine, which only
//! ever sees in-memory batches.
//!
//! # Example
//!
//! ```rust,no_run
//! use ehrbridge::adapters::filesystem;
//! use ehrbridge::core::mapping::Mapper;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = filesystem::load_legacy_batch("data/legacy")?;
//! let collections = Mapper::new("legacy-ehr").map_batch(&batch)?;
//!
//! filesystem::write_resources("data/fhir", &collections)?;
//! filesystem::write_bundle("data/fhir", &collections.to_bundle())?;
//! # Ok(())
//! # }
//! ```

pub mod filesystem;
