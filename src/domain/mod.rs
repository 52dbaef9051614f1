//! Domain models and types for ehrbridge.
//!
//! This module contains the data shapes on both sides of the engine: the
//! loosely-typed legacy records that come in, and the strictly-typed
//! standardized resources that go out.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Legacy records** ([`LegacyPatient`], [`LegacyEncounter`], [`LegacyObservation`], [`LegacyMedication`])
//! - **Standardized resources** ([`Patient`], [`Encounter`], [`Observation`], [`MedicationRequest`])
//! - **Closed code sets** ([`AdministrativeGender`], [`EncounterStatus`], ...)
//! - **Identifiers** ([`ResourceType`], [`ResourceKey`], [`ReferenceTarget`])
//! - **Error types** ([`BridgeError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use ehrbridge::domain::{ReferenceTarget, ResourceType};
//!
//! let reference = ReferenceTarget::format(ResourceType::Patient, "Patient-PT1");
//! let target = ReferenceTarget::parse(&reference).unwrap();
//! assert_eq!(target.resource_type, "Patient");
//! assert_eq!(target.id, "Patient-PT1");
//! ```

pub mod bundle;
pub mod codes;
pub mod errors;
pub mod ids;
pub mod legacy;
pub mod resources;
pub mod result;

// Re-export commonly used types for convenience
pub use bundle::{Bundle, BundleEntry, ResourceCollections};
pub use codes::{
    AdministrativeGender, ContactPointSystem, EncounterClass, EncounterStatus, Interpretation,
    MedicationRequestIntent, MedicationRequestStatus, ObservationStatus, WireCode,
};
pub use errors::BridgeError;
pub use ids::{ReferenceTarget, ResourceKey, ResourceType};
pub use legacy::{
    LegacyBatch, LegacyEncounter, LegacyKind, LegacyMedication, LegacyObservation, LegacyPatient,
};
pub use resources::{Encounter, MedicationRequest, Observation, Patient, Resource};
pub use result::Result;
