//! Legacy record → standardized resource mapping
//!
//! This module provides the [`Mapper`], a deterministic translator from the
//! four legacy entity kinds to the four standardized resource types:
//!
//! - **Patient** → one `Patient`
//! - **Encounter** → one `Encounter`
//! - **Observation** → zero or more `Observation`s (one per result component)
//! - **Medication** → one `MedicationRequest`
//!
//! The mapper does no I/O and holds no mutable state. Unknown legacy codes are
//! replaced by documented defaults and absent optional fields are omitted, so
//! malformed-but-present data never stops a batch.
//!
//! # Example
//!
//! ```
//! use ehrbridge::core::mapping::Mapper;
//! use ehrbridge::domain::legacy::LegacyPatient;
//!
//! let mapper = Mapper::new("legacy-ehr");
//! let patient = mapper
//!     .map_patient(&LegacyPatient {
//!         patient_id: Some("PT1".to_string()),
//!         gender: Some("F".to_string()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(patient.id, "Patient-PT1");
//! ```

mod encounter;
mod medication;
mod observation;
mod patient;
pub mod tables;

pub use tables::MappingTables;

use crate::config::EhrBridgeConfig;
use crate::domain::bundle::ResourceCollections;
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{non_empty, LegacyBatch, LegacyKind};
use crate::domain::resources::{Identifier, Reference};
use crate::domain::{BridgeError, Result};
use uuid::Uuid;

/// Deterministic legacy-to-standard record translator
#[derive(Debug, Clone)]
pub struct Mapper {
    source_system: String,
    require_source_ids: bool,
    tables: MappingTables,
}

impl Mapper {
    /// Creates a mapper with the default tables
    pub fn new(source_system: impl Into<String>) -> Self {
        Self {
            source_system: source_system.into(),
            require_source_ids: false,
            tables: MappingTables::default(),
        }
    }

    /// Creates a mapper from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Configuration`] when a mapping override names a
    /// code outside its value set.
    pub fn from_config(config: &EhrBridgeConfig) -> Result<Self> {
        let tables = MappingTables::from_config(&config.mapping)?;
        Ok(Self::new(config.source.system.clone())
            .require_source_ids(config.mapping.require_source_ids)
            .with_tables(tables))
    }

    /// Replaces the lookup tables
    pub fn with_tables(mut self, tables: MappingTables) -> Self {
        self.tables = tables;
        self
    }

    /// Fails on a missing legacy primary identifier instead of generating one
    pub fn require_source_ids(mut self, required: bool) -> Self {
        self.require_source_ids = required;
        self
    }

    /// Maps every entity of a batch, grouped by resource type
    pub fn map_batch(&self, batch: &LegacyBatch) -> Result<ResourceCollections> {
        let mut collections = ResourceCollections::default();

        for legacy in &batch.patients {
            collections.patients.push(self.map_patient(legacy)?);
        }
        for legacy in &batch.encounters {
            collections.encounters.push(self.map_encounter(legacy)?);
        }
        for legacy in &batch.observations {
            collections
                .observations
                .extend(self.map_observation(legacy)?);
        }
        for legacy in &batch.medications {
            collections
                .medication_requests
                .push(self.map_medication(legacy)?);
        }

        crate::log_batch_mapped!(
            collections.count(ResourceType::Patient),
            collections.count(ResourceType::Encounter),
            collections.count(ResourceType::Observation),
            collections.count(ResourceType::MedicationRequest)
        );

        Ok(collections)
    }

    /// Token the generated identifier is derived from
    ///
    /// Uses the legacy primary identifier when present. Otherwise falls back to
    /// a random UUID, or fails when source identifiers are required.
    fn id_token(&self, kind: LegacyKind, legacy_id: &Option<String>) -> Result<String> {
        if let Some(id) = non_empty(legacy_id) {
            return Ok(id.to_string());
        }

        if self.require_source_ids {
            return Err(BridgeError::Mapping(format!(
                "{kind} record is missing its primary identifier"
            )));
        }

        let token = Uuid::new_v4().to_string();
        tracing::warn!(
            kind = %kind,
            token = %token,
            "Legacy record has no primary identifier, generated a random one"
        );
        Ok(token)
    }

    /// Identifier entry pointing back at the legacy record
    fn source_identifier(&self, value: Option<String>) -> Identifier {
        Identifier {
            system: format!("urn:oid:{}", self.source_system),
            identifier_type: None,
            value,
        }
    }
}

/// `subject` reference to the mapped patient
fn patient_reference(patient_id: &Option<String>) -> Option<Reference> {
    non_empty(patient_id).map(|id| {
        Reference::to(
            ResourceType::Patient,
            &ResourceType::Patient.generated_id(id),
        )
    })
}

/// `encounter` reference to the mapped encounter
fn encounter_reference(encounter_id: &Option<String>) -> Option<Reference> {
    non_empty(encounter_id).map(|id| {
        Reference::to(
            ResourceType::Encounter,
            &ResourceType::Encounter.generated_id(id),
        )
    })
}

/// Owned copy of a present, non-empty legacy string
fn present(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_string)
}
