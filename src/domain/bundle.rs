//! Mapped resource collections and the bundle view

use super::ids::ResourceType;
use super::resources::{Encounter, MedicationRequest, Observation, Patient, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mapper output, grouped by resource type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollections {
    pub patients: Vec<Patient>,
    pub encounters: Vec<Encounter>,
    pub observations: Vec<Observation>,
    pub medication_requests: Vec<MedicationRequest>,
}

impl ResourceCollections {
    /// Number of resources of one type
    pub fn count(&self, resource_type: ResourceType) -> usize {
        match resource_type {
            ResourceType::Patient => self.patients.len(),
            ResourceType::Encounter => self.encounters.len(),
            ResourceType::Observation => self.observations.len(),
            ResourceType::MedicationRequest => self.medication_requests.len(),
        }
    }

    /// Number of resources across all types
    pub fn total(&self) -> usize {
        ResourceType::ALL.iter().map(|rt| self.count(*rt)).sum()
    }

    /// Returns true when no resources were produced
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Resources of one type, wrapped in the tagged envelope
    pub fn resources_of(&self, resource_type: ResourceType) -> Vec<Resource> {
        match resource_type {
            ResourceType::Patient => self.patients.iter().cloned().map(Resource::from).collect(),
            ResourceType::Encounter => self.encounters.iter().cloned().map(Resource::from).collect(),
            ResourceType::Observation => {
                self.observations.iter().cloned().map(Resource::from).collect()
            }
            ResourceType::MedicationRequest => self
                .medication_requests
                .iter()
                .cloned()
                .map(Resource::from)
                .collect(),
        }
    }

    /// Every resource, in type order
    pub fn all_resources(&self) -> Vec<Resource> {
        ResourceType::ALL
            .iter()
            .flat_map(|rt| self.resources_of(*rt))
            .collect()
    }

    /// Builds a transaction bundle stamped with the current time
    pub fn to_bundle(&self) -> Bundle {
        self.to_bundle_at(Utc::now())
    }

    /// Builds a transaction bundle stamped with the given time
    pub fn to_bundle_at(&self, timestamp: DateTime<Utc>) -> Bundle {
        let entry = self
            .all_resources()
            .into_iter()
            .map(BundleEntry::new)
            .collect();

        Bundle {
            resource_type: "Bundle".to_string(),
            id: format!("bundle-{}", timestamp.format("%Y%m%d%H%M%S")),
            bundle_type: "transaction".to_string(),
            entry,
        }
    }
}

/// All resources of a batch aggregated into one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub id: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

/// One bundle entry: `fullUrl` carries the type and identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
}

impl BundleEntry {
    /// Wraps a resource, deriving `fullUrl` from its type and id
    pub fn new(resource: Resource) -> Self {
        Self {
            full_url: format!("{}/{}", resource.resource_type(), resource.id()),
            resource,
        }
    }
}
