//! Validator input: resources grouped by type
//!
//! Resources are held as raw JSON so that documents with missing or malformed
//! fields can still be inspected and reported on.

use crate::domain::bundle::ResourceCollections;
use crate::domain::ids::ResourceType;
use crate::domain::Result;
use serde_json::Value;

/// Resources of one type, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub resource_type: String,
    pub resources: Vec<Value>,
}

/// A batch of resources grouped by type
///
/// Groups iterate Patient, Encounter, Observation, MedicationRequest first,
/// then any other types in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSet {
    groups: Vec<ResourceGroup>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts mapper output to a resource set
    pub fn from_collections(collections: &ResourceCollections) -> Result<Self> {
        let mut set = Self::new();
        for resource_type in ResourceType::ALL {
            for resource in collections.resources_of(resource_type) {
                set.push(resource_type.as_str(), resource.to_json()?);
            }
        }
        Ok(set)
    }

    /// Extracts the resources of a bundle document
    ///
    /// Entries without a `resource`, or whose resource has no string
    /// `resourceType`, are skipped. A document that is not a bundle yields an
    /// empty set.
    pub fn from_bundle(bundle: &Value) -> Self {
        let mut set = Self::new();

        if bundle.get("resourceType").and_then(Value::as_str) != Some("Bundle") {
            return set;
        }

        let entries = bundle
            .get("entry")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for resource in entries.iter().filter_map(|entry| entry.get("resource")) {
            if let Some(resource_type) = resource.get("resourceType").and_then(Value::as_str) {
                set.push(resource_type, resource.clone());
            }
        }

        set
    }

    /// Appends a resource to its group, creating the group when needed
    pub fn push(&mut self, resource_type: &str, resource: Value) {
        match self
            .groups
            .iter_mut()
            .find(|g| g.resource_type == resource_type)
        {
            Some(group) => group.resources.push(resource),
            None => {
                self.groups.push(ResourceGroup {
                    resource_type: resource_type.to_string(),
                    resources: vec![resource],
                });
                self.sort_groups();
            }
        }
    }

    /// Appends a whole group of resources read from a per-type source
    pub fn extend(&mut self, resource_type: &str, resources: Vec<Value>) {
        for resource in resources {
            self.push(resource_type, resource);
        }
    }

    fn sort_groups(&mut self) {
        // Stable: unknown types keep first-seen order behind the known ones
        self.groups.sort_by_key(|group| {
            ResourceType::ALL
                .iter()
                .position(|rt| rt.as_str() == group.resource_type)
                .unwrap_or(ResourceType::ALL.len())
        });
    }

    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    /// Resources of one type
    pub fn group(&self, resource_type: &str) -> Option<&ResourceGroup> {
        self.groups.iter().find(|g| g.resource_type == resource_type)
    }

    /// Total number of resources
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.resources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
