//! Resource type and identifier types
//!
//! Newtype-style wrappers for the identifiers that flow between the mapper and
//! the validator. Validation findings are keyed by [`ResourceKey`], and
//! references are split into their parts with [`ReferenceTarget`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four standardized resource types the engine understands
///
/// # Examples
///
/// ```
/// use ehrbridge::domain::ids::ResourceType;
/// use std::str::FromStr;
///
/// let rt = ResourceType::from_str("MedicationRequest").unwrap();
/// assert_eq!(rt.as_str(), "MedicationRequest");
/// assert!(ResourceType::from_str("Bundle").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Patient demographics
    Patient,
    /// Clinical encounter
    Encounter,
    /// Laboratory observation
    Observation,
    /// Medication order
    MedicationRequest,
}

impl ResourceType {
    /// All supported types, in processing order
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Patient,
        ResourceType::Encounter,
        ResourceType::Observation,
        ResourceType::MedicationRequest,
    ];

    /// Returns the `resourceType` discriminator string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Encounter => "Encounter",
            ResourceType::Observation => "Observation",
            ResourceType::MedicationRequest => "MedicationRequest",
        }
    }

    /// US Core profile URL stamped into `meta.profile`
    pub fn profile_url(&self) -> &'static str {
        match self {
            ResourceType::Patient => {
                "http://hl7.org/fhir/us/core/StructureDefinition/us-core-patient"
            }
            ResourceType::Encounter => {
                "http://hl7.org/fhir/us/core/StructureDefinition/us-core-encounter"
            }
            ResourceType::Observation => {
                "http://hl7.org/fhir/us/core/StructureDefinition/us-core-observation-lab"
            }
            ResourceType::MedicationRequest => {
                "http://hl7.org/fhir/us/core/StructureDefinition/us-core-medicationrequest"
            }
        }
    }

    /// Builds the generated identifier `<Type>-<legacy id>`
    pub fn generated_id(&self, legacy_id: &str) -> String {
        format!("{}-{}", self.as_str(), legacy_id)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(ResourceType::Patient),
            "Encounter" => Ok(ResourceType::Encounter),
            "Observation" => Ok(ResourceType::Observation),
            "MedicationRequest" => Ok(ResourceType::MedicationRequest),
            other => Err(format!("Unsupported resource type: {other}")),
        }
    }
}

/// Composite key identifying one resource within a batch
///
/// The type is kept as a string because validation results can exist for
/// resource types outside [`ResourceType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    resource_type: String,
    id: String,
}

impl ResourceKey {
    /// Creates a new key
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Returns the resource type part
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the identifier part
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// A literal reference string split into `<Type>/<id>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTarget<'a> {
    /// Type segment before the first `/`
    pub resource_type: &'a str,
    /// Everything after the first `/`
    pub id: &'a str,
}

impl<'a> ReferenceTarget<'a> {
    /// Splits a reference string at the first `/`
    ///
    /// Returns `None` when the string has no `/` separator.
    pub fn parse(reference: &'a str) -> Option<Self> {
        reference
            .split_once('/')
            .map(|(resource_type, id)| Self { resource_type, id })
    }

    /// Builds the reference string for a target
    pub fn format(resource_type: ResourceType, id: &str) -> String {
        format!("{}/{}", resource_type.as_str(), id)
    }

    /// Converts into an owned lookup key
    pub fn to_key(&self) -> ResourceKey {
        ResourceKey::new(self.resource_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        for rt in ResourceType::ALL {
            assert_eq!(ResourceType::from_str(rt.as_str()).unwrap(), rt);
        }
    }

    #[test]
    fn test_resource_type_rejects_unknown() {
        let err = ResourceType::from_str("Condition").unwrap_err();
        assert_eq!(err, "Unsupported resource type: Condition");
    }

    #[test]
    fn test_generated_id() {
        assert_eq!(ResourceType::Patient.generated_id("PT1"), "Patient-PT1");
        assert_eq!(
            ResourceType::MedicationRequest.generated_id("MED9"),
            "MedicationRequest-MED9"
        );
    }

    #[test]
    fn test_reference_target_parse() {
        let target = ReferenceTarget::parse("Patient/ABC123").unwrap();
        assert_eq!(target.resource_type, "Patient");
        assert_eq!(target.id, "ABC123");
        assert_eq!(target.to_key(), ResourceKey::new("Patient", "ABC123"));

        assert!(ReferenceTarget::parse("ABC123").is_none());
    }

    #[test]
    fn test_reference_target_keeps_trailing_segments() {
        let target = ReferenceTarget::parse("Patient/a/b").unwrap();
        assert_eq!(target.id, "a/b");
    }

    #[test]
    fn test_resource_key_display() {
        let key = ResourceKey::new("Encounter", "Encounter-E1");
        assert_eq!(key.to_string(), "Encounter/Encounter-E1");
    }
}
