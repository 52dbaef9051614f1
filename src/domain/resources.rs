//! Standardized (FHIR R4 shaped) resource models
//!
//! The mapper builds these structs and serializes them to JSON. Optional
//! elements are `Option` or possibly-empty `Vec` fields marked with
//! `skip_serializing_if`, so an absent source field never shows up as `null`
//! or an empty container in the output.

use super::codes::{
    AdministrativeGender, ContactPointSystem, EncounterStatus, MedicationRequestIntent,
    MedicationRequestStatus, ObservationStatus,
};
use super::ids::{ReferenceTarget, ResourceType};
use serde::{Deserialize, Serialize};

/// UCUM code system URL
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

// ============================================================================
// Shared datatypes
// ============================================================================

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub profile: Vec<String>,
}

impl Meta {
    /// Metadata carrying the US Core profile for a resource type
    pub fn for_type(resource_type: ResourceType) -> Self {
        Self {
            profile: vec![resource_type.profile_url().to_string()],
        }
    }
}

/// A code from a code system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// Coding with all three parts populated
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: Some(display.into()),
        }
    }
}

/// Concept expressed as codings and/or free text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Concept carrying only free text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Concept carrying a single coding
    pub fn coded(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }
}

/// Business identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Link to another resource, literal or display-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Literal `<Type>/<id>` reference
    pub fn to(resource_type: ResourceType, id: &str) -> Self {
        Self {
            reference: Some(ReferenceTarget::format(resource_type, id)),
            display: None,
        }
    }

    /// Display-only reference
    pub fn display(display: impl Into<String>) -> Self {
        Self {
            reference: None,
            display: Some(display.into()),
        }
    }
}

/// Time range; the end is open when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Measured amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    pub system: String,
    pub code: String,
}

impl Quantity {
    /// UCUM quantity
    pub fn ucum(value: f64, unit: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            system: UCUM_SYSTEM.to_string(),
            code: code.into(),
        }
    }
}

// ============================================================================
// Patient
// ============================================================================

/// Patient resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    pub active: bool,
    pub name: Vec<HumanName>,
    pub gender: AdministrativeGender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    pub deceased_boolean: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub communication: Vec<PatientCommunication>,
}

/// Person name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub name_use: String,
    pub family: String,
    pub given: Vec<String>,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use")]
    pub address_use: String,
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Phone, email or other contact detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: ContactPointSystem,
    pub value: String,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub contact_use: Option<String>,
}

/// Language the patient communicates in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientCommunication {
    pub language: CodeableConcept,
    pub preferred: bool,
}

// ============================================================================
// Encounter
// ============================================================================

/// Encounter resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    pub status: EncounterStatus,
    pub class: Coding,
    #[serde(rename = "type")]
    pub encounter_type: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    pub period: Period,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnosis: Vec<EncounterDiagnosis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<EncounterLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<EncounterParticipant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reason_code: Vec<CodeableConcept>,
}

/// Ranked diagnosis on an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterDiagnosis {
    pub condition: DiagnosisCondition,
    pub rank: u32,
}

/// Inline condition carried by a diagnosis entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisCondition {
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
}

/// Where the encounter took place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterLocation {
    pub location: Reference,
}

/// Practitioner involved in the encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterParticipant {
    #[serde(rename = "type")]
    pub participant_type: Vec<CodeableConcept>,
    pub individual: Reference,
}

// ============================================================================
// Observation
// ============================================================================

/// Observation resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    pub status: ObservationStatus,
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpretation: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_range: Vec<ReferenceRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,
}

/// Textual normal range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub text: String,
}

// ============================================================================
// MedicationRequest
// ============================================================================

/// MedicationRequest resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub id: String,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    pub status: MedicationRequestStatus,
    pub intent: MedicationRequestIntent,
    pub medication_codeable_concept: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,
    pub dosage_instruction: Vec<Dosage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_request: Option<DispenseRequest>,
}

/// Free-text dosage instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dosage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dose_and_rate: Vec<DoseAndRate>,
}

/// Dose text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseAndRate {
    pub text: String,
}

/// Refill and supply information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispenseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_supply_duration: Option<Quantity>,
}

// ============================================================================
// Resource envelope
// ============================================================================

/// Any standardized resource, tagged by `resourceType` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Encounter(Encounter),
    Observation(Observation),
    MedicationRequest(MedicationRequest),
}

impl Resource {
    /// Type discriminator
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Patient(_) => ResourceType::Patient,
            Resource::Encounter(_) => ResourceType::Encounter,
            Resource::Observation(_) => ResourceType::Observation,
            Resource::MedicationRequest(_) => ResourceType::MedicationRequest,
        }
    }

    /// Generated identifier
    pub fn id(&self) -> &str {
        match self {
            Resource::Patient(r) => &r.id,
            Resource::Encounter(r) => &r.id,
            Resource::Observation(r) => &r.id,
            Resource::MedicationRequest(r) => &r.id,
        }
    }

    /// JSON form, including the `resourceType` discriminator
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl From<Patient> for Resource {
    fn from(r: Patient) -> Self {
        Resource::Patient(r)
    }
}

impl From<Encounter> for Resource {
    fn from(r: Encounter) -> Self {
        Resource::Encounter(r)
    }
}

impl From<Observation> for Resource {
    fn from(r: Observation) -> Self {
        Resource::Observation(r)
    }
}

impl From<MedicationRequest> for Resource {
    fn from(r: MedicationRequest) -> Self {
        Resource::MedicationRequest(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codeable_concept_omits_empty_coding() {
        let concept = CodeableConcept::text("Glucose");
        assert_eq!(serde_json::to_value(&concept).unwrap(), json!({"text": "Glucose"}));
    }

    #[test]
    fn test_reference_helpers() {
        let reference = Reference::to(ResourceType::Patient, "Patient-PT1");
        assert_eq!(
            serde_json::to_value(&reference).unwrap(),
            json!({"reference": "Patient/Patient-PT1"})
        );

        let display = Reference::display("Main Lab");
        assert_eq!(
            serde_json::to_value(&display).unwrap(),
            json!({"display": "Main Lab"})
        );
    }

    #[test]
    fn test_resource_serializes_discriminator() {
        let resource = Resource::from(Observation {
            id: "Observation-O1".to_string(),
            meta: Meta::for_type(ResourceType::Observation),
            identifier: vec![],
            status: ObservationStatus::Final,
            category: vec![],
            code: CodeableConcept::text("Glucose"),
            subject: None,
            encounter: None,
            effective_date_time: None,
            value_quantity: None,
            value_string: Some("Positive".to_string()),
            interpretation: vec![],
            reference_range: vec![],
            performer: vec![],
        });

        let value = resource.to_json().unwrap();
        assert_eq!(value["resourceType"], "Observation");
        assert_eq!(value["id"], "Observation-O1");
        assert_eq!(value["status"], "final");
        assert_eq!(value["valueString"], "Positive");
        assert!(value.get("subject").is_none());
        assert!(value.get("valueQuantity").is_none());
        assert!(value.get("interpretation").is_none());
        assert_eq!(resource.resource_type(), ResourceType::Observation);
        assert_eq!(resource.id(), "Observation-O1");
    }

    #[test]
    fn test_resource_deserializes_by_tag() {
        let value = json!({
            "resourceType": "MedicationRequest",
            "id": "MedicationRequest-M1",
            "meta": {"profile": ["p"]},
            "identifier": [],
            "status": "on-hold",
            "intent": "order",
            "medicationCodeableConcept": {"text": "Aspirin"},
            "dosageInstruction": [{"text": "81 mg Oral Once daily"}]
        });

        let resource: Resource = serde_json::from_value(value).unwrap();
        match resource {
            Resource::MedicationRequest(mr) => {
                assert_eq!(mr.status, MedicationRequestStatus::OnHold);
                assert_eq!(mr.dosage_instruction.len(), 1);
                assert!(mr.dispense_request.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
