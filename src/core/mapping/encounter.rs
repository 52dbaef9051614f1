//! Encounter mapping

use super::{patient_reference, present, Mapper};
use crate::domain::codes::WireCode;
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{non_empty, LegacyDiagnosis, LegacyEncounter, LegacyKind};
use crate::domain::resources::{
    CodeableConcept, Coding, DiagnosisCondition, Encounter, EncounterDiagnosis, EncounterLocation,
    EncounterParticipant, Meta, Period, Reference,
};
use crate::domain::Result;

const ACT_CODE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v3-ActCode";
const PARTICIPATION_TYPE_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/v3-ParticipationType";
const ICD10_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10-cm";
const ICD9_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-9-cm";

impl Mapper {
    /// Maps a legacy encounter to an `Encounter`
    pub fn map_encounter(&self, legacy: &LegacyEncounter) -> Result<Encounter> {
        let token = self.id_token(LegacyKind::Encounter, &legacy.encounter_id)?;
        let encounter_type = non_empty(&legacy.encounter_type);

        let class = self.tables.encounter_class(encounter_type);

        Ok(Encounter {
            id: ResourceType::Encounter.generated_id(&token),
            meta: Meta::for_type(ResourceType::Encounter),
            identifier: vec![self.source_identifier(present(&legacy.encounter_id))],
            status: self.tables.encounter_status(non_empty(&legacy.status)),
            class: Coding::new(
                ACT_CODE_SYSTEM,
                class.as_str(),
                encounter_type.unwrap_or("Ambulatory"),
            ),
            encounter_type: vec![CodeableConcept::text(
                encounter_type.unwrap_or("Encounter"),
            )],
            subject: patient_reference(&legacy.patient_id),
            period: Period {
                start: present(&legacy.encounter_date),
                end: present(&legacy.discharge_date),
            },
            diagnosis: legacy
                .diagnoses
                .iter()
                .flatten()
                .enumerate()
                .map(|(index, diagnosis)| map_diagnosis(index, diagnosis))
                .collect(),
            location: non_empty(&legacy.location)
                .map(|location| EncounterLocation {
                    location: Reference::display(location),
                })
                .into_iter()
                .collect(),
            participant: legacy
                .provider
                .as_ref()
                .map(|provider| EncounterParticipant {
                    participant_type: vec![CodeableConcept::coded(Coding::new(
                        PARTICIPATION_TYPE_SYSTEM,
                        "PPRF",
                        "Primary Performer",
                    ))],
                    individual: Reference::display(
                        non_empty(&provider.name).unwrap_or("Unknown Provider"),
                    ),
                })
                .into_iter()
                .collect(),
            reason_code: non_empty(&legacy.chief_complaint)
                .map(CodeableConcept::text)
                .into_iter()
                .collect(),
        })
    }
}

/// Diagnosis entry ranked by 1-based list position
fn map_diagnosis(index: usize, legacy: &LegacyDiagnosis) -> EncounterDiagnosis {
    let display = non_empty(&legacy.diagnosis).unwrap_or("Unknown");

    let coding = non_empty(&legacy.code)
        .map(|code| {
            let system = match non_empty(&legacy.code_type) {
                Some("ICD-9") => ICD9_SYSTEM,
                _ => ICD10_SYSTEM,
            };
            Coding::new(system, code, display)
        })
        .into_iter()
        .collect();

    EncounterDiagnosis {
        condition: DiagnosisCondition {
            display: display.to_string(),
            coding,
        },
        rank: (index + 1) as u32,
    }
}
