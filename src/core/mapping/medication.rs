//! Medication → MedicationRequest mapping

use super::{encounter_reference, patient_reference, present, Mapper};
use crate::domain::codes::MedicationRequestIntent;
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{non_empty, LegacyKind, LegacyMedication};
use crate::domain::resources::{
    CodeableConcept, DispenseRequest, DoseAndRate, Dosage, MedicationRequest, Meta, Quantity,
    Reference,
};
use crate::domain::Result;

impl Mapper {
    /// Maps a legacy prescription to a `MedicationRequest`
    pub fn map_medication(&self, legacy: &LegacyMedication) -> Result<MedicationRequest> {
        let token = self.id_token(LegacyKind::Medication, &legacy.medication_id)?;

        Ok(MedicationRequest {
            id: ResourceType::MedicationRequest.generated_id(&token),
            meta: Meta::for_type(ResourceType::MedicationRequest),
            identifier: vec![self.source_identifier(present(&legacy.medication_id))],
            status: self.tables.medication_status(non_empty(&legacy.status)),
            intent: MedicationRequestIntent::Order,
            medication_codeable_concept: CodeableConcept::text(
                non_empty(&legacy.medication_name).unwrap_or("Unknown Medication"),
            ),
            subject: patient_reference(&legacy.patient_id),
            encounter: encounter_reference(&legacy.encounter_id),
            authored_on: present(&legacy.prescription_date),
            dosage_instruction: vec![map_dosage(legacy)],
            requester: non_empty(&legacy.prescriber).map(Reference::display),
            dispense_request: map_dispense_request(legacy),
        })
    }
}

/// Single dosage instruction; the text is always present even when blank
fn map_dosage(legacy: &LegacyMedication) -> Dosage {
    let text = format!(
        "{} {} {}",
        legacy.dose.as_deref().unwrap_or_default(),
        legacy.route.as_deref().unwrap_or_default(),
        legacy.frequency.as_deref().unwrap_or_default()
    );

    Dosage {
        text,
        route: non_empty(&legacy.route).map(CodeableConcept::text),
        dose_and_rate: present(&legacy.dose)
            .map(|text| DoseAndRate { text })
            .into_iter()
            .collect(),
    }
}

/// Present only when refills or a non-zero supply duration exist
fn map_dispense_request(legacy: &LegacyMedication) -> Option<DispenseRequest> {
    let duration = legacy.duration_days.filter(|days| *days > 0);
    if legacy.refills.is_none() && duration.is_none() {
        return None;
    }

    Some(DispenseRequest {
        number_of_repeats_allowed: legacy.refills,
        expected_supply_duration: duration.map(|days| Quantity::ucum(f64::from(days), "day", "d")),
    })
}
