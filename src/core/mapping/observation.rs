//! Observation mapping
//!
//! A legacy observation with a `results` list fans out into one resource per
//! result component. Without a list it yields exactly one resource.

use super::{encounter_reference, patient_reference, present, Mapper};
use crate::domain::codes::{ObservationStatus, WireCode};
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{non_empty, LegacyKind, LegacyObservation, LegacyResult};
use crate::domain::resources::{
    CodeableConcept, Coding, Identifier, Meta, Observation, Quantity, Reference, ReferenceRange,
};
use crate::domain::Result;

const CATEGORY_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/observation-category";
const LOINC_SYSTEM: &str = "http://loinc.org";
const INTERPRETATION_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/v3-ObservationInterpretation";

impl Mapper {
    /// Maps a legacy observation to zero or more `Observation`s
    ///
    /// An empty `results` list produces no resources.
    pub fn map_observation(&self, legacy: &LegacyObservation) -> Result<Vec<Observation>> {
        let token = self.id_token(LegacyKind::Observation, &legacy.observation_id)?;
        let legacy_id = non_empty(&legacy.observation_id);

        let Some(results) = &legacy.results else {
            let identifier = self.source_identifier(legacy_id.map(str::to_string));
            let observation = self.base_observation(
                legacy,
                ResourceType::Observation.generated_id(&token),
                identifier,
                non_empty(&legacy.test_name).unwrap_or("Unknown Test"),
            );
            return Ok(vec![observation]);
        };

        Ok(results
            .iter()
            .enumerate()
            .map(|(index, result)| {
                let identifier =
                    self.source_identifier(legacy_id.map(|id| format!("{id}-{index}")));
                let text = non_empty(&result.component)
                    .or_else(|| non_empty(&legacy.test_name))
                    .unwrap_or("Unknown Test");

                let mut observation = self.base_observation(
                    legacy,
                    format!("{}-{index}", ResourceType::Observation.generated_id(&token)),
                    identifier,
                    text,
                );
                self.apply_result(&mut observation, result);
                observation
            })
            .collect())
    }

    /// Fields shared by every resource produced from one legacy observation
    fn base_observation(
        &self,
        legacy: &LegacyObservation,
        id: String,
        identifier: Identifier,
        code_text: &str,
    ) -> Observation {
        let coding = non_empty(&legacy.test_code)
            .map(|code| {
                Coding::new(
                    LOINC_SYSTEM,
                    code,
                    non_empty(&legacy.test_name).unwrap_or("Unknown Test"),
                )
            })
            .into_iter()
            .collect();

        Observation {
            id,
            meta: Meta::for_type(ResourceType::Observation),
            identifier: vec![identifier],
            status: self.observation_status(legacy),
            category: vec![CodeableConcept::coded(Coding::new(
                CATEGORY_SYSTEM,
                "laboratory",
                "Laboratory",
            ))],
            code: CodeableConcept {
                coding,
                text: Some(code_text.to_string()),
            },
            subject: patient_reference(&legacy.patient_id),
            encounter: encounter_reference(&legacy.encounter_id),
            effective_date_time: present(&legacy.observation_date),
            value_quantity: None,
            value_string: None,
            interpretation: Vec::new(),
            reference_range: Vec::new(),
            performer: non_empty(&legacy.performer)
                .map(Reference::display)
                .into_iter()
                .collect(),
        }
    }

    fn observation_status(&self, legacy: &LegacyObservation) -> ObservationStatus {
        self.tables.observation_status(non_empty(&legacy.status))
    }

    /// Value, interpretation and range for one result component
    fn apply_result(&self, observation: &mut Observation, result: &LegacyResult) {
        if let Some(value) = &result.value {
            match value.as_number() {
                Some(number) => {
                    let unit = present(&result.unit).unwrap_or_default();
                    observation.value_quantity = Some(Quantity::ucum(number, unit.clone(), unit));
                }
                None => observation.value_string = Some(value.as_text()),
            }
        }

        if let Some(flag) = non_empty(&result.status) {
            let code = self.tables.interpretation(flag);
            observation.interpretation = vec![CodeableConcept::coded(Coding::new(
                INTERPRETATION_SYSTEM,
                code.as_str(),
                capitalize(flag),
            ))];
        }

        if let Some(range) = present(&result.reference_range) {
            observation.reference_range = vec![ReferenceRange { text: range }];
        }
    }
}

/// Uppercases the first character and lowercases the rest
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::legacy::LegacyValue;
    use serde_json::json;

    fn panel() -> LegacyObservation {
        serde_json::from_value(json!({
            "observation_id": "O1",
            "patient_id": "PT1",
            "encounter_id": "E1",
            "test_name": "Basic Metabolic Panel",
            "test_code": "24323-8",
            "observation_date": "2024-05-01T08:30:00Z",
            "performer": "Main Lab",
            "results": [
                {"component": "Glucose", "value": "105", "unit": "mg/dL",
                 "reference_range": "70-99", "status": "high"},
                {"component": "Culture", "value": "No growth"},
                {"value": 4.1, "unit": "mmol/L", "status": "normal"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_one_resource_per_result() {
        let observations = Mapper::new("legacy").map_observation(&panel()).unwrap();

        let ids: Vec<&str> = observations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["Observation-O1-0", "Observation-O1-1", "Observation-O1-2"]);
        assert_eq!(observations[1].identifier[0].value.as_deref(), Some("O1-1"));

        for observation in &observations {
            assert_eq!(observation.status, ObservationStatus::Final);
            assert_eq!(
                observation.encounter.as_ref().unwrap().reference.as_deref(),
                Some("Encounter/Encounter-E1")
            );
            assert_eq!(observation.code.coding[0].code.as_deref(), Some("24323-8"));
        }
    }

    #[test]
    fn test_numeric_and_text_values() {
        let observations = Mapper::new("legacy").map_observation(&panel()).unwrap();

        let glucose = serde_json::to_value(&observations[0]).unwrap();
        assert_eq!(glucose["code"]["text"], "Glucose");
        assert_eq!(
            glucose["valueQuantity"],
            json!({"value": 105.0, "unit": "mg/dL",
                   "system": "http://unitsofmeasure.org", "code": "mg/dL"})
        );
        assert_eq!(glucose["interpretation"][0]["coding"][0]["code"], "H");
        assert_eq!(glucose["interpretation"][0]["coding"][0]["display"], "High");
        assert_eq!(glucose["referenceRange"][0]["text"], "70-99");

        let culture = serde_json::to_value(&observations[1]).unwrap();
        assert_eq!(culture["valueString"], "No growth");
        assert!(culture.get("valueQuantity").is_none());
        assert!(culture.get("interpretation").is_none());

        let unnamed = serde_json::to_value(&observations[2]).unwrap();
        assert_eq!(unnamed["code"]["text"], "Basic Metabolic Panel");
        assert_eq!(unnamed["interpretation"][0]["coding"][0]["code"], "N");
    }

    #[test]
    fn test_without_results_list() {
        let legacy = LegacyObservation {
            results: None,
            encounter_id: None,
            status: Some("bogus".to_string()),
            ..panel()
        };
        let observations = Mapper::new("legacy").map_observation(&legacy).unwrap();

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].id, "Observation-O1");
        assert_eq!(observations[0].identifier[0].value.as_deref(), Some("O1"));
        assert_eq!(observations[0].status, ObservationStatus::Unknown);
        assert!(observations[0].encounter.is_none());
        assert!(observations[0].value_quantity.is_none());
        assert!(observations[0].value_string.is_none());
    }

    #[test]
    fn test_empty_results_list() {
        let legacy = LegacyObservation {
            results: Some(vec![]),
            ..panel()
        };
        assert!(Mapper::new("legacy").map_observation(&legacy).unwrap().is_empty());
    }

    #[test]
    fn test_result_without_value() {
        let legacy = LegacyObservation {
            results: Some(vec![LegacyResult {
                component: Some("Hemoglobin".to_string()),
                ..Default::default()
            }]),
            ..panel()
        };
        let observation = &Mapper::new("legacy").map_observation(&legacy).unwrap()[0];
        assert!(observation.value_quantity.is_none());
        assert!(observation.value_string.is_none());
    }

    #[test]
    fn test_non_finite_text_stays_text() {
        let legacy = LegacyObservation {
            results: Some(vec![LegacyResult {
                value: Some(LegacyValue::Text("NaN".to_string())),
                ..Default::default()
            }]),
            ..panel()
        };
        let observation = &Mapper::new("legacy").map_observation(&legacy).unwrap()[0];
        assert_eq!(observation.value_string.as_deref(), Some("NaN"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("high"), "High");
        assert_eq!(capitalize("ABNORMAL"), "Abnormal");
        assert_eq!(capitalize(""), "");
    }
}
