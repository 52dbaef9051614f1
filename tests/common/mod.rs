//! Shared fixtures for integration tests
//!
//! `synthetic_batch` builds a deterministic legacy batch from a seed, with
//! realistic names and values from `fake` and structure drawn from a seeded
//! `StdRng`. Related records always point at records in the same batch.

#![allow(dead_code)]

use ehrbridge::domain::legacy::{
    LegacyAddress, LegacyBatch, LegacyContact, LegacyDiagnosis, LegacyEncounter,
    LegacyMedication, LegacyObservation, LegacyPatient, LegacyProvider, LegacyResult, LegacyValue,
};
use fake::faker::address::en::{CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::fs;
use std::path::Path;

const GENDERS: [&str; 5] = ["M", "F", "U", "O", "X"];
const ENCOUNTER_TYPES: [&str; 6] = [
    "Office Visit",
    "Emergency",
    "Inpatient",
    "Telehealth",
    "Surgery",
    "Walk-in",
];
const ENCOUNTER_STATUSES: [&str; 4] = ["completed", "in-progress", "cancelled", "archived"];
const LANGUAGES: [&str; 4] = ["English", "Spanish", "Klingon", "French"];
const LAB_TESTS: [(&str, &str, &str); 3] = [
    ("Glucose", "2345-7", "mg/dL"),
    ("Hemoglobin", "718-7", "g/dL"),
    ("Potassium", "2823-3", "mmol/L"),
];
const FLAGS: [&str; 4] = ["normal", "high", "low", "abnormal"];
const MEDICATIONS: [&str; 4] = ["Lisinopril", "Metformin", "Atorvastatin", "Amoxicillin"];
const MEDICATION_STATUSES: [&str; 5] = ["active", "completed", "cancelled", "on-hold", "paused"];

fn s(value: impl Into<String>) -> Option<String> {
    Some(value.into())
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn date(rng: &mut StdRng, year: u32) -> String {
    format!(
        "{year}-{:02}-{:02}",
        rng.gen_range(1..=12),
        rng.gen_range(1..=28)
    )
}

/// Deterministic legacy batch with `patients` patients
///
/// Each patient gets one to three encounters; each encounter gets one
/// observation with one to three results and one medication.
pub fn synthetic_batch(seed: u64, patients: usize) -> LegacyBatch {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut batch = LegacyBatch::default();

    for p in 0..patients {
        let patient_id = format!("PT{p:04}");
        let birth_year = rng.gen_range(1940..2010);
        let registration_year = rng.gen_range(2015..2024);

        batch.patients.push(LegacyPatient {
            patient_id: s(&patient_id),
            mrn: s(format!("MRN{}", rng.gen_range(100_000..999_999))),
            first_name: s(FirstName().fake_with_rng::<String, _>(&mut rng)),
            last_name: s(LastName().fake_with_rng::<String, _>(&mut rng)),
            middle_name: rng
                .gen_bool(0.3)
                .then(|| FirstName().fake_with_rng::<String, _>(&mut rng)),
            birth_date: s(date(&mut rng, birth_year)),
            gender: s(pick(&mut rng, &GENDERS)),
            address: Some(LegacyAddress {
                line1: s(format!(
                    "{} {}",
                    rng.gen_range(1..9999),
                    StreetName().fake_with_rng::<String, _>(&mut rng)
                )),
                city: s(CityName().fake_with_rng::<String, _>(&mut rng)),
                state_code: s(StateAbbr().fake_with_rng::<String, _>(&mut rng)),
                postal_code: s(ZipCode().fake_with_rng::<String, _>(&mut rng)),
                country: s("USA"),
                ..Default::default()
            }),
            contact: Some(LegacyContact {
                phone: s(PhoneNumber().fake_with_rng::<String, _>(&mut rng)),
                email: s(SafeEmail().fake_with_rng::<String, _>(&mut rng)),
            }),
            active: Some(rng.gen_bool(0.9)),
            deceased: None,
            preferred_language: s(pick(&mut rng, &LANGUAGES)),
            registration_date: s(date(&mut rng, registration_year)),
        });

        for e in 0..rng.gen_range(1..=3) {
            let encounter_id = format!("{patient_id}-E{e}");
            let year = rng.gen_range(2020..2024);
            let start = date(&mut rng, year);

            batch.encounters.push(LegacyEncounter {
                encounter_id: s(&encounter_id),
                patient_id: s(&patient_id),
                encounter_type: s(pick(&mut rng, &ENCOUNTER_TYPES)),
                status: s(pick(&mut rng, &ENCOUNTER_STATUSES)),
                provider: Some(LegacyProvider {
                    id: s(format!("DR{}", rng.gen_range(100..999))),
                    name: s(format!("Dr. {}", LastName().fake_with_rng::<String, _>(&mut rng))),
                    specialty: s("Internal Medicine"),
                }),
                discharge_date: rng.gen_bool(0.5).then(|| format!("{}-12-31", year)),
                encounter_date: s(start.clone()),
                chief_complaint: s("Routine follow-up"),
                diagnoses: Some(vec![LegacyDiagnosis {
                    diagnosis: s("Essential hypertension"),
                    code: s("I10"),
                    code_type: s("ICD-10"),
                }]),
                location: s("Main Campus"),
            });

            let results = (0..rng.gen_range(1..=3))
                .map(|_| {
                    let (component, _, unit) = *LAB_TESTS.choose(&mut rng).unwrap_or(&LAB_TESTS[0]);
                    LegacyResult {
                        component: s(component),
                        value: Some(LegacyValue::Number(
                            (rng.gen_range(10.0..200.0_f64) * 10.0).round() / 10.0,
                        )),
                        unit: s(unit),
                        reference_range: s("70-110"),
                        status: s(pick(&mut rng, &FLAGS)),
                    }
                })
                .collect();
            let (test_name, test_code, _) = *LAB_TESTS.choose(&mut rng).unwrap_or(&LAB_TESTS[0]);

            batch.observations.push(LegacyObservation {
                observation_id: s(format!("{encounter_id}-O")),
                patient_id: s(&patient_id),
                encounter_id: s(&encounter_id),
                test_name: s(test_name),
                test_code: s(test_code),
                observation_date: s(format!("{start}T09:30:00Z")),
                status: s("final"),
                performer: s("Central Lab"),
                results: Some(results),
            });

            batch.medications.push(LegacyMedication {
                medication_id: s(format!("{encounter_id}-M")),
                patient_id: s(&patient_id),
                encounter_id: s(&encounter_id),
                medication_name: s(pick(&mut rng, &MEDICATIONS)),
                dose: s(format!("{} mg", rng.gen_range(5..500))),
                route: s("oral"),
                frequency: s("once daily"),
                prescription_date: s(start),
                duration_days: Some(rng.gen_range(0..90)),
                refills: rng.gen_bool(0.5).then(|| rng.gen_range(0..5)),
                status: s(pick(&mut rng, &MEDICATION_STATUSES)),
                prescriber: s(format!("Dr. {}", LastName().fake_with_rng::<String, _>(&mut rng))),
            });
        }
    }

    batch
}

/// The single-patient batch used by the end-to-end scenario
pub fn jane_doe() -> LegacyBatch {
    LegacyBatch {
        patients: vec![LegacyPatient {
            patient_id: s("PT1"),
            gender: s("F"),
            first_name: s("Jane"),
            last_name: s("Doe"),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Writes a batch as the four legacy JSON collections
pub fn write_legacy_dir(dir: &Path, batch: &LegacyBatch) {
    fs::create_dir_all(dir).unwrap();
    let collections = [
        ("patients.json", serde_json::to_string(&batch.patients)),
        ("encounters.json", serde_json::to_string(&batch.encounters)),
        ("observations.json", serde_json::to_string(&batch.observations)),
        ("medications.json", serde_json::to_string(&batch.medications)),
    ];
    for (name, json) in collections {
        fs::write(dir.join(name), json.unwrap()).unwrap();
    }
}

/// Reads a JSON file written by the pipeline
pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
