//! Legacy EHR entity models
//!
//! The legacy store exports four flat-to-shallow record kinds. Every attribute
//! is optional: records are weakly typed and the mapper decides what a missing
//! value means. Unknown keys (insurance blocks, free-text notes and so on) are
//! ignored on load, and a field of the wrong JSON type is coerced or dropped
//! rather than rejecting the record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four legacy entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyKind {
    /// Patient demographics
    Patient,
    /// Visit / admission
    Encounter,
    /// Laboratory test with optional per-component results
    Observation,
    /// Prescription
    Medication,
}

impl LegacyKind {
    /// All kinds, in load order
    pub const ALL: [LegacyKind; 4] = [
        LegacyKind::Patient,
        LegacyKind::Encounter,
        LegacyKind::Observation,
        LegacyKind::Medication,
    ];

    /// Collection name used for the on-disk file (`<name>.json`)
    pub fn collection_name(&self) -> &'static str {
        match self {
            LegacyKind::Patient => "patients",
            LegacyKind::Encounter => "encounters",
            LegacyKind::Observation => "observations",
            LegacyKind::Medication => "medications",
        }
    }
}

impl fmt::Display for LegacyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Returns the string when it is present and non-empty
///
/// Legacy exports use `""` and a missing key interchangeably.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Field deserializers that accept the loose typing of legacy exports
///
/// A value of the wrong shape becomes `None` with a warning instead of
/// failing the whole collection.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings as-is; numbers and booleans in their JSON text form
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                tracing::warn!(value = %other, "Ignoring legacy text field that is not a scalar");
                None
            }
        })
    }

    /// Non-negative whole numbers, given as integers, integral floats or numeric strings
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Null => return Ok(None),
            Value::Number(n) => whole(n.as_f64()),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<u32>().ok().or_else(|| whole(s.parse::<f64>().ok()))
            }
            _ => None,
        };

        if parsed.is_none() {
            tracing::warn!(value = %value, "Ignoring legacy count that is not a whole number");
        }
        Ok(parsed)
    }

    fn whole(number: Option<f64>) -> Option<u32> {
        number
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    /// Booleans, or the strings `true` / `false` in any case
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Null => return Ok(None),
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            tracing::warn!(value = %value, "Ignoring legacy flag that is not a boolean");
        }
        Ok(parsed)
    }

    /// Nested blocks; a block of the wrong shape is dropped
    pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }

        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed legacy block");
                Ok(None)
            }
        }
    }
}

/// Legacy patient record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyPatient {
    #[serde(deserialize_with = "lenient::text")]
    pub patient_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mrn: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub middle_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub birth_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub address: Option<LegacyAddress>,
    #[serde(deserialize_with = "lenient::record")]
    pub contact: Option<LegacyContact>,
    #[serde(deserialize_with = "lenient::flag")]
    pub active: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub deceased: Option<bool>,
    #[serde(deserialize_with = "lenient::text")]
    pub preferred_language: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub registration_date: Option<String>,
}

/// Postal address block on a legacy patient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyAddress {
    #[serde(deserialize_with = "lenient::text")]
    pub line1: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub line2: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub state_code: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub country: Option<String>,
}

/// Contact block on a legacy patient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyContact {
    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
}

/// Legacy encounter record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyEncounter {
    #[serde(deserialize_with = "lenient::text")]
    pub encounter_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub patient_id: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub encounter_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub provider: Option<LegacyProvider>,
    #[serde(deserialize_with = "lenient::text")]
    pub encounter_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub discharge_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub chief_complaint: Option<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub diagnoses: Option<Vec<LegacyDiagnosis>>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
}

/// Attending provider on a legacy encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProvider {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub specialty: Option<String>,
}

/// One diagnosis on a legacy encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDiagnosis {
    #[serde(deserialize_with = "lenient::text")]
    pub diagnosis: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub code: Option<String>,
    /// Code system tag, `ICD-9` or `ICD-10`
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub code_type: Option<String>,
}

/// Legacy laboratory observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyObservation {
    #[serde(deserialize_with = "lenient::text")]
    pub observation_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub patient_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub encounter_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub test_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub test_code: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub observation_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub performer: Option<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub results: Option<Vec<LegacyResult>>,
}

/// One component result within a legacy observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyResult {
    #[serde(deserialize_with = "lenient::text")]
    pub component: Option<String>,
    pub value: Option<LegacyValue>,
    #[serde(deserialize_with = "lenient::text")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub reference_range: Option<String>,
    /// Flag such as `high`, `low`, `abnormal` or `normal`
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

/// A result value as the legacy store wrote it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LegacyValue {
    /// Interprets the value as a finite number, parsing text when needed
    pub fn as_number(&self) -> Option<f64> {
        let parsed = match self {
            LegacyValue::Number(n) => Some(*n),
            LegacyValue::Text(s) => s.trim().parse::<f64>().ok(),
            LegacyValue::Other(_) => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    /// Verbatim text form of the value
    pub fn as_text(&self) -> String {
        match self {
            LegacyValue::Number(n) => n.to_string(),
            LegacyValue::Text(s) => s.clone(),
            LegacyValue::Other(v) => v.to_string(),
        }
    }
}

/// Legacy prescription record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyMedication {
    #[serde(deserialize_with = "lenient::text")]
    pub medication_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub patient_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub encounter_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub medication_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub dose: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub route: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub frequency: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub prescription_date: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub duration_days: Option<u32>,
    #[serde(deserialize_with = "lenient::count")]
    pub refills: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub prescriber: Option<String>,
}

/// One batch of legacy entities, grouped by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyBatch {
    pub patients: Vec<LegacyPatient>,
    pub encounters: Vec<LegacyEncounter>,
    pub observations: Vec<LegacyObservation>,
    pub medications: Vec<LegacyMedication>,
}

impl LegacyBatch {
    /// Number of entities of the given kind
    pub fn count(&self, kind: LegacyKind) -> usize {
        match kind {
            LegacyKind::Patient => self.patients.len(),
            LegacyKind::Encounter => self.encounters.len(),
            LegacyKind::Observation => self.observations.len(),
            LegacyKind::Medication => self.medications.len(),
        }
    }

    /// Total number of entities across all kinds
    pub fn total(&self) -> usize {
        LegacyKind::ALL.iter().map(|k| self.count(*k)).sum()
    }
}
