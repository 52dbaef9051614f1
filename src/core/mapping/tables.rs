//! Legacy-code lookup tables
//!
//! Built once per [`Mapper`](super::Mapper) and never mutated afterwards.
//! Configuration can add or replace entries in the gender, encounter-status,
//! medication-status and language tables before the mapper is constructed.

use crate::config::MappingConfig;
use crate::domain::codes::{
    AdministrativeGender, EncounterClass, EncounterStatus, Interpretation,
    MedicationRequestStatus, ObservationStatus,
};
use crate::domain::{BridgeError, Result};
use std::collections::HashMap;
use std::str::FromStr;

/// BCP-47 code used when a language name is not in the table
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Immutable legacy → standard code dictionaries
#[derive(Debug, Clone)]
pub struct MappingTables {
    gender: HashMap<String, AdministrativeGender>,
    encounter_status: HashMap<String, EncounterStatus>,
    observation_status: HashMap<String, ObservationStatus>,
    medication_status: HashMap<String, MedicationRequestStatus>,
    language: HashMap<String, String>,
    encounter_class: HashMap<String, EncounterClass>,
    interpretation: HashMap<String, Interpretation>,
}

impl Default for MappingTables {
    fn default() -> Self {
        let gender = [
            ("M", AdministrativeGender::Male),
            ("F", AdministrativeGender::Female),
            ("U", AdministrativeGender::Unknown),
            ("O", AdministrativeGender::Other),
        ];

        let encounter_status = [
            ("completed", EncounterStatus::Finished),
            ("in-progress", EncounterStatus::InProgress),
            ("cancelled", EncounterStatus::Cancelled),
            ("entered-in-error", EncounterStatus::EnteredInError),
        ];

        let observation_status = [
            ("final", ObservationStatus::Final),
            ("preliminary", ObservationStatus::Preliminary),
            ("corrected", ObservationStatus::Corrected),
            ("cancelled", ObservationStatus::Cancelled),
            ("entered-in-error", ObservationStatus::EnteredInError),
        ];

        let medication_status = [
            ("active", MedicationRequestStatus::Active),
            ("completed", MedicationRequestStatus::Completed),
            ("cancelled", MedicationRequestStatus::Stopped),
            ("on-hold", MedicationRequestStatus::OnHold),
        ];

        let language = [
            ("English", "en"),
            ("Spanish", "es"),
            ("French", "fr"),
            ("German", "de"),
            ("Chinese", "zh"),
            ("Japanese", "ja"),
            ("Korean", "ko"),
            ("Russian", "ru"),
            ("Arabic", "ar"),
            ("Hindi", "hi"),
            ("Portuguese", "pt"),
        ];

        let encounter_class = [
            ("Office Visit", EncounterClass::Ambulatory),
            ("Outpatient", EncounterClass::Ambulatory),
            ("Ambulatory", EncounterClass::Ambulatory),
            ("Urgent Care", EncounterClass::Ambulatory),
            ("Hospital Encounter", EncounterClass::Inpatient),
            ("Inpatient", EncounterClass::Inpatient),
            ("Emergency", EncounterClass::Emergency),
            ("Surgery", EncounterClass::ShortStay),
            ("Telehealth", EncounterClass::Virtual),
            ("Virtual", EncounterClass::Virtual),
            ("Home Visit", EncounterClass::HomeHealth),
            ("Nursing Home", EncounterClass::NonAcute),
            ("Skilled Nursing", EncounterClass::NonAcute),
        ];

        let interpretation = [
            ("high", Interpretation::High),
            ("low", Interpretation::Low),
            ("abnormal", Interpretation::Abnormal),
        ];

        Self {
            gender: owned(&gender),
            encounter_status: owned(&encounter_status),
            observation_status: owned(&observation_status),
            medication_status: owned(&medication_status),
            language: language
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            encounter_class: owned(&encounter_class),
            interpretation: owned(&interpretation),
        }
    }
}

fn owned<V: Copy>(entries: &[(&str, V)]) -> HashMap<String, V> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn merge<V: FromStr<Err = String>>(
    table: &mut HashMap<String, V>,
    overrides: &HashMap<String, String>,
    section: &str,
) -> Result<()> {
    for (legacy, standard) in overrides {
        let code = V::from_str(standard).map_err(|e| {
            BridgeError::Configuration(format!("mapping.{section}.{legacy}: {e}"))
        })?;
        table.insert(legacy.clone(), code);
    }
    Ok(())
}

impl MappingTables {
    /// Builds the default tables with configured overrides merged in
    pub fn from_config(config: &MappingConfig) -> Result<Self> {
        let mut tables = Self::default();

        merge(&mut tables.gender, &config.gender, "gender")?;
        merge(
            &mut tables.encounter_status,
            &config.encounter_status,
            "encounter_status",
        )?;
        merge(
            &mut tables.medication_status,
            &config.medication_status,
            "medication_status",
        )?;
        for (name, code) in &config.language {
            tables.language.insert(name.clone(), code.clone());
        }

        Ok(tables)
    }

    /// Legacy gender code; absent is treated as `U`
    pub fn gender(&self, code: Option<&str>) -> AdministrativeGender {
        self.gender
            .get(code.unwrap_or("U"))
            .copied()
            .unwrap_or(AdministrativeGender::Unknown)
    }

    /// Legacy encounter status, default `unknown`
    pub fn encounter_status(&self, status: Option<&str>) -> EncounterStatus {
        status
            .and_then(|s| self.encounter_status.get(s))
            .copied()
            .unwrap_or(EncounterStatus::Unknown)
    }

    /// Legacy observation status: absent means `final`, unrecognized means `unknown`
    pub fn observation_status(&self, status: Option<&str>) -> ObservationStatus {
        match status {
            None => ObservationStatus::Final,
            Some(s) => self
                .observation_status
                .get(s)
                .copied()
                .unwrap_or(ObservationStatus::Unknown),
        }
    }

    /// Legacy medication status, default `active`
    pub fn medication_status(&self, status: Option<&str>) -> MedicationRequestStatus {
        status
            .and_then(|s| self.medication_status.get(s))
            .copied()
            .unwrap_or(MedicationRequestStatus::Active)
    }

    /// Language name to BCP-47 code, default `en`
    pub fn language_code(&self, language: &str) -> &str {
        self.language
            .get(language)
            .map(String::as_str)
            .unwrap_or(DEFAULT_LANGUAGE_CODE)
    }

    /// Encounter type to act class, default ambulatory
    pub fn encounter_class(&self, encounter_type: Option<&str>) -> EncounterClass {
        encounter_type
            .and_then(|t| self.encounter_class.get(t))
            .copied()
            .unwrap_or(EncounterClass::Ambulatory)
    }

    /// Result flag to interpretation, anything unlisted is normal
    pub fn interpretation(&self, flag: &str) -> Interpretation {
        self.interpretation
            .get(flag)
            .copied()
            .unwrap_or(Interpretation::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("M"), AdministrativeGender::Male ; "male")]
    #[test_case(Some("F"), AdministrativeGender::Female ; "female")]
    #[test_case(Some("O"), AdministrativeGender::Other ; "other")]
    #[test_case(Some("U"), AdministrativeGender::Unknown ; "explicit unknown")]
    #[test_case(Some("X"), AdministrativeGender::Unknown ; "unrecognized")]
    #[test_case(Some("m"), AdministrativeGender::Unknown ; "case sensitive")]
    #[test_case(None, AdministrativeGender::Unknown ; "absent")]
    fn test_gender(code: Option<&str>, expected: AdministrativeGender) {
        assert_eq!(MappingTables::default().gender(code), expected);
    }

    #[test_case(Some("completed"), EncounterStatus::Finished)]
    #[test_case(Some("in-progress"), EncounterStatus::InProgress)]
    #[test_case(Some("scheduled"), EncounterStatus::Unknown)]
    #[test_case(None, EncounterStatus::Unknown)]
    fn test_encounter_status(status: Option<&str>, expected: EncounterStatus) {
        assert_eq!(MappingTables::default().encounter_status(status), expected);
    }

    #[test]
    fn test_observation_status_defaults() {
        let tables = MappingTables::default();
        assert_eq!(tables.observation_status(None), ObservationStatus::Final);
        assert_eq!(
            tables.observation_status(Some("corrected")),
            ObservationStatus::Corrected
        );
        assert_eq!(
            tables.observation_status(Some("amended")),
            ObservationStatus::Unknown
        );
    }

    #[test]
    fn test_medication_status() {
        let tables = MappingTables::default();
        assert_eq!(
            tables.medication_status(Some("cancelled")),
            MedicationRequestStatus::Stopped
        );
        assert_eq!(
            tables.medication_status(Some("paused")),
            MedicationRequestStatus::Active
        );
        assert_eq!(tables.medication_status(None), MedicationRequestStatus::Active);
    }

    #[test]
    fn test_language_and_class_defaults() {
        let tables = MappingTables::default();
        assert_eq!(tables.language_code("Korean"), "ko");
        assert_eq!(tables.language_code("Klingon"), "en");
        assert_eq!(
            tables.encounter_class(Some("Skilled Nursing")),
            EncounterClass::NonAcute
        );
        assert_eq!(
            tables.encounter_class(Some("Walk-in")),
            EncounterClass::Ambulatory
        );
        assert_eq!(tables.encounter_class(None), EncounterClass::Ambulatory);
    }

    #[test]
    fn test_interpretation() {
        let tables = MappingTables::default();
        assert_eq!(tables.interpretation("high"), Interpretation::High);
        assert_eq!(tables.interpretation("critical"), Interpretation::Normal);
    }

    #[test]
    fn test_overrides_merge() {
        let mut config = MappingConfig::default();
        config.gender.insert("W".to_string(), "female".to_string());
        config
            .encounter_status
            .insert("scheduled".to_string(), "planned".to_string());
        config.language.insert("Dutch".to_string(), "nl".to_string());

        let tables = MappingTables::from_config(&config).unwrap();
        assert_eq!(tables.gender(Some("W")), AdministrativeGender::Female);
        assert_eq!(tables.gender(Some("M")), AdministrativeGender::Male);
        assert_eq!(
            tables.encounter_status(Some("scheduled")),
            EncounterStatus::Planned
        );
        assert_eq!(tables.language_code("Dutch"), "nl");
    }

    #[test]
    fn test_override_with_illegal_code_is_rejected() {
        let mut config = MappingConfig::default();
        config
            .medication_status
            .insert("paused".to_string(), "sleeping".to_string());

        let err = MappingTables::from_config(&config).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
        assert!(err.to_string().contains("mapping.medication_status.paused"));
    }
}
