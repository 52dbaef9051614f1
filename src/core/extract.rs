//! Legacy batch extraction filter
//!
//! Narrows a loaded [`LegacyBatch`] by patient identifier and/or date range
//! before mapping. Related records follow their patients: encounters are kept
//! only for surviving patients, and observations and medications only for
//! surviving patients and encounters.
//!
//! Dates are compared as ISO-8601 strings. When a bound is set, a record
//! without the relevant date is dropped.

use crate::domain::legacy::{non_empty, LegacyBatch, LegacyKind};
use std::collections::HashSet;

/// Identifier and date-range filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionFilter {
    /// Keep only these patients (all when empty)
    pub patient_ids: Vec<String>,

    /// Inclusive lower bound
    pub start_date: Option<String>,

    /// Inclusive upper bound
    pub end_date: Option<String>,
}

impl ExtractionFilter {
    /// Returns true when the filter keeps everything
    pub fn is_empty(&self) -> bool {
        self.patient_ids.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    fn has_date_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Date-range check for one record
    fn in_range(&self, date: &Option<String>) -> bool {
        if !self.has_date_bounds() {
            return true;
        }
        let Some(date) = non_empty(date) else {
            return false;
        };

        let after_start = self.start_date.as_deref().map_or(true, |start| date >= start);
        let before_end = self.end_date.as_deref().map_or(true, |end| date <= end);
        after_start && before_end
    }

    /// Applies the filter, returning the surviving records
    pub fn apply(&self, batch: &LegacyBatch) -> LegacyBatch {
        if self.is_empty() {
            return batch.clone();
        }

        let requested: HashSet<&str> = self.patient_ids.iter().map(String::as_str).collect();

        let patients: Vec<_> = batch
            .patients
            .iter()
            .filter(|p| {
                requested.is_empty()
                    || non_empty(&p.patient_id).is_some_and(|id| requested.contains(id))
            })
            .filter(|p| self.in_range(&p.registration_date))
            .cloned()
            .collect();

        if patients.is_empty() {
            tracing::warn!("No patients found matching criteria");
            return LegacyBatch::default();
        }

        let patient_ids: HashSet<&str> = patients
            .iter()
            .filter_map(|p| non_empty(&p.patient_id))
            .collect();
        let belongs = |patient_id: &Option<String>| {
            non_empty(patient_id).is_some_and(|id| patient_ids.contains(id))
        };

        let encounters: Vec<_> = batch
            .encounters
            .iter()
            .filter(|e| belongs(&e.patient_id) && self.in_range(&e.encounter_date))
            .cloned()
            .collect();

        let encounter_ids: HashSet<&str> = encounters
            .iter()
            .filter_map(|e| non_empty(&e.encounter_id))
            .collect();
        let during = |encounter_id: &Option<String>| {
            non_empty(encounter_id).is_some_and(|id| encounter_ids.contains(id))
        };

        let observations = batch
            .observations
            .iter()
            .filter(|o| {
                belongs(&o.patient_id)
                    && during(&o.encounter_id)
                    && self.in_range(&o.observation_date)
            })
            .cloned()
            .collect();

        let medications = batch
            .medications
            .iter()
            .filter(|m| {
                belongs(&m.patient_id)
                    && during(&m.encounter_id)
                    && self.in_range(&m.prescription_date)
            })
            .cloned()
            .collect();

        let extracted = LegacyBatch {
            patients,
            encounters,
            observations,
            medications,
        };

        for kind in LegacyKind::ALL {
            tracing::info!(
                kind = %kind,
                kept = extracted.count(kind),
                loaded = batch.count(kind),
                "Extraction filter applied"
            );
        }

        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::legacy::{LegacyEncounter, LegacyMedication, LegacyObservation, LegacyPatient};

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn batch() -> LegacyBatch {
        LegacyBatch {
            patients: vec![
                LegacyPatient {
                    patient_id: s("PT1"),
                    registration_date: s("2023-01-15"),
                    ..Default::default()
                },
                LegacyPatient {
                    patient_id: s("PT2"),
                    registration_date: s("2024-06-01"),
                    ..Default::default()
                },
                LegacyPatient {
                    patient_id: s("PT3"),
                    ..Default::default()
                },
            ],
            encounters: vec![
                LegacyEncounter {
                    encounter_id: s("E1"),
                    patient_id: s("PT1"),
                    encounter_date: s("2023-03-01"),
                    ..Default::default()
                },
                LegacyEncounter {
                    encounter_id: s("E2"),
                    patient_id: s("PT2"),
                    encounter_date: s("2024-07-01"),
                    ..Default::default()
                },
            ],
            observations: vec![
                LegacyObservation {
                    observation_id: s("O1"),
                    patient_id: s("PT1"),
                    encounter_id: s("E1"),
                    observation_date: s("2023-03-01T09:00:00Z"),
                    ..Default::default()
                },
                LegacyObservation {
                    observation_id: s("O2"),
                    patient_id: s("PT1"),
                    ..Default::default()
                },
            ],
            medications: vec![LegacyMedication {
                medication_id: s("M2"),
                patient_id: s("PT2"),
                encounter_id: s("E2"),
                prescription_date: s("2024-07-01"),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ExtractionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&batch()), batch());
    }

    #[test]
    fn test_patient_filter_follows_related_records() {
        let filter = ExtractionFilter {
            patient_ids: vec!["PT2".to_string()],
            ..Default::default()
        };
        let extracted = filter.apply(&batch());

        assert_eq!(extracted.patients.len(), 1);
        assert_eq!(extracted.encounters[0].encounter_id, s("E2"));
        assert!(extracted.observations.is_empty());
        assert_eq!(extracted.medications.len(), 1);
    }

    #[test]
    fn test_date_range_drops_undated_records() {
        let filter = ExtractionFilter {
            start_date: Some("2023-01-01".to_string()),
            end_date: Some("2023-12-31".to_string()),
            ..Default::default()
        };
        let extracted = filter.apply(&batch());

        let ids: Vec<_> = extracted.patients.iter().map(|p| p.patient_id.clone()).collect();
        assert_eq!(ids, vec![s("PT1")]);
        assert_eq!(extracted.encounters.len(), 1);
        assert_eq!(extracted.observations.len(), 1);
        assert!(extracted.medications.is_empty());
    }

    #[test]
    fn test_no_matching_patient_yields_empty_batch() {
        let filter = ExtractionFilter {
            patient_ids: vec!["NOPE".to_string()],
            ..Default::default()
        };
        assert_eq!(filter.apply(&batch()).total(), 0);
    }
}
