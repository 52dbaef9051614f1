//! Resource-definition tables
//!
//! Required fields, closed value sets, date-bearing fields and syntax patterns
//! per resource type. The validator is constructed from one of these and
//! refuses to start when the tables do not cover every supported type.

use crate::domain::codes::{
    EncounterStatus, MedicationRequestIntent, MedicationRequestStatus, ObservationStatus,
    WireCode,
};
use crate::domain::ids::ResourceType;
use crate::domain::{BridgeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier syntax: 1 to 64 letters, digits, hyphens or periods
pub const ID_PATTERN: &str = r"^[A-Za-z0-9\-\.]{1,64}$";

/// FHIR `date` syntax (year, year-month or full date)
pub const DATE_PATTERN: &str = r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$";

/// FHIR `dateTime` syntax
pub const DATETIME_PATTERN: &str = r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$";

/// Email address syntax
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Allowed values for one top-level coded field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSetRule {
    pub resource_type: String,
    pub field: String,
    pub allowed: Vec<String>,
}

impl ValueSetRule {
    fn of<C: WireCode>(resource_type: ResourceType, field: &str) -> Self {
        Self {
            resource_type: resource_type.as_str().to_string(),
            field: field.to_string(),
            allowed: C::wire_values().into_iter().map(str::to_string).collect(),
        }
    }
}

/// Source text of the syntax patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxPatterns {
    pub id: String,
    pub date: String,
    pub datetime: String,
    pub email: String,
}

impl Default for SyntaxPatterns {
    fn default() -> Self {
        Self {
            id: ID_PATTERN.to_string(),
            date: DATE_PATTERN.to_string(),
            datetime: DATETIME_PATTERN.to_string(),
            email: EMAIL_PATTERN.to_string(),
        }
    }
}

/// Validation tables for every supported resource type
///
/// Can be deserialized from JSON to replace the built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinitions {
    pub required_fields: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub value_sets: Vec<ValueSetRule>,
    #[serde(default)]
    pub date_fields: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub patterns: SyntaxPatterns,
}

impl Default for ResourceDefinitions {
    fn default() -> Self {
        let required = |extra: &[&str]| -> Vec<String> {
            ["resourceType", "id"]
                .iter()
                .chain(extra)
                .map(|f| f.to_string())
                .collect()
        };

        let required_fields = HashMap::from([
            (ResourceType::Patient.to_string(), required(&[])),
            (
                ResourceType::Encounter.to_string(),
                required(&["status", "subject"]),
            ),
            (
                ResourceType::Observation.to_string(),
                required(&["status", "code", "subject"]),
            ),
            (
                ResourceType::MedicationRequest.to_string(),
                required(&["status", "intent", "subject"]),
            ),
        ]);

        let value_sets = vec![
            ValueSetRule::of::<EncounterStatus>(ResourceType::Encounter, "status"),
            ValueSetRule::of::<ObservationStatus>(ResourceType::Observation, "status"),
            ValueSetRule::of::<MedicationRequestStatus>(ResourceType::MedicationRequest, "status"),
            ValueSetRule::of::<MedicationRequestIntent>(ResourceType::MedicationRequest, "intent"),
        ];

        let fields = |names: &[&str]| -> Vec<String> { names.iter().map(|f| f.to_string()).collect() };
        let date_fields = HashMap::from([
            (ResourceType::Patient.to_string(), fields(&["birthDate"])),
            (
                ResourceType::Encounter.to_string(),
                fields(&["period.start", "period.end"]),
            ),
            (
                ResourceType::Observation.to_string(),
                fields(&["effectiveDateTime", "issued"]),
            ),
            (
                ResourceType::MedicationRequest.to_string(),
                fields(&["authoredOn"]),
            ),
        ]);

        Self {
            required_fields,
            value_sets,
            date_fields,
            patterns: SyntaxPatterns::default(),
        }
    }
}

impl ResourceDefinitions {
    /// Parses definitions from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| BridgeError::Definitions(format!("Invalid definitions document: {e}")))
    }

    /// Checks that every supported resource type has required-field entries
    pub fn check_complete(&self) -> Result<()> {
        let missing: Vec<&str> = ResourceType::ALL
            .iter()
            .map(|rt| rt.as_str())
            .filter(|rt| !self.required_fields.contains_key(*rt))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::Definitions(format!(
                "No required-field definitions for: {}",
                missing.join(", ")
            )))
        }
    }

    /// Returns true when the type has a required-field entry
    pub fn supports(&self, resource_type: &str) -> bool {
        self.required_fields.contains_key(resource_type)
    }

    /// Required fields for a type, empty when unsupported
    pub fn required_for(&self, resource_type: &str) -> &[String] {
        self.required_fields
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Value-set rules for a type, in declaration order
    pub fn value_sets_for<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a ValueSetRule> + 'a {
        self.value_sets
            .iter()
            .filter(move |rule| rule.resource_type == resource_type)
    }

    /// Date-bearing field paths for a type
    pub fn date_fields_for(&self, resource_type: &str) -> &[String] {
        self.date_fields
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Compiled form of [`SyntaxPatterns`]
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub id: Regex,
    pub date: Regex,
    pub datetime: Regex,
    pub email: Regex,
}

impl CompiledPatterns {
    /// Compiles every pattern
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Definitions`] naming the pattern that failed.
    pub fn compile(patterns: &SyntaxPatterns) -> Result<Self> {
        let compile = |name: &str, source: &str| {
            Regex::new(source).map_err(|e| {
                BridgeError::Definitions(format!("Invalid {name} pattern: {e}"))
            })
        };

        Ok(Self {
            id: compile("id", &patterns.id)?,
            date: compile("date", &patterns.date)?,
            datetime: compile("datetime", &patterns.datetime)?,
            email: compile("email", &patterns.email)?,
        })
    }

    /// True for a legal date or dateTime value
    pub fn is_date_or_datetime(&self, value: &str) -> bool {
        self.date.is_match(value) || self.datetime.is_match(value)
    }
}
