//! Structural rules applied to a single resource

use super::definitions::CompiledPatterns;
use super::result::ValidationResult;
use crate::domain::codes::{AdministrativeGender, ContactPointSystem, WireCode};
use crate::domain::ids::ReferenceTarget;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Text of a value as it appears in messages: strings verbatim, anything else as JSON
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Checks one date-bearing field path (`field` or `parent.child`)
///
/// Nested paths are only checked when the parent is an object holding the
/// child key. Null and empty values are tolerated.
pub(crate) fn check_date_field(
    resource: &Object,
    path: &str,
    patterns: &CompiledPatterns,
    result: &mut ValidationResult,
) {
    let value = match path.split_once('.') {
        Some((parent, child)) => resource
            .get(parent)
            .and_then(Value::as_object)
            .and_then(|p| p.get(child)),
        None => resource.get(path),
    };

    let invalid = match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) if s.is_empty() => false,
        Some(Value::String(s)) => !patterns.is_date_or_datetime(s),
        Some(_) => true,
    };

    if let (true, Some(value)) = (invalid, value) {
        result.add_error(format!(
            "Invalid date format in {path}: {}",
            display_value(value)
        ));
    }
}

/// Reference rule
///
/// Well-formed when the object carries a `reference` of the form
/// `<expected>/<id>` with a legal id, or lacks `reference` but carries a
/// `display` string.
pub(crate) fn is_valid_reference(
    value: &Value,
    expected_type: &str,
    patterns: &CompiledPatterns,
) -> bool {
    let Some(reference) = value.as_object() else {
        return false;
    };

    match reference.get("reference") {
        Some(Value::String(literal)) => match ReferenceTarget::parse(literal) {
            Some(target) => {
                target.resource_type == expected_type && patterns.id.is_match(target.id)
            }
            None => false,
        },
        Some(_) => false,
        None => reference.get("display").is_some_and(Value::is_string),
    }
}

fn check_subject(resource: &Object, patterns: &CompiledPatterns, result: &mut ValidationResult) {
    if let Some(subject) = resource.get("subject") {
        if !is_valid_reference(subject, "Patient", patterns) {
            result.add_error(format!("Invalid subject reference: {subject}"));
        }
    }
}

pub(crate) fn validate_patient(
    resource: &Object,
    patterns: &CompiledPatterns,
    result: &mut ValidationResult,
) {
    if let Some(gender) = resource.get("gender") {
        let legal = gender
            .as_str()
            .is_some_and(|g| AdministrativeGender::from_wire(g).is_some());
        if !legal {
            result.add_error(format!(
                "Invalid gender: {}. Must be one of: {}",
                display_value(gender),
                AdministrativeGender::wire_values().join(", ")
            ));
        }
    }

    let Some(telecom) = resource.get("telecom").and_then(Value::as_array) else {
        return;
    };

    for (i, entry) in telecom.iter().enumerate() {
        let system = entry.get("system");
        match system {
            None => result.add_error(format!("Missing system in telecom[{i}]")),
            Some(s) if s.as_str().and_then(ContactPointSystem::from_wire).is_none() => {
                result.add_error(format!(
                    "Invalid telecom system in telecom[{i}]: {}",
                    display_value(s)
                ));
            }
            Some(_) => {}
        }

        match entry.get("value") {
            None => result.add_error(format!("Missing value in telecom[{i}]")),
            Some(value) => {
                let is_email = system.and_then(Value::as_str) == Some("email");
                let well_formed = value.as_str().is_some_and(|v| patterns.email.is_match(v));
                if is_email && !well_formed {
                    result.add_error(format!(
                        "Invalid email format in telecom[{i}]: {}",
                        display_value(value)
                    ));
                }
            }
        }
    }
}

pub(crate) fn validate_encounter(
    resource: &Object,
    patterns: &CompiledPatterns,
    result: &mut ValidationResult,
) {
    check_subject(resource, patterns, result);

    let Some(period) = resource.get("period").and_then(Value::as_object) else {
        return;
    };

    if let (Some(start), Some(end)) = (
        period.get("start").and_then(Value::as_str),
        period.get("end").and_then(Value::as_str),
    ) {
        // Unparseable values are already reported by the date-format rule
        if let (Some(start_at), Some(end_at)) = (parse_instant(start), parse_instant(end)) {
            if end_at < start_at {
                result.add_error(format!("End date {end} is before start date {start}"));
            }
        }
    }
}

pub(crate) fn validate_observation(
    resource: &Object,
    patterns: &CompiledPatterns,
    result: &mut ValidationResult,
) {
    check_subject(resource, patterns, result);

    if let Some(code) = resource.get("code") {
        match code.get("coding").and_then(Value::as_array) {
            Some(codings) => {
                for (i, coding) in codings.iter().enumerate() {
                    if coding.get("system").is_none() {
                        result.add_warning(format!("Missing system in code.coding[{i}]"));
                    }
                    if coding.get("code").is_none() {
                        result.add_warning(format!("Missing code in code.coding[{i}]"));
                    }
                }
            }
            None if code.get("text").is_none() => {
                result.add_warning("Code should have either coding or text");
            }
            None => {}
        }
    }

    let has_value = resource
        .keys()
        .any(|key| key.starts_with("value") && key != "value");
    if !has_value && !resource.contains_key("dataAbsentReason") && !resource.contains_key("component")
    {
        result.add_warning("Observation should have a value[x], dataAbsentReason, or component");
    }
}

pub(crate) fn validate_medication_request(
    resource: &Object,
    patterns: &CompiledPatterns,
    result: &mut ValidationResult,
) {
    check_subject(resource, patterns, result);

    if !resource.contains_key("medicationCodeableConcept")
        && !resource.contains_key("medicationReference")
    {
        result.add_error(
            "MedicationRequest must have either medicationCodeableConcept or medicationReference",
        );
    }

    match resource.get("dosageInstruction") {
        Some(Value::Array(dosage)) if dosage.is_empty() => {
            result.add_warning("dosageInstruction is empty");
        }
        Some(Value::Array(_)) | None => {}
        Some(_) => result.add_error("dosageInstruction must be an array"),
    }
}

/// Parses a date or dateTime into an instant for ordering
///
/// Plain dates are midnight UTC, offset-less dateTimes are read as UTC.
/// Partial dates (year, year-month) do not parse.
pub(crate) fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
