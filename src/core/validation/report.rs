//! Validation report structures
//!
//! Aggregate statistics plus every per-resource result, serialized as
//! `validation_results.json`, and a plain-text summary for
//! `validation_summary.txt`.

use super::result::ValidationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate counts over a set of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatistics {
    /// Number of results
    pub total: usize,

    /// Results with no errors
    pub valid: usize,

    /// Results with at least one error
    pub invalid: usize,

    /// Valid results that carry warnings
    pub with_warnings: usize,

    /// When the report was produced
    pub validation_time: DateTime<Utc>,
}

/// Validation report for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub statistics: ValidationStatistics,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Builds a report stamped with the current time
    pub fn new(results: Vec<ValidationResult>) -> Self {
        Self::at(results, Utc::now())
    }

    /// Builds a report stamped with the given time
    pub fn at(results: Vec<ValidationResult>, validation_time: DateTime<Utc>) -> Self {
        let total = results.len();
        let valid = results.iter().filter(|r| r.is_valid).count();
        let with_warnings = results
            .iter()
            .filter(|r| r.is_valid && !r.warnings.is_empty())
            .count();

        Self {
            statistics: ValidationStatistics {
                total,
                valid,
                invalid: total - valid,
                with_warnings,
                validation_time,
            },
            results,
        }
    }

    /// Check if every resource is valid
    pub fn is_success(&self) -> bool {
        self.statistics.invalid == 0
    }

    /// Valid share of all results, as a percentage
    pub fn success_rate(&self) -> f64 {
        percentage(self.statistics.valid, self.statistics.total)
    }

    /// Format the report as the plain-text summary
    pub fn format_summary(&self) -> String {
        let stats = &self.statistics;
        let mut summary = String::new();

        summary.push_str("FHIR Validation Summary\n");
        summary.push_str("======================\n\n");
        summary.push_str(&format!(
            "Validation Time: {}\n\n",
            stats.validation_time.to_rfc3339()
        ));
        summary.push_str(&format!("Resources Validated: {}\n", stats.total));
        summary.push_str(&format!(
            "Valid Resources: {} ({:.1}%)\n",
            stats.valid,
            percentage(stats.valid, stats.total)
        ));
        summary.push_str(&format!(
            "Invalid Resources: {} ({:.1}%)\n",
            stats.invalid,
            percentage(stats.invalid, stats.total)
        ));
        summary.push_str(&format!(
            "Valid Resources with Warnings: {} ({:.1}% of valid)\n\n",
            stats.with_warnings,
            percentage(stats.with_warnings, stats.valid)
        ));

        let errors = self.tally(|r| !r.is_valid, |r| &r.errors);
        if !errors.is_empty() {
            summary.push_str("Common Errors:\n");
            write_tally(&mut summary, &errors);
        }

        let warnings = self.tally(|r| !r.warnings.is_empty(), |r| &r.warnings);
        if !warnings.is_empty() {
            summary.push_str("\nCommon Warnings:\n");
            write_tally(&mut summary, &warnings);
        }

        summary
    }

    /// Message occurrence counts per resource type
    ///
    /// Types keep first-seen order. Messages are sorted by count, most
    /// frequent first, ties in first-seen order.
    fn tally<'a>(
        &'a self,
        include: impl Fn(&ValidationResult) -> bool,
        messages: impl Fn(&'a ValidationResult) -> &'a Vec<String>,
    ) -> Vec<(&'a str, Vec<(&'a str, usize)>)> {
        let mut by_type: Vec<(&str, Vec<(&str, usize)>)> = Vec::new();

        for result in self.results.iter().filter(|r| include(*r)) {
            let position = match by_type
                .iter()
                .position(|(t, _)| *t == result.resource_type)
            {
                Some(i) => i,
                None => {
                    by_type.push((result.resource_type.as_str(), Vec::new()));
                    by_type.len() - 1
                }
            };

            let counts = &mut by_type[position].1;
            for message in messages(result) {
                match counts.iter_mut().find(|(m, _)| *m == message.as_str()) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((message.as_str(), 1)),
                }
            }
        }

        for (_, counts) in &mut by_type {
            counts.sort_by(|a, b| b.1.cmp(&a.1));
        }

        by_type
    }
}

fn write_tally(summary: &mut String, tally: &[(&str, Vec<(&str, usize)>)]) {
    for (resource_type, counts) in tally {
        summary.push_str(&format!("\n{resource_type}:\n"));
        for (message, count) in counts {
            summary.push_str(&format!("  - {message} ({count} occurrences)\n"));
        }
    }
}

/// Share of `part` in `whole`, zero when `whole` is zero
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<ValidationResult> {
        let ok = ValidationResult::new("Patient", "p1");

        let mut warned = ValidationResult::new("Observation", "o1");
        warned.add_warning("Observation should have a value[x], dataAbsentReason, or component");

        let mut bad_a = ValidationResult::new("Encounter", "e1");
        bad_a.add_error("Missing required field: subject");
        bad_a.add_error("Referenced Patient not found: p9");

        let mut bad_b = ValidationResult::new("Encounter", "e2");
        bad_b.add_error("Referenced Patient not found: p9");

        vec![ok, warned, bad_a, bad_b]
    }

    #[test]
    fn test_statistics() {
        let report = ValidationReport::new(sample());
        assert_eq!(report.statistics.total, 4);
        assert_eq!(report.statistics.valid, 2);
        assert_eq!(report.statistics.invalid, 2);
        assert_eq!(report.statistics.with_warnings, 1);
        assert!(!report.is_success());
        assert_eq!(report.success_rate(), 50.0);
    }

    #[test]
    fn test_serialized_shape() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(ValidationReport::at(sample(), time)).unwrap();

        assert_eq!(json["statistics"]["withWarnings"], 1);
        assert_eq!(json["statistics"]["validationTime"], "2024-05-01T12:00:00Z");
        assert_eq!(json["results"][2]["resourceType"], "Encounter");
        assert_eq!(json["results"][2]["isValid"], false);
    }

    #[test]
    fn test_format_summary() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let summary = ValidationReport::at(sample(), time).format_summary();

        assert!(summary.contains("Validation Time: 2024-05-01T12:00:00+00:00"));
        assert!(summary.contains("Resources Validated: 4"));
        assert!(summary.contains("Valid Resources: 2 (50.0%)"));
        assert!(summary.contains("Valid Resources with Warnings: 1 (50.0% of valid)"));

        let errors_at = summary.find("Common Errors:").unwrap();
        let warnings_at = summary.find("Common Warnings:").unwrap();
        assert!(errors_at < warnings_at);

        let most = summary
            .find("  - Referenced Patient not found: p9 (2 occurrences)")
            .unwrap();
        let least = summary
            .find("  - Missing required field: subject (1 occurrences)")
            .unwrap();
        assert!(most < least);
    }

    #[test]
    fn test_empty_report_has_no_division_by_zero() {
        let report = ValidationReport::new(Vec::new());
        let summary = report.format_summary();
        assert!(summary.contains("Valid Resources: 0 (0.0%)"));
        assert!(summary.contains("(0.0% of valid)"));
        assert!(!summary.contains("Common Errors"));
        assert!(report.is_success());
    }
}
