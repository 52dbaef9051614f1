//! Transform command implementation
//!
//! Loads the legacy batch, narrows it with the extraction filter, maps it and
//! writes per-type resource files plus the transaction bundle.

use super::{load_or_report, report_failure};
use crate::adapters::filesystem;
use crate::config::EhrBridgeConfig;
use crate::core::extract::ExtractionFilter;
use crate::core::mapping::Mapper;
use crate::domain::ids::ResourceType;
use crate::domain::{ResourceCollections, Result};
use chrono::NaiveDate;
use clap::Args;

/// Extraction filter options shared by `transform` and `run`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only extract these patient IDs (repeatable or comma-separated)
    #[arg(long = "patient", value_delimiter = ',')]
    pub patients: Vec<String>,

    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

impl FilterArgs {
    /// Converts the options to an extraction filter
    ///
    /// # Errors
    ///
    /// Returns a message when a date is not `YYYY-MM-DD` or the range is reversed.
    pub fn to_filter(&self) -> std::result::Result<ExtractionFilter, String> {
        for date in [&self.start_date, &self.end_date].into_iter().flatten() {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date '{date}'. Expected YYYY-MM-DD"))?;
        }

        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            if start > end {
                return Err(format!("Start date {start} is after end date {end}"));
            }
        }

        Ok(ExtractionFilter {
            patient_ids: self.patients.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        })
    }
}

/// Arguments for the transform command
#[derive(Args, Debug)]
pub struct TransformArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Override the legacy input directory
    #[arg(long)]
    pub input_dir: Option<String>,

    /// Override the FHIR output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl TransformArgs {
    /// Execute the transform command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting transform command");

        let mut config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        if let Some(dir) = &self.input_dir {
            config.source.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.fhir_dir = dir.clone();
        }

        let filter = match self.filter.to_filter() {
            Ok(filter) => filter,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        println!("🔄 Transforming legacy data from {}", config.source.input_dir);

        let collections = match transform_batch(&config, &filter) {
            Ok(collections) => collections,
            Err(e) => return Ok(report_failure(&e, "Transform failed")),
        };

        if let Err(e) = save_collections(&config, &collections) {
            return Ok(report_failure(&e, "Failed to write FHIR resources"));
        }

        print_mapping_summary(&collections);
        println!("✅ Resources written to {}", config.output.fhir_dir);
        Ok(0)
    }
}

/// Loads, filters and maps the configured legacy batch
pub(crate) fn transform_batch(
    config: &EhrBridgeConfig,
    filter: &ExtractionFilter,
) -> Result<ResourceCollections> {
    let mapper = Mapper::from_config(config)?;
    let batch = filesystem::load_legacy_batch(&config.source.input_dir)?;
    let batch = filter.apply(&batch);
    mapper.map_batch(&batch)
}

/// Writes per-type files and the bundle to the configured output directory
pub(crate) fn save_collections(
    config: &EhrBridgeConfig,
    collections: &ResourceCollections,
) -> Result<()> {
    filesystem::write_resources(&config.output.fhir_dir, collections)?;
    filesystem::write_bundle(&config.output.fhir_dir, &collections.to_bundle())?;
    Ok(())
}

pub(crate) fn print_mapping_summary(collections: &ResourceCollections) {
    println!();
    println!("📊 Mapping Summary:");
    for resource_type in ResourceType::ALL {
        println!("  {}: {}", resource_type, collections.count(resource_type));
    }
    println!("  Total: {}", collections.total());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_default_is_empty_filter() {
        let filter = FilterArgs::default().to_filter().unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_args_rejects_bad_dates() {
        let args = FilterArgs {
            start_date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(args.to_filter().is_err());

        let args = FilterArgs {
            start_date: Some("2024-06-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(args.to_filter().unwrap_err().contains("after end date"));
    }

    #[test]
    fn test_filter_args_carry_patients() {
        let args = FilterArgs {
            patients: vec!["PT1".to_string(), "PT2".to_string()],
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter.patient_ids, vec!["PT1", "PT2"]);
        assert_eq!(filter.start_date.as_deref(), Some("2024-01-01"));
    }
}
