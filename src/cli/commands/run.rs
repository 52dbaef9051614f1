//! Run command implementation
//!
//! Transform followed by validation of the freshly mapped resources, without
//! re-reading them from disk.

use super::transform::{print_mapping_summary, save_collections, transform_batch, FilterArgs};
use super::validate::{finish_report, validate_resources};
use super::{load_or_report, report_failure};
use crate::core::validation::ResourceSet;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Check references between resources after structural validation
    #[arg(long)]
    pub cross_validate: bool,

    /// Stop at the first invalid resource
    #[arg(long)]
    pub fail_fast: bool,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };
        config.validation.cross_validate |= self.cross_validate;
        config.validation.fail_fast |= self.fail_fast;

        let filter = match self.filter.to_filter() {
            Ok(filter) => filter,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        println!("🚀 Running pipeline on {}", config.source.input_dir);

        let collections = match transform_batch(&config, &filter) {
            Ok(collections) => collections,
            Err(e) => return Ok(report_failure(&e, "Transform failed")),
        };
        if let Err(e) = save_collections(&config, &collections) {
            return Ok(report_failure(&e, "Failed to write FHIR resources"));
        }
        print_mapping_summary(&collections);

        let report = match ResourceSet::from_collections(&collections)
            .and_then(|resources| validate_resources(&config, &resources))
        {
            Ok(report) => report,
            Err(e) => return Ok(report_failure(&e, "Validation failed")),
        };

        Ok(finish_report(&config, &report))
    }
}
