//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for ehrbridge using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// ehrbridge - Legacy EHR to FHIR R4 mapper and validator
#[derive(Parser, Debug)]
#[command(name = "ehrbridge")]
#[command(version, about, long_about = None)]
#[command(author = "ehrbridge Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ehrbridge.toml", env = "EHRBRIDGE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EHRBRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map legacy records to FHIR resources and write them to disk
    Transform(commands::transform::TransformArgs),

    /// Validate FHIR resources on disk and write a report
    Validate(commands::validate::ValidateArgs),

    /// Transform, then validate the mapped resources
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::check_config::CheckConfigArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the selected command, returning the process exit code
    pub fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Transform(args) => args.execute(&self.config),
            Commands::Validate(args) => args.execute(&self.config),
            Commands::Run(args) => args.execute(&self.config),
            Commands::ValidateConfig(args) => args.execute(&self.config),
            Commands::Init(args) => args.execute(),
        }
    }
}
