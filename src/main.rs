// ehrbridge - Legacy EHR to FHIR R4 Mapper and Validator
// Copyright (c) 2025 ehrbridge Contributors
// Licensed under the MIT License

use clap::Parser;
use ehrbridge::cli::{Cli, Commands};
use ehrbridge::config::{load_config, EhrBridgeConfig};
use ehrbridge::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report a broken or missing file themselves
    let config = match &cli.command {
        Commands::Init(_) => EhrBridgeConfig::default(),
        _ => load_config(&cli.config).unwrap_or_default(),
    };
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.application.log_level);

    let guard = match init_logging(log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "ehrbridge - Legacy EHR to FHIR R4"
    );

    let exit_code = match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}
