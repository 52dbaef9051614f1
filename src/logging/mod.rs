//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and optional
//! JSON log files. The macros below give batch milestones a consistent shape
//! so they can be filtered on their fields.
//!
//! # Example
//!
//! ```no_run
//! use ehrbridge::logging::init_logging;
//! use ehrbridge::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of a batch mapping
///
/// # Example
///
/// ```no_run
/// use ehrbridge::log_batch_mapped;
///
/// log_batch_mapped!(3, 5, 12, 4);
/// ```
#[macro_export]
macro_rules! log_batch_mapped {
    ($patients:expr, $encounters:expr, $observations:expr, $medications:expr) => {
        tracing::info!(
            patients = $patients,
            encounters = $encounters,
            observations = $observations,
            medication_requests = $medications,
            "Batch mapped to FHIR resources"
        );
    };
}

/// Log the completion of a validation pass
///
/// # Example
///
/// ```no_run
/// use ehrbridge::log_validation_complete;
///
/// log_validation_complete!(24, 2, 5);
/// ```
#[macro_export]
macro_rules! log_validation_complete {
    ($total:expr, $errors:expr, $warnings:expr) => {
        tracing::info!(
            total = $total,
            errors = $errors,
            warnings = $warnings,
            "Validation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ehrbridge::log_error_with_context;
/// use ehrbridge::domain::BridgeError;
///
/// let error = BridgeError::MissingInput("patients.json".to_string());
/// log_error_with_context!(&error, "Failed to load legacy batch");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
