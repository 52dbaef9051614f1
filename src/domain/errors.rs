//! Domain error types
//!
//! This module defines the error hierarchy for ehrbridge. Only conditions that
//! must halt a batch are errors here: unknown legacy codes are substituted by the
//! mapper, and bad resource content becomes validation findings, never errors.

use thiserror::Error;

/// Main ehrbridge error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required input collection or file is absent
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Mapping could not proceed (strict identifier mode only)
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Resource-definition tables are incomplete or unusable
    #[error("Resource definition error: {0}")]
    Definitions(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BridgeError::Configuration(_) => 2,
            BridgeError::MissingInput(_) => 3,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = BridgeError::MissingInput("patients.json".to_string());
        assert_eq!(err.to_string(), "Missing input: patients.json");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BridgeError::Configuration(String::new()).exit_code(), 2);
        assert_eq!(BridgeError::MissingInput(String::new()).exit_code(), 3);
        assert_eq!(BridgeError::Definitions(String::new()).exit_code(), 5);
        assert_eq!(BridgeError::Io(String::new()).exit_code(), 5);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: BridgeError = io_err.into();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: BridgeError = json_err.into();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: BridgeError = toml_err.into();
        assert!(matches!(err, BridgeError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_bridge_error_implements_std_error() {
        let err = BridgeError::Mapping("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
