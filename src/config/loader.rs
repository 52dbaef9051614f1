//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EhrBridgeConfig;
use crate::domain::errors::BridgeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EhrBridgeConfig
/// 4. Applies environment variable overrides (EHRBRIDGE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`BridgeError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use ehrbridge::config::loader::load_config;
///
/// let config = load_config("ehrbridge.toml").expect("Failed to load config");
/// println!("Reading legacy data from {}", config.source.input_dir);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EhrBridgeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BridgeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: EhrBridgeConfig = toml::from_str(&contents)
        .map_err(|e| BridgeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BridgeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BridgeError::Other(format!("Invalid substitution pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BridgeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the EHRBRIDGE_* prefix
///
/// Variables follow the pattern EHRBRIDGE_<SECTION>_<KEY>, for example
/// EHRBRIDGE_SOURCE_INPUT_DIR or EHRBRIDGE_VALIDATION_FAIL_FAST. Boolean
/// values that do not parse leave the file value in place.
fn apply_env_overrides(config: &mut EhrBridgeConfig) {
    if let Ok(val) = std::env::var("EHRBRIDGE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("EHRBRIDGE_SOURCE_SYSTEM") {
        config.source.system = val;
    }
    if let Ok(val) = std::env::var("EHRBRIDGE_SOURCE_INPUT_DIR") {
        config.source.input_dir = val;
    }

    if let Ok(val) = std::env::var("EHRBRIDGE_OUTPUT_FHIR_DIR") {
        config.output.fhir_dir = val;
    }
    if let Ok(val) = std::env::var("EHRBRIDGE_OUTPUT_REPORT_DIR") {
        config.output.report_dir = val;
    }

    override_bool(
        "EHRBRIDGE_MAPPING_REQUIRE_SOURCE_IDS",
        &mut config.mapping.require_source_ids,
    );

    override_bool("EHRBRIDGE_VALIDATION_FAIL_FAST", &mut config.validation.fail_fast);
    override_bool(
        "EHRBRIDGE_VALIDATION_CROSS_VALIDATE",
        &mut config.validation.cross_validate,
    );
    if let Ok(val) = std::env::var("EHRBRIDGE_VALIDATION_DEFINITIONS_FILE") {
        config.validation.definitions_file = Some(val);
    }

    override_bool("EHRBRIDGE_LOGGING_LOCAL_ENABLED", &mut config.logging.local_enabled);
    if let Ok(val) = std::env::var("EHRBRIDGE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("EHRBRIDGE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

fn override_bool(name: &str, target: &mut bool) {
    if let Ok(val) = std::env::var(name) {
        if let Ok(parsed) = val.parse() {
            *target = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("EHRBRIDGE_LOADER_TEST_VAR", "clinic-a");
        let input = "system = \"${EHRBRIDGE_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "system = \"clinic-a\"\n");
        std::env::remove_var("EHRBRIDGE_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("EHRBRIDGE_LOADER_MISSING_VAR");
        let input = "input_dir = \"${EHRBRIDGE_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("EHRBRIDGE_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${EHRBRIDGE_LOADER_COMMENTED_VAR}\nlog_level = \"info\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(BridgeError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[source]
system = "2.16.840.1.113883.3.9999"
input_dir = "/data/legacy"

[validation]
cross_validate = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.source.system, "2.16.840.1.113883.3.9999");
        assert!(config.validation.cross_validate);
        assert_eq!(config.output.report_dir, "data/reports");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[source\nsystem = 1").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
