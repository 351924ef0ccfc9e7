//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PiilogConfig;
use crate::domain::{LogError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`PiilogConfig`]
/// 4. Applies environment variable overrides (`PIILOG_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is missing, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use piilog::config::load_config;
/// use piilog::Logger;
///
/// let config = load_config("piilog.toml").expect("Failed to load config");
/// let logger = Logger::must_new(&config.logger);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PiilogConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LogError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LogError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PiilogConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LogError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(
        path = %path.display(),
        minimum_log_level = %config.logger.minimum_log_level,
        pii_mode = %config.logger.pii_mode,
        "Logger configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LogError::Configuration(format!("Invalid substitution pattern: {e}")))?;
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
                    processed_line = processed_line.replace(&cap[0], &value);
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
        return Err(LogError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `PIILOG_*` environment variable overrides to the logger section
fn apply_env_overrides(config: &mut PiilogConfig) {
    let logger = &mut config.logger;

    if let Ok(val) = std::env::var("PIILOG_APPLICATION_NAME") {
        logger.application_name = val;
    }
    if let Ok(val) = std::env::var("PIILOG_VERSION") {
        logger.version = val;
    }
    if let Ok(val) = std::env::var("PIILOG_MINIMUM_LOG_LEVEL") {
        logger.minimum_log_level = val;
    }
    if let Ok(val) = std::env::var("PIILOG_PII_MODE") {
        logger.pii_mode = val;
    }
    if let Ok(val) = std::env::var("PIILOG_NAME") {
        logger.name = val;
    }
    if let Ok(val) = std::env::var("PIILOG_INFO_PATH") {
        logger.output.info_path = val;
    }
    if let Ok(val) = std::env::var("PIILOG_ERROR_PATH") {
        logger.output.error_path = val;
    }
}
