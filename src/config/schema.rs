//! Configuration schema types

use crate::domain::{Level, Result};
use crate::pii::PiiMode;
use serde::{Deserialize, Deserializer, Serialize};

/// Root of a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiilogConfig {
    /// Logger settings
    #[serde(default)]
    pub logger: Configuration,

    /// Settings for `init_tracing`
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl PiilogConfig {
    /// Validates every section
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid value
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.logger.validate()?;
        self.tracing.validate()?;
        Ok(())
    }
}

/// Logger configuration
///
/// Level and mode are kept as text (names or numeric codes) so that they can
/// come straight from files and environment variables; they are checked when
/// a logger is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Value of the `app` key; empty omits the key
    #[serde(default)]
    pub application_name: String,

    /// Value of the `version` key; empty omits the key
    #[serde(default)]
    pub version: String,

    /// Lowest level that gets written (debug, info, warn, error, panic, fatal)
    #[serde(
        default = "default_minimum_log_level",
        deserialize_with = "string_or_number"
    )]
    pub minimum_log_level: String,

    /// How PII fields are rendered (none, hash, mask, remove)
    #[serde(default = "default_pii_mode", deserialize_with = "string_or_number")]
    pub pii_mode: String,

    /// Value of the `name` key; empty omits the key
    #[serde(default)]
    pub name: String,

    /// Records at or above this level carry a stack trace
    #[serde(
        default = "default_stacktrace_level",
        deserialize_with = "string_or_number"
    )]
    pub stacktrace_level: String,

    /// Output destinations
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            version: String::new(),
            minimum_log_level: default_minimum_log_level(),
            pii_mode: default_pii_mode(),
            name: String::new(),
            stacktrace_level: default_stacktrace_level(),
            output: OutputConfig::default(),
        }
    }
}

impl Configuration {
    /// Configuration with the given level and mode, everything else default
    pub fn new(minimum_log_level: Level, pii_mode: PiiMode) -> Self {
        Self {
            minimum_log_level: minimum_log_level.to_string(),
            pii_mode: pii_mode.to_string(),
            ..Self::default()
        }
    }

    /// Sets the `app` and `version` keys
    pub fn with_application(
        mut self,
        application_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.application_name = application_name.into();
        self.version = version.into();
        self
    }

    pub fn minimum_level(&self) -> Result<Level> {
        self.minimum_log_level.parse()
    }

    pub fn mode(&self) -> Result<PiiMode> {
        self.pii_mode.parse()
    }

    pub fn stacktrace_from(&self) -> Result<Level> {
        self.stacktrace_level.parse()
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid input
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.minimum_level().is_err() {
            return Err(format!(
                "invalid minimum log level '{}' in logger configuration. Must be one of: {}",
                self.minimum_log_level,
                level_names()
            ));
        }
        if self.mode().is_err() {
            return Err(format!(
                "invalid PII mode '{}' in logger configuration. Must be one of: none, hash, mask, remove",
                self.pii_mode
            ));
        }
        if self.stacktrace_from().is_err() {
            return Err(format!(
                "invalid stacktrace level '{}' in logger configuration. Must be one of: {}",
                self.stacktrace_level,
                level_names()
            ));
        }
        self.output.validate()?;
        Ok(())
    }
}

/// Where records are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination of debug and info records: `stdout`, `stderr` or a file path
    #[serde(default = "default_info_path")]
    pub info_path: String,

    /// Destination of warn and higher records: `stdout`, `stderr` or a file path
    #[serde(default = "default_error_path")]
    pub error_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            info_path: default_info_path(),
            error_path: default_error_path(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.info_path.trim().is_empty() {
            return Err("output.info_path cannot be empty".to_string());
        }
        if self.error_path.trim().is_empty() {
            return Err("output.error_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Settings for the `tracing` subscriber installed by `init_tracing`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// JSON events on stdout
    #[serde(default = "default_true")]
    pub console_enabled: bool,

    /// JSON events in a rolling file
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory of the rolling file
    #[serde(default = "default_file_path")]
    pub file_path: String,

    /// Rotation strategy (daily, hourly, never)
    #[serde(default = "default_file_rotation")]
    pub file_rotation: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            console_enabled: default_true(),
            file_enabled: false,
            file_path: default_file_path(),
            file_rotation: default_file_rotation(),
        }
    }
}

impl TracingConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.file_rotation.as_str()) {
            return Err(format!(
                "Invalid tracing.file_rotation '{}'. Must be one of: {}",
                self.file_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.file_enabled && self.file_path.trim().is_empty() {
            return Err("tracing.file_path cannot be empty when file output is enabled".to_string());
        }
        Ok(())
    }
}

fn level_names() -> String {
    Level::ALL
        .iter()
        .map(Level::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accepts `"info"` as well as `0`
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn default_minimum_log_level() -> String {
    "debug".to_string()
}

fn default_pii_mode() -> String {
    "none".to_string()
}

fn default_stacktrace_level() -> String {
    "warn".to_string()
}

fn default_info_path() -> String {
    "stdout".to_string()
}

fn default_error_path() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

fn default_file_path() -> String {
    "./logs".to_string()
}

fn default_file_rotation() -> String {
    "daily".to_string()
}
