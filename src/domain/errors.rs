//! Domain error types
//!
//! All fallible operations of the crate return [`LogError`]. Third-party error
//! types are converted at the boundary and never leak through the public API.

use thiserror::Error;

/// Main piilog error type
#[derive(Debug, Error)]
pub enum LogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A log level that is not one of the six defined levels
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// A PII mode that is not one of the four defined modes
    #[error("Invalid PII mode: {0}")]
    InvalidPiiMode(String),

    /// I/O errors raised while opening, writing or flushing a sink
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LogError {
    fn from(err: toml::de::Error) -> Self {
        LogError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_error_display() {
        let err = LogError::Configuration("invalid minimum log level".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid minimum log level"
        );
    }

    #[test]
    fn test_invalid_mode_display() {
        let err = LogError::InvalidPiiMode("7".to_string());
        assert_eq!(err.to_string(), "Invalid PII mode: 7");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: LogError = io_err.into();
        assert!(matches!(err, LogError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: LogError = json_err.into();
        assert!(matches!(err, LogError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LogError = toml_err.into();
        assert!(matches!(err, LogError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_log_error_implements_std_error() {
        let err = LogError::InvalidLevel("verbose".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
