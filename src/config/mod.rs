//! Configuration management for piilog.
//!
//! Loggers are configured with a [`Configuration`]. It can be built in code or
//! loaded from a TOML file with [`load_config`], which supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `PIILOG_*` environment overrides
//! - Validation of levels, PII modes and output paths
//!
//! # Example Configuration
//!
//! ```toml
//! [logger]
//! application_name = "billing"
//! version = "${BILLING_VERSION}"
//! minimum_log_level = "info"
//! pii_mode = "hash"
//!
//! [logger.output]
//! info_path = "stdout"
//! error_path = "/var/log/billing/errors.log"
//!
//! [tracing]
//! console_enabled = false
//! file_enabled = true
//! file_path = "/var/log/billing"
//! ```
//!
//! # Building in code
//!
//! ```rust
//! use piilog::config::Configuration;
//! use piilog::{Level, Logger, PiiMode};
//!
//! let config = Configuration::new(Level::Info, PiiMode::Remove).with_application("billing", "1.4.2");
//! let logger = Logger::new(&config).expect("valid configuration");
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{Configuration, OutputConfig, PiilogConfig, TracingConfig};
