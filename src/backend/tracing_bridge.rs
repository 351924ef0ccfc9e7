//! Bridge into the `tracing` ecosystem
//!
//! [`TracingBackend`] turns each resolved record into a `tracing` event with
//! target `piilog`, so applications that already run a `tracing` subscriber
//! get PII-safe records through their existing pipeline. [`init_tracing`]
//! installs a JSON subscriber for applications that do not.
//!
//! # Example
//!
//! ```no_run
//! use piilog::backend::{init_tracing, TracingBackend};
//! use piilog::config::TracingConfig;
//! use piilog::{Logger, PiiMode};
//! use std::sync::Arc;
//!
//! let _guard = init_tracing("info", &TracingConfig::default()).expect("Failed to initialize tracing");
//!
//! let logger = Logger::builder()
//!     .backend(Arc::new(TracingBackend::new()))
//!     .pii_mode(PiiMode::Hash)
//!     .build();
//! logger.infow("user signed in", piilog::args!["email", piilog::pii("email", "a@b.com")]);
//! ```

use super::{join_name, Backend, Fields, Record};
use crate::config::TracingConfig;
use crate::domain::{Level, LogError, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const TARGET: &str = "piilog";

/// Forwards records as `tracing` events
///
/// Panic and fatal records are emitted at `ERROR`. Record fields travel as a
/// single JSON string under `fields` because `tracing` field names are fixed
/// at compile time.
#[derive(Debug, Clone, Default)]
pub struct TracingBackend {
    name: Option<String>,
    context: Fields,
}

impl TracingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for TracingBackend {
    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Debug => tracing::enabled!(target: TARGET, tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(target: TARGET, tracing::Level::INFO),
            Level::Warn => tracing::enabled!(target: TARGET, tracing::Level::WARN),
            Level::Error | Level::Panic | Level::Fatal => {
                tracing::enabled!(target: TARGET, tracing::Level::ERROR)
            }
        }
    }

    fn write(&self, record: &Record<'_>) {
        let mut fields = Map::new();
        for (key, value) in self.context.iter().chain(record.fields.iter()) {
            fields.insert(key.clone(), value.clone());
        }
        let fields = Value::Object(fields).to_string();
        let caller = format!("{}:{}", record.caller.file(), record.caller.line());
        let logger = self.name.as_deref().unwrap_or_default();
        let func = record.function.unwrap_or_default();
        let lvl = record.level.as_str();
        let msg = record.message;

        match record.level {
            Level::Debug => {
                tracing::debug!(target: TARGET, logger, caller = %caller, func, lvl, fields = %fields, "{msg}")
            }
            Level::Info => {
                tracing::info!(target: TARGET, logger, caller = %caller, func, lvl, fields = %fields, "{msg}")
            }
            Level::Warn => {
                tracing::warn!(target: TARGET, logger, caller = %caller, func, lvl, fields = %fields, "{msg}")
            }
            Level::Error | Level::Panic | Level::Fatal => {
                tracing::error!(target: TARGET, logger, caller = %caller, func, lvl, fields = %fields, "{msg}")
            }
        }
    }

    fn with_fields(&self, fields: Fields) -> Arc<dyn Backend> {
        let mut derived = self.clone();
        derived.context.extend(fields);
        Arc::new(derived)
    }

    fn named(&self, name: &str) -> Arc<dyn Backend> {
        let mut derived = self.clone();
        derived.name = join_name(self.name.as_deref(), name);
        Arc::new(derived)
    }

    fn sync(&self) -> Result<()> {
        // Flushing belongs to the subscriber; see `TracingGuard`.
        Ok(())
    }
}

/// Guard that must be kept alive for the duration of the program
/// to ensure file output is flushed
pub struct TracingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl TracingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Install a global JSON `tracing` subscriber for `piilog` events
///
/// # Arguments
///
/// * `level` - Minimum level (debug, info, warn, error, panic, fatal); panic
///   and fatal both select `ERROR`
/// * `config` - Console and rolling file output settings
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Errors
///
/// Fails on an invalid level or rotation, when the log directory cannot be
/// created, or when a global subscriber is already installed.
pub fn init_tracing(level: &str, config: &TracingConfig) -> Result<TracingGuard> {
    let filter = tracing_filter(level.parse()?);
    config.validate().map_err(LogError::Configuration)?;

    let make_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{TARGET}={filter}")))
    };

    let mut layers = Vec::new();

    if config.console_enabled {
        let console_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stdout)
            .with_filter(make_filter());
        layers.push(console_layer.boxed());
    }

    let file_guard = if config.file_enabled {
        let rotation = match config.file_rotation.as_str() {
            "hourly" => Rotation::HOURLY,
            "never" => Rotation::NEVER,
            _ => Rotation::DAILY,
        };

        std::fs::create_dir_all(&config.file_path).map_err(|e| {
            LogError::Configuration(format!(
                "Failed to create log directory {}: {}",
                config.file_path, e
            ))
        })?;

        let file_appender = RollingFileAppender::new(rotation, &config.file_path, "piilog.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(non_blocking)
            .with_filter(make_filter());
        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| LogError::Configuration(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(
        console_enabled = config.console_enabled,
        file_enabled = config.file_enabled,
        file_path = %config.file_path,
        "Tracing initialized"
    );

    Ok(TracingGuard::new(file_guard))
}

fn tracing_filter(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error | Level::Panic | Level::Fatal => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SharedBuffer;
    use std::panic::Location;

    fn capture<F: FnOnce()>(f: F) -> String {
        let buffer = SharedBuffer::new();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    #[test]
    fn test_forwards_record_with_fields() {
        let backend = TracingBackend::new()
            .with_fields(vec![("app".to_string(), Value::from("billing"))]);
        let fields = vec![("email".to_string(), Value::from("[hashed]"))];

        let output = capture(|| {
            backend.write(&Record {
                level: Level::Warn,
                message: "charge declined",
                fields: &fields,
                caller: Location::caller(),
                function: None,
            });
        });

        assert!(output.contains("charge declined"));
        assert!(output.contains("WARN"));
        assert!(output.contains("billing"));
        assert!(output.contains("[hashed]"));
    }

    #[test]
    fn test_fatal_maps_to_error() {
        let backend = TracingBackend::new();
        let output = capture(|| {
            backend.write(&Record {
                level: Level::Fatal,
                message: "going down",
                fields: &[],
                caller: Location::caller(),
                function: None,
            });
        });

        assert!(output.contains("ERROR"));
        assert!(output.contains("\"lvl\":\"fatal\""));
    }

    #[test]
    fn test_enabled_follows_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let backend = TracingBackend::new();
            assert!(!backend.enabled(Level::Info));
            assert!(backend.enabled(Level::Error));
        });
    }

    #[test]
    fn test_tracing_filter() {
        assert_eq!(tracing_filter(Level::Debug), "debug");
        assert_eq!(tracing_filter(Level::Fatal), "error");
    }

    #[test]
    fn test_guard_creation() {
        let guard = TracingGuard::new(None);
        drop(guard);
    }
}
