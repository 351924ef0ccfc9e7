//! Record writers
//!
//! A [`Backend`] receives fully resolved records: by the time a record gets
//! here every PII field has already been rendered according to the logger's
//! mode. Backends own encoding, level filtering, destination routing and
//! field accumulation.
//!
//! - [`JsonBackend`] writes one JSON object per line to level-routed sinks
//! - [`NopBackend`] discards everything
//! - [`TracingBackend`] forwards records as `tracing` events

pub mod json;
pub mod nop;
pub mod sink;
pub mod tracing_bridge;

pub use json::JsonBackend;
pub use nop::NopBackend;
pub use sink::{SharedBuffer, Sink};
pub use tracing_bridge::{init_tracing, TracingBackend, TracingGuard};

use crate::domain::{Level, Result};
use serde_json::Value;
use std::panic::Location;
use std::sync::Arc;

/// Ordered key/value fields of a record
pub type Fields = Vec<(String, Value)>;

/// A single log record as handed to a backend
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: Level,
    pub message: &'a str,
    pub fields: &'a [(String, Value)],
    /// Source location of the logging call
    pub caller: &'static Location<'static>,
    /// Path of the calling function, when the call went through a logging macro
    pub function: Option<&'static str>,
}

/// Encodes and writes leveled records
///
/// Implementations must be safe for concurrent use; a logger calls into its
/// backend from whatever thread emits the record.
pub trait Backend: Send + Sync {
    /// Whether records at `level` would be written
    fn enabled(&self, level: Level) -> bool;

    /// Write one record. Failures are not reported here; they surface from
    /// the next [`sync`](Backend::sync).
    fn write(&self, record: &Record<'_>);

    /// A backend that adds `fields` to every record it writes
    fn with_fields(&self, fields: Fields) -> Arc<dyn Backend>;

    /// A backend whose logger name is extended with `name`
    fn named(&self, name: &str) -> Arc<dyn Backend>;

    /// Flush buffered output
    fn sync(&self) -> Result<()>;
}

/// `parent.child`, or just whichever part is present
pub(crate) fn join_name(parent: Option<&str>, child: &str) -> Option<String> {
    match (parent, child) {
        (Some(parent), "") => Some(parent.to_string()),
        (Some(parent), child) => Some(format!("{parent}.{child}")),
        (None, "") => None,
        (None, child) => Some(child.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_name() {
        assert_eq!(join_name(None, ""), None);
        assert_eq!(join_name(None, "api"), Some("api".to_string()));
        assert_eq!(join_name(Some("api"), "db"), Some("api.db".to_string()));
        assert_eq!(join_name(Some("api"), ""), Some("api".to_string()));
    }
}
