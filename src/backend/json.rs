//! JSON line backend
//!
//! Every record becomes a single JSON object on its own line. Keys, in order:
//!
//! | key          | content                                              |
//! |--------------|------------------------------------------------------|
//! | `lvl`        | lowercase level                                      |
//! | `ts`         | RFC 3339 timestamp, UTC                              |
//! | `name`       | logger name, if any                                  |
//! | `caller`     | `dir/file.rs:line` of the logging call               |
//! | `func`       | calling function path, if known                      |
//! | `msg`        | message                                              |
//! | ...          | accumulated context fields, then the record's fields |
//! | `stacktrace` | only at or above the stack trace level               |
//!
//! A field named like one of the keys above is written as `fields.<key>`.
//!
//! Debug and info records go to the info sink; warn and above go to the error
//! sink.

use super::sink::Sink;
use super::{join_name, Backend, Fields, Record};
use crate::domain::{Level, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::Arc;

#[derive(Debug)]
struct Outputs {
    min_level: Level,
    info: Sink,
    error: Sink,
}

/// Writes JSON lines to level-routed sinks
#[derive(Debug, Clone)]
pub struct JsonBackend {
    outputs: Arc<Outputs>,
    stacktrace_level: Level,
    name: Option<String>,
    context: Fields,
}

impl JsonBackend {
    /// Records below `min_level` are dropped; debug/info go to `info`,
    /// warn and above to `error`
    pub fn new(min_level: Level, info: Sink, error: Sink) -> Self {
        Self {
            outputs: Arc::new(Outputs {
                min_level,
                info,
                error,
            }),
            stacktrace_level: Level::Warn,
            name: None,
            context: Vec::new(),
        }
    }

    /// Info to stdout, warn and above to stderr
    pub fn stdio(min_level: Level) -> Self {
        Self::new(min_level, Sink::stdout(), Sink::stderr())
    }

    /// Attach a stack trace to records at or above `level`
    pub fn with_stacktrace_level(mut self, level: Level) -> Self {
        self.stacktrace_level = level;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = join_name(None, &name.into());
        self
    }

    /// Everything to stderr, stack traces from panic level up
    pub(crate) fn emergency() -> Self {
        Self::new(Level::Debug, Sink::stderr(), Sink::stderr())
            .with_stacktrace_level(Level::Panic)
    }

    fn encode(&self, record: &Record<'_>) -> Map<String, Value> {
        let mut line = Map::new();
        line.insert("lvl".to_string(), Value::from(record.level.as_str()));
        line.insert(
            "ts".to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        if let Some(name) = &self.name {
            line.insert("name".to_string(), Value::from(name.as_str()));
        }
        line.insert("caller".to_string(), Value::from(short_caller(record.caller)));
        if let Some(function) = record.function {
            line.insert("func".to_string(), Value::from(function));
        }
        line.insert("msg".to_string(), Value::from(record.message));

        for (key, value) in self.context.iter().chain(record.fields.iter()) {
            line.insert(field_key(key), value.clone());
        }

        if record.level >= self.stacktrace_level {
            line.insert(
                "stacktrace".to_string(),
                Value::from(Backtrace::force_capture().to_string()),
            );
        }

        line
    }

    fn sink_for(&self, level: Level) -> &Sink {
        if level >= Level::Warn {
            &self.outputs.error
        } else {
            &self.outputs.info
        }
    }
}

impl Backend for JsonBackend {
    fn enabled(&self, level: Level) -> bool {
        level >= self.outputs.min_level
    }

    fn write(&self, record: &Record<'_>) {
        if !self.enabled(record.level) {
            return;
        }

        let sink = self.sink_for(record.level);
        match serde_json::to_vec(&self.encode(record)) {
            Ok(line) => sink.write_line(&line),
            Err(e) => sink.latch(format!("Failed to encode log record: {e}")),
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
        let info = self.outputs.info.flush();
        let error = self.outputs.error.flush();
        info.and(error)
    }
}

/// Keys written by the encoder itself; a field may never replace them
const RESERVED_KEYS: [&str; 7] = ["lvl", "ts", "name", "caller", "func", "msg", "stacktrace"];

/// Moves a field whose key collides with a reserved key under `fields.`
fn field_key(key: &str) -> String {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{key}")
    } else {
        key.to_string()
    }
}

/// Last directory plus file name, then the line
fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let short = file
        .rmatch_indices(|c| c == '/' || c == '\\')
        .nth(1)
        .map_or(file, |(idx, _)| &file[idx + 1..]);
    format!("{}:{}", short, location.line())
}
