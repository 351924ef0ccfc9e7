//! The leveled, PII-aware logger
//!
//! Every level has three forms:
//!
//! - plain, `info(msg)`: the message is written as is
//! - formatted, `infof(format_args!(..))`: same, from format arguments
//! - structured, `infow(msg, args![..])`: key/value fields, with every PII
//!   field resolved against the logger's mode before it reaches the backend
//!
//! PII protection only applies to the structured form; a value interpolated
//! into a plain or formatted message is written verbatim.
//!
//! `panic*` methods panic after writing their record and `fatal*` methods
//! terminate the process with exit status 1. Both flush the backend first and
//! both do so even when the level is filtered out.

use super::args::{resolve_args, Arg};
use crate::backend::{Backend, JsonBackend, NopBackend, Record, Sink};
use crate::config::Configuration;
use crate::domain::{Level, LogError, Result};
use crate::pii::{MaskFunction, PiiMode};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

const UNINITIALIZED: &str = "logger has not been initialized - panicking";

#[derive(Clone)]
struct Core {
    backend: Arc<dyn Backend>,
    pii_mode: PiiMode,
    mask: Option<Arc<MaskFunction>>,
}

/// A structured logger with a fixed PII mode
///
/// Cheap to clone; clones share the backend. The mode is set at construction
/// and carried unchanged into every logger derived with [`with`](Logger::with)
/// or [`named`](Logger::named).
///
/// `Logger::default()` is an uninitialized logger: any call on it writes an
/// emergency record to stderr and panics. Use [`Logger::nop`] for a logger
/// that is safe to call and writes nothing.
///
/// # Example
///
/// ```no_run
/// use piilog::config::Configuration;
/// use piilog::{args, pii, Level, Logger, PiiMode};
///
/// let logger = Logger::must_new(
///     &Configuration::new(Level::Info, PiiMode::Hash).with_application("billing", "1.4.2"),
/// );
///
/// logger.infow("charge accepted", args!["customer", pii("email", "a@b.com"), "amount", 1299]);
/// logger.warnf(format_args!("retrying in {}ms", 250));
/// ```
#[derive(Clone, Default)]
pub struct Logger {
    core: Option<Core>,
}

impl Logger {
    /// Build a JSON logger from `config`
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Configuration`] naming the invalid input when the
    /// level, PII mode or output settings are invalid, and [`LogError::Io`]
    /// when an output file cannot be opened.
    pub fn new(config: &Configuration) -> Result<Self> {
        config.validate().map_err(|e| {
            LogError::Configuration(format!(
                "received an error while validating the logger configuration: {e}"
            ))
        })?;

        let min_level = config.minimum_level()?;
        let pii_mode = config.mode()?;
        let info = Sink::open(&config.output.info_path)?;
        let error = Sink::open(&config.output.error_path)?;

        let mut json = JsonBackend::new(min_level, info, error)
            .with_stacktrace_level(config.stacktrace_from()?);
        if !config.name.is_empty() {
            json = json.with_name(config.name.as_str());
        }

        let mut initial = Vec::new();
        if !config.application_name.is_empty() {
            initial.push(("app".to_string(), config.application_name.as_str().into()));
        }
        if !config.version.is_empty() {
            initial.push(("version".to_string(), config.version.as_str().into()));
        }

        tracing::debug!(
            minimum_log_level = %min_level,
            pii_mode = %pii_mode,
            "Logger constructed"
        );

        Ok(Self::builder()
            .backend(json.with_fields(initial))
            .pii_mode(pii_mode)
            .build())
    }

    /// Like [`Logger::new`], but panics on an invalid configuration
    ///
    /// Meant for startup code that cannot run without a logger.
    pub fn must_new(config: &Configuration) -> Self {
        match Self::new(config) {
            Ok(logger) => logger,
            Err(e) => panic!("{e}"),
        }
    }

    /// A logger that accepts every call and writes nothing
    pub fn nop() -> Self {
        Self::builder().backend(Arc::new(NopBackend)).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// The PII mode this logger resolves fields with
    #[track_caller]
    pub fn pii_mode(&self) -> PiiMode {
        self.core().pii_mode
    }

    /// Whether records at `level` would be written
    #[track_caller]
    pub fn enabled(&self, level: Level) -> bool {
        self.core().backend.enabled(level)
    }

    #[track_caller]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Level::Debug, msg);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    #[track_caller]
    pub fn debugw<I>(&self, msg: &str, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(Level::Debug, msg, args, None);
    }

    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Level::Info, msg);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    #[track_caller]
    pub fn infow<I>(&self, msg: &str, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(Level::Info, msg, args, None);
    }

    #[track_caller]
    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(Level::Warn, msg);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    #[track_caller]
    pub fn warnw<I>(&self, msg: &str, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(Level::Warn, msg, args, None);
    }

    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.log(Level::Error, msg);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    #[track_caller]
    pub fn errorw<I>(&self, msg: &str, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(Level::Error, msg, args, None);
    }

    /// Writes the record, flushes, then panics with the message
    #[track_caller]
    pub fn panic(&self, msg: impl fmt::Display) -> ! {
        self.terminate(Level::Panic, &msg.to_string(), Vec::new(), None)
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(Level::Panic, &args.to_string(), Vec::new(), None)
    }

    #[track_caller]
    pub fn panicw<I>(&self, msg: &str, args: I) -> !
    where
        I: IntoIterator<Item = Arg>,
    {
        self.terminate(Level::Panic, msg, args, None)
    }

    /// Writes the record, flushes, then exits the process with status 1
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) -> ! {
        self.terminate(Level::Fatal, &msg.to_string(), Vec::new(), None)
    }

    /// Formats, writes, flushes, then exits the process with status 1
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(Level::Fatal, &args.to_string(), Vec::new(), None)
    }

    /// Writes the record with its fields, flushes, then exits the process with status 1
    #[track_caller]
    pub fn fatalw<I>(&self, msg: &str, args: I) -> !
    where
        I: IntoIterator<Item = Arg>,
    {
        self.terminate(Level::Fatal, msg, args, None)
    }

    /// Structured emission at any level
    ///
    /// Panic and fatal levels keep their terminating behavior.
    #[track_caller]
    pub fn logw<I>(&self, level: Level, msg: &str, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(level, msg, args, None);
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn logw_in<I>(&self, level: Level, msg: &str, args: I, function: &'static str)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.write_fields(level, msg, args, Some(function));
    }

    /// A logger that adds `args` to every record it writes
    ///
    /// PII fields in `args` are resolved once, now, with this logger's mode.
    /// The original logger is unchanged.
    #[track_caller]
    pub fn with<I>(&self, args: I) -> Logger
    where
        I: IntoIterator<Item = Arg>,
    {
        let core = self.core();
        let fields = resolve_args(core.pii_mode, core.mask.as_deref(), args);
        Logger {
            core: Some(Core {
                backend: core.backend.with_fields(fields),
                ..core.clone()
            }),
        }
    }

    /// A logger whose name is this logger's name extended with `.name`
    #[track_caller]
    pub fn named(&self, name: &str) -> Logger {
        let core = self.core();
        Logger {
            core: Some(Core {
                backend: core.backend.named(name),
                ..core.clone()
            }),
        }
    }

    /// Flush the backend
    ///
    /// # Errors
    ///
    /// Returns the first write or flush failure since the previous sync.
    #[track_caller]
    pub fn sync(&self) -> Result<()> {
        self.core().backend.sync()
    }

    #[track_caller]
    fn core(&self) -> &Core {
        match &self.core {
            Some(core) => core,
            None => uninitialized(),
        }
    }

    #[track_caller]
    fn log(&self, level: Level, msg: impl fmt::Display) {
        let core = self.core();
        if !core.backend.enabled(level) {
            return;
        }
        let message = msg.to_string();
        core.backend.write(&Record {
            level,
            message: &message,
            fields: &[],
            caller: Location::caller(),
            function: None,
        });
    }

    #[track_caller]
    fn write_fields<I>(&self, level: Level, msg: &str, args: I, function: Option<&'static str>)
    where
        I: IntoIterator<Item = Arg>,
    {
        if level >= Level::Panic {
            self.terminate(level, msg, args, function);
        }

        let core = self.core();
        if !core.backend.enabled(level) {
            return;
        }
        let fields = resolve_args(core.pii_mode, core.mask.as_deref(), args);
        core.backend.write(&Record {
            level,
            message: msg,
            fields: &fields,
            caller: Location::caller(),
            function,
        });
    }

    #[track_caller]
    fn terminate<I>(&self, level: Level, msg: &str, args: I, function: Option<&'static str>) -> !
    where
        I: IntoIterator<Item = Arg>,
    {
        let core = self.core();
        if core.backend.enabled(level) {
            let fields = resolve_args(core.pii_mode, core.mask.as_deref(), args);
            core.backend.write(&Record {
                level,
                message: msg,
                fields: &fields,
                caller: Location::caller(),
                function,
            });
        }
        // The process is going down either way; a flush failure has nowhere to go.
        let _ = core.backend.sync();

        if level == Level::Fatal {
            std::process::exit(1);
        }
        panic!("{msg}");
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.core {
            Some(core) => f
                .debug_struct("Logger")
                .field("pii_mode", &core.pii_mode)
                .field("own_mask_fn", &core.mask.is_some())
                .finish_non_exhaustive(),
            None => f.write_str("Logger(uninitialized)"),
        }
    }
}

/// Writes an emergency record with a stack trace, then panics
#[cold]
#[track_caller]
fn uninitialized() -> ! {
    let emergency = JsonBackend::emergency();
    emergency.write(&Record {
        level: Level::Panic,
        message: UNINITIALIZED,
        fields: &[],
        caller: Location::caller(),
        function: None,
    });
    let _ = emergency.sync();
    panic!("{UNINITIALIZED}");
}

/// Assembles a [`Logger`] around any [`Backend`]
///
/// ```
/// use piilog::backend::{JsonBackend, SharedBuffer, Sink};
/// use piilog::pii::{pii, ResolvedField};
/// use piilog::{args, Level, Logger, PiiMode};
/// use std::sync::Arc;
///
/// let out = SharedBuffer::new();
/// let logger = Logger::builder()
///     .backend(Arc::new(JsonBackend::new(Level::Debug, Sink::buffer(&out), Sink::buffer(&out))))
///     .pii_mode(PiiMode::Mask)
///     .mask_fn(|key, value| ResolvedField::new(key, format!("{}***", &value[..1])))
///     .build();
///
/// logger.infow("signed in", args![pii("email", "alice@example.com")]);
/// assert_eq!(out.records().unwrap()[0]["email"], "a***");
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    backend: Option<Arc<dyn Backend>>,
    pii_mode: PiiMode,
    mask: Option<Arc<MaskFunction>>,
}

impl LoggerBuilder {
    /// Defaults to a JSON backend on stdout/stderr at debug level
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn pii_mode(mut self, pii_mode: PiiMode) -> Self {
        self.pii_mode = pii_mode;
        self
    }

    /// A mask function for this logger only; it takes precedence over the
    /// process-wide one
    pub fn mask_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> crate::pii::ResolvedField + Send + Sync + 'static,
    {
        self.mask = Some(Arc::new(MaskFunction::new(f)));
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            core: Some(Core {
                backend: self
                    .backend
                    .unwrap_or_else(|| Arc::new(JsonBackend::stdio(Level::Debug))),
                pii_mode: self.pii_mode,
                mask: self.mask,
            }),
        }
    }
}
