// piilog - PII-aware structured logging
// Copyright (c) 2025 piilog Contributors
// Licensed under the MIT License

//! # piilog - PII-aware structured logging
//!
//! piilog is a leveled, structured logger that knows which of its fields are
//! personally identifiable information. Sensitive values are attached as PII
//! fields and rendered according to the logger's [`PiiMode`] at the moment a
//! record is written, so the same call site can log raw values in development
//! and hashed, masked or no values in production.
//!
//! ## Overview
//!
//! - **Levels**: debug, info, warn, error, panic (writes, then panics) and
//!   fatal (writes, then exits with status 1)
//! - **PII modes**: `none`, `hash` (SHA-256 hex), `mask` (process-wide mask
//!   function), `remove`
//! - **Custom fields** that carry their own resolver
//! - **JSON lines** output with level-based routing to two destinations
//!
//! ## Architecture
//!
//! - [`domain`] - Levels, errors and the result alias
//! - [`pii`] - PII modes, fields, resolution and the mask function
//! - [`logger`] - The logger, structured arguments, global logger and macros
//! - [`backend`] - Record encoding and output (JSON, no-op, `tracing`)
//! - [`config`] - Configuration schema and TOML loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use piilog::config::Configuration;
//! use piilog::{args, pii, Level, Logger, PiiMode};
//!
//! fn main() -> piilog::Result<()> {
//!     let config = Configuration::new(Level::Info, PiiMode::Hash).with_application("billing", "1.4.2");
//!     let logger = Logger::new(&config)?;
//!
//!     // {"lvl":"info",...,"msg":"signed in","app":"billing","version":"1.4.2","email":"<sha-256>","attempt":1}
//!     logger.infow("signed in", args!["user", pii("email", "alice@example.com"), "attempt", 1]);
//!
//!     logger.sync()
//! }
//! ```
//!
//! ## Masking
//!
//! ```rust
//! use piilog::pii::ResolvedField;
//!
//! piilog::set_mask_fn(|key, value| {
//!     let visible: String = value.chars().take(2).collect();
//!     ResolvedField::new(key, format!("{visible}***"))
//! });
//! # piilog::pii::clear_mask_fn();
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result`] with a [`LogError`]. Logging calls
//! themselves never fail; write errors are reported by [`Logger::sync`].
//!
//! ## Bridging to `tracing`
//!
//! [`backend::TracingBackend`] forwards records to the current `tracing`
//! subscriber, and [`backend::init_tracing`] installs a JSON subscriber with
//! optional rolling file output.

pub mod backend;
pub mod config;
pub mod domain;
pub mod logger;
pub mod pii;

pub use config::Configuration;
pub use domain::{Level, LogError, Result};
pub use logger::global::{
    debug, debugf, debugw, error, errorf, errorw, fatal, fatalf, fatalw, info, infof, infow,
    panic, panicf, panicw, sync, warn, warnf, warnw,
};
pub use logger::{global, set_global, Arg, Logger, LoggerBuilder};
pub use pii::{
    custom_pii, pii, resolver, set_mask_fn, CustomPiiField, PiiField, PiiMode, ResolvedField,
};
