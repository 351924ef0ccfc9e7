//! Core domain types shared by every layer of piilog.
//!
//! - **Error types** ([`LogError`])
//! - **Result type alias** ([`Result`])
//! - **Log levels** ([`Level`])
//!
//! Levels are parsed at the configuration boundary, so an undefined level can
//! never reach a logger:
//!
//! ```rust
//! use piilog::domain::Level;
//!
//! assert_eq!("warn".parse::<Level>().unwrap(), Level::Warn);
//! assert!("verbose".parse::<Level>().is_err());
//! ```

pub mod errors;
pub mod level;
pub mod result;

pub use errors::LogError;
pub use level::Level;
pub use result::Result;
