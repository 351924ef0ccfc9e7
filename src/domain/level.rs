//! Log levels

use super::errors::LogError;
use std::fmt;
use std::str::FromStr;

/// Severity of a log record
///
/// The numeric codes are stable and used when a level is configured as a
/// number. Code `3` is deliberately unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Level {
    Debug = -1,
    Info = 0,
    Warn = 1,
    Error = 2,
    /// Writes the record, then panics
    Panic = 4,
    /// Writes the record, then exits the process with status 1
    Fatal = 5,
}

impl Level {
    /// All defined levels, lowest first
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ];

    /// Lowercase name as written under the `lvl` key
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Numeric code of the level
    pub fn code(&self) -> i8 {
        *self as i8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i8> for Level {
    type Error = LogError;

    fn try_from(code: i8) -> Result<Self, LogError> {
        Level::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| LogError::InvalidLevel(code.to_string()))
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Accepts a level name (any case) or its numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i8>() {
            return Level::try_from(code);
        }

        match trimmed.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}
