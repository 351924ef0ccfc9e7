//! PII modes

use crate::domain::LogError;
use std::fmt;
use std::str::FromStr;

/// How a logger renders PII fields
///
/// Custom resolvers receive the mode verbatim and must handle every variant,
/// including ones added in later versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
#[non_exhaustive]
pub enum PiiMode {
    /// Fields are written as is
    #[default]
    None = 0,
    /// The value is replaced by its SHA-256 digest in lowercase hex; the key stays
    Hash = 1,
    /// The field is handed to the mask function; without one it is omitted
    Mask = 2,
    /// The field is omitted
    Remove = 3,
}

impl PiiMode {
    /// All defined modes
    pub const ALL: [PiiMode; 4] = [PiiMode::None, PiiMode::Hash, PiiMode::Mask, PiiMode::Remove];

    pub fn as_str(&self) -> &'static str {
        match self {
            PiiMode::None => "none",
            PiiMode::Hash => "hash",
            PiiMode::Mask => "mask",
            PiiMode::Remove => "remove",
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for PiiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for PiiMode {
    type Error = LogError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PiiMode::ALL
            .into_iter()
            .find(|mode| mode.code() == code)
            .ok_or_else(|| LogError::InvalidPiiMode(code.to_string()))
    }
}

impl FromStr for PiiMode {
    type Err = LogError;

    /// Accepts a mode name (any case) or its numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return PiiMode::try_from(code);
        }

        match trimmed.to_lowercase().as_str() {
            "none" => Ok(PiiMode::None),
            "hash" => Ok(PiiMode::Hash),
            "mask" => Ok(PiiMode::Mask),
            "remove" => Ok(PiiMode::Remove),
            _ => Err(LogError::InvalidPiiMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("none", PiiMode::None)]
    #[test_case("HASH", PiiMode::Hash)]
    #[test_case("Mask", PiiMode::Mask)]
    #[test_case("remove", PiiMode::Remove)]
    #[test_case("0", PiiMode::None)]
    #[test_case("3", PiiMode::Remove)]
    fn test_parse_mode_valid(input: &str, expected: PiiMode) {
        assert_eq!(input.parse::<PiiMode>().unwrap(), expected);
    }

    #[test_case("redact")]
    #[test_case("")]
    #[test_case("4")]
    #[test_case("255")]
    fn test_parse_mode_invalid(input: &str) {
        assert!(matches!(
            input.parse::<PiiMode>(),
            Err(LogError::InvalidPiiMode(_))
        ));
    }

    #[test]
    fn test_default_mode_is_none() {
        assert_eq!(PiiMode::default(), PiiMode::None);
    }
}
