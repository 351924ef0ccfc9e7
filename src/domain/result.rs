//! Result type alias for piilog

use super::errors::LogError;

/// Result type alias for piilog operations
///
/// # Examples
///
/// ```
/// use piilog::domain::{LogError, Result};
///
/// fn failing_function() -> Result<()> {
///     Err(LogError::Configuration("invalid PII mode".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LogError::Io("disk full".to_string()));
        assert!(result.is_err());
    }
}
