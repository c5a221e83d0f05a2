//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing callers to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Scene keys are positional: `scene1`, `scene2`, ...
    #[error("Invalid scene key: {0}")]
    InvalidSceneKey(String),

    /// Draft editors address list entries by position
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl DomainError {
    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_scene_key(key: impl Into<String>) -> Self {
        Self::InvalidSceneKey(key.into())
    }

    pub fn index_out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown scene mode: v9");
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Unknown scene mode: v9");
    }

    #[test]
    fn test_index_out_of_range_error() {
        let err = DomainError::index_out_of_range("chain", 3, 2);
        assert_eq!(err.to_string(), "chain index 3 out of range (len 2)");
    }
}
