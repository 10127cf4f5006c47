//! Error types for greedyviz.
//!
//! Navigation never fails: out-of-range moves are clamped no-ops. Errors only
//! exist at the edges where outside data enters the system (configuration
//! files, dataset files, CLI output).

use thiserror::Error;

/// Result type alias for greedyviz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Unified error type for greedyviz.
#[derive(Debug, Error)]
pub enum VizError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== Dataset Errors =====
    /// A loaded dataset violates an instance invariant.
    #[error("Dataset error: {message}")]
    Dataset {
        /// Description of the offending element.
        message: String,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VizError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error with a message.
    #[must_use]
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether the error was caused by user-supplied input rather than the
    /// environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::YamlParse(_) | Self::Validation(_) | Self::Dataset { .. }
        )
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config() {
        let err = VizError::config("interval bounds inverted");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("interval bounds inverted"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_error_dataset() {
        let err = VizError::dataset("item B has zero weight");
        let msg = err.to_string();
        assert!(msg.contains("Dataset error"));
        assert!(msg.contains("item B"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let err = VizError::serialization("failed to serialize");
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_io() {
        let err = VizError::Io(std::io::Error::other("disk gone"));
        assert!(!err.is_input_error());
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("disk gone"));
    }

    #[test]
    fn test_error_from_yaml() {
        let bad: Result<Vec<u32>, _> = serde_yaml::from_str("{{{{not yaml");
        let err = VizError::from(bad.unwrap_err());
        assert!(err.to_string().contains("YAML parsing error"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_error_from_json() {
        let bad: Result<Vec<u32>, _> = serde_json::from_str("[1,");
        let err = VizError::from(bad.unwrap_err());
        assert!(matches!(err, VizError::Serialization(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = VizError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
