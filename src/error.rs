//! Error types for ehr-audit.
//!
//! Only configuration mistakes surface here. Data quality findings are
//! ordinary values (`ValidationError`) carried inside reports, never errors.

use std::path::PathBuf;

/// Result type alias for ehr-audit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ehr-audit operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV error while reading records.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Schema has no fields.
    #[error("schema has no fields")]
    EmptySchema,

    /// Field name appears more than once in a schema.
    #[error("duplicate field '{name}' in schema")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// Rule definition violates a construction invariant.
    #[error("invalid rule for field '{field}': {message}")]
    InvalidRule {
        /// The field the rule belongs to.
        field: String,
        /// Description of the violation.
        message: String,
    },

    /// Pattern rule failed to compile.
    #[error("invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        /// The field the pattern belongs to.
        field: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Malformed schema definition (JSON configuration).
    #[error("invalid schema definition: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a duplicate field error.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }

    /// Create an invalid rule error.
    pub fn invalid_rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/file");
        assert!(err.to_string().contains("/path/to/file"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_empty_schema() {
        let err = Error::EmptySchema;
        assert!(err.to_string().contains("no fields"));
    }

    #[test]
    fn test_duplicate_field() {
        let err = Error::duplicate_field("age");
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_invalid_rule() {
        let err = Error::invalid_rule("sex", "allowed_values requires categorical type");
        let msg = err.to_string();
        assert!(msg.contains("sex"));
        assert!(msg.contains("categorical"));
    }

    #[test]
    fn test_invalid_config() {
        let err = Error::invalid_config("missing 'fields' key");
        assert!(err.to_string().contains("missing 'fields' key"));
    }
}
