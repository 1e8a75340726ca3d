//! Record validation.
//!
//! Applies a [`RecordSchema`] to one record and collects every field-level
//! failure as data. Validation never aborts on bad values; a record with
//! errors simply produces an invalid [`RecordOutcome`].

use std::fmt;

use serde::Serialize;

use crate::{
    schema::RecordSchema,
    value::{RawValue, Record},
};

/// Severity of a validation failure.
///
/// Shape failures (wrong type or format) rank above domain failures, since
/// they usually point at ingestion bugs rather than odd measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Should be investigated.
    Medium,
    /// Likely an ingestion or mapping bug.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Kinds of field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was absent or blank.
    MissingRequired,
    /// A present value could not be coerced to the expected type.
    TypeMismatch,
    /// A well-typed numeric value fell outside its inclusive bounds.
    OutOfRange,
    /// A categorical value was not in the declared set.
    NotInAllowedSet,
    /// A text value did not fully match the declared pattern.
    PatternMismatch,
}

impl ErrorKind {
    /// Every kind, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::MissingRequired,
        Self::TypeMismatch,
        Self::OutOfRange,
        Self::NotInAllowedSet,
        Self::PatternMismatch,
    ];

    /// Get human-readable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::NotInAllowedSet => "not_in_allowed_set",
            Self::PatternMismatch => "pattern_mismatch",
        }
    }

    /// Severity of this failure kind.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::TypeMismatch | Self::PatternMismatch => Severity::High,
            Self::MissingRequired | Self::OutOfRange | Self::NotInAllowedSet => Severity::Medium,
        }
    }

    /// Whether this kind counts against the consistency score.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::TypeMismatch | Self::PatternMismatch)
    }

    /// Whether this kind counts against the accuracy score.
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::OutOfRange | Self::NotInAllowedSet)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single field-level validation failure. Immutable value object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// The field the failure belongs to.
    pub field: String,
    /// Kind of failure.
    pub kind: ErrorKind,
    /// The original input, unmodified, if any was present.
    pub raw_value: Option<RawValue>,
    /// Human-readable explanation.
    pub detail: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        kind: ErrorKind,
        raw_value: Option<RawValue>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            raw_value,
            detail: detail.into(),
        }
    }

    /// Severity of this failure.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// The validation outcome for one record. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// Position of the record in the source dataset.
    pub record_index: usize,
    /// True iff `errors` is empty.
    pub is_valid: bool,
    /// Field-level failures, in schema-declaration order.
    pub errors: Vec<ValidationError>,
}

impl RecordOutcome {
    /// Create an outcome from accumulated errors.
    #[must_use]
    pub fn from_errors(record_index: usize, errors: Vec<ValidationError>) -> Self {
        Self {
            record_index,
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Number of failures in this record.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Validate one record against a schema.
///
/// Pure function of its inputs: iterates every rule in schema-declaration
/// order, treats missing keys as absent values, and accumulates all errors.
/// Record keys absent from the schema are ignored; the schema defines the
/// validation scope.
#[must_use]
pub fn validate_record(
    schema: &RecordSchema,
    record: &Record,
    record_index: usize,
) -> RecordOutcome {
    let errors = schema
        .rules()
        .iter()
        .filter_map(|rule| rule.evaluate(record.get(rule.name())))
        .collect();
    RecordOutcome::from_errors(record_index, errors)
}
