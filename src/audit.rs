//! Dataset audit runner.
//!
//! Orchestrates validation and aggregation over a materialized dataset.
//! Configuration mistakes (an empty schema) fail fast at construction; bad
//! record data never fails a run, it only lowers scores.

use crate::{
    error::{Error, Result},
    outlier::OutlierDetector,
    schema::RecordSchema,
    score::{aggregate, QualityReport},
    validate::validate_record,
    value::Record,
};

/// Runs a full quality audit over a dataset.
///
/// # Example
///
/// ```
/// use ehr_audit::{DatasetAuditor, FieldRule, RecordSchema};
///
/// let schema = RecordSchema::builder()
///     .field(FieldRule::integer("age").required().range(0.0, 120.0))
///     .build()
///     .unwrap();
/// let auditor = DatasetAuditor::new(schema).unwrap();
/// let report = auditor.run(&[]);
/// assert_eq!(report.total_records, 0);
/// assert_eq!(report.completeness_score, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetAuditor {
    schema: RecordSchema,
    detect_outliers: bool,
    detector: OutlierDetector,
}

impl DatasetAuditor {
    /// Create an auditor for a schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySchema`] when the schema declares no fields; an
    /// audit against nothing is a configuration mistake, not a clean run.
    pub fn new(schema: RecordSchema) -> Result<Self> {
        if schema.is_empty() {
            return Err(Error::EmptySchema);
        }
        Ok(Self {
            schema,
            detect_outliers: false,
            detector: OutlierDetector::new(),
        })
    }

    /// Enable or disable IQR outlier detection.
    #[must_use]
    pub fn with_outlier_detection(mut self, enabled: bool) -> Self {
        self.detect_outliers = enabled;
        self
    }

    /// Replace the outlier detector configuration.
    #[must_use]
    pub fn with_detector(mut self, detector: OutlierDetector) -> Self {
        self.detector = detector;
        self
    }

    /// The schema this auditor validates against.
    #[must_use]
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Audit a dataset.
    ///
    /// Validates every record sequentially in input order (so
    /// `record_index` assignment and report ordering are deterministic),
    /// aggregates the outcomes into scores, and finalizes the report.
    /// Infallible: bad data is measured, never raised.
    #[must_use]
    pub fn run(&self, records: &[Record]) -> QualityReport {
        let outcomes: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(index, record)| validate_record(&self.schema, record, index))
            .collect();

        let scores = aggregate(&outcomes, &self.schema);

        let outliers = if self.detect_outliers {
            self.detector.detect(records, &self.schema)
        } else {
            Vec::new()
        };

        QualityReport {
            total_records: records.len(),
            completeness_score: scores.completeness,
            consistency_score: scores.consistency,
            accuracy_score: scores.accuracy,
            error_breakdown: scores.error_breakdown,
            per_record_outcomes: outcomes,
            outliers,
        }
    }
}
