//! Statistical outlier detection for numeric fields.
//!
//! Flags values falling outside `Q1 - k*IQR` / `Q3 + k*IQR` per numeric
//! field across the whole dataset. Flags are informational: they ride on the
//! quality report but never move the completeness/consistency/accuracy
//! scores, which are defined purely by the validation error taxonomy.

// Statistical computation and internal methods
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::{
    schema::RecordSchema,
    value::{RawValue, Record},
};

/// Basic statistics for one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// 25th percentile (Q1)
    pub q1: f64,
    /// 50th percentile (median)
    pub median: f64,
    /// 75th percentile (Q3)
    pub q3: f64,
}

impl NumericSummary {
    /// Calculate IQR (Interquartile Range)
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lower outlier bound for a given IQR multiplier.
    #[must_use]
    pub fn lower_bound(&self, k: f64) -> f64 {
        self.q1 - k * self.iqr()
    }

    /// Upper outlier bound for a given IQR multiplier.
    #[must_use]
    pub fn upper_bound(&self, k: f64) -> f64 {
        self.q3 + k * self.iqr()
    }

    /// Summarize a sample. Returns `None` below `min_samples` values.
    #[must_use]
    pub fn from_values(values: &[f64], min_samples: usize) -> Option<Self> {
        if values.len() < min_samples.max(1) {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            std_dev: variance.sqrt(),
            q1: sorted[n / 4],
            median: sorted[n / 2],
            q3: sorted[3 * n / 4],
        })
    }
}

/// One flagged value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierFlag {
    /// Position of the record in the source dataset.
    pub record_index: usize,
    /// The numeric field the value belongs to.
    pub field: String,
    /// The flagged value.
    pub value: f64,
    /// Lower bound it was checked against.
    pub lower: f64,
    /// Upper bound it was checked against.
    pub upper: f64,
}

/// IQR-based outlier detector for the numeric fields of a schema.
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    k: f64,
    min_samples: usize,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlierDetector {
    /// Create a detector with the conventional 1.5x IQR fence and a minimum
    /// of 4 samples per field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            k: 1.5,
            min_samples: 4,
        }
    }

    /// Set the IQR multiplier.
    #[must_use]
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set the minimum sample count per field.
    #[must_use]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Summarize every numeric field with enough samples.
    ///
    /// Returns `(field name, summary)` pairs in schema-declaration order.
    #[must_use]
    pub fn summarize(&self, records: &[Record], schema: &RecordSchema) -> Vec<(String, NumericSummary)> {
        schema
            .rules()
            .iter()
            .filter(|rule| rule.field_type().is_numeric())
            .filter_map(|rule| {
                let values: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.get(rule.name()).and_then(RawValue::as_f64))
                    .collect();
                NumericSummary::from_values(&values, self.min_samples)
                    .map(|s| (rule.name().to_string(), s))
            })
            .collect()
    }

    /// Detect outliers across a dataset.
    ///
    /// Scans numeric fields in schema-declaration order and records in input
    /// order, so output is deterministic. Values that do not parse as
    /// numbers are skipped here; the validator already reports them.
    #[must_use]
    pub fn detect(&self, records: &[Record], schema: &RecordSchema) -> Vec<OutlierFlag> {
        let mut flags = Vec::new();

        for rule in schema.rules() {
            if !rule.field_type().is_numeric() {
                continue;
            }

            let samples: Vec<(usize, f64)> = records
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    r.get(rule.name())
                        .and_then(|v| v.as_f64())
                        .map(|n| (i, n))
                })
                .collect();

            let values: Vec<f64> = samples.iter().map(|(_, v)| *v).collect();
            let Some(summary) = NumericSummary::from_values(&values, self.min_samples) else {
                continue;
            };

            let lower = summary.lower_bound(self.k);
            let upper = summary.upper_bound(self.k);

            for (record_index, value) in samples {
                if value < lower || value > upper {
                    flags.push(OutlierFlag {
                        record_index,
                        field: rule.name().to_string(),
                        value,
                        lower,
                        upper,
                    });
                }
            }
        }

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rule::FieldRule, value::RawValue};

    fn schema() -> RecordSchema {
        RecordSchema::builder()
            .field(FieldRule::float("heart_rate"))
            .field(FieldRule::text("notes"))
            .build()
            .unwrap()
    }

    fn records(rates: &[f64]) -> Vec<Record> {
        rates
            .iter()
            .map(|&r| {
                [("heart_rate".to_string(), RawValue::Float(r))]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_summary_statistics() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let summary = NumericSummary::from_values(&values, 4).unwrap();
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 100.0);
        assert!((summary.mean - 50.0).abs() < 1e-9);
        assert_eq!(summary.q1, 25.0);
        assert_eq!(summary.median, 50.0);
        assert_eq!(summary.q3, 75.0);
        assert_eq!(summary.iqr(), 50.0);
        assert_eq!(summary.lower_bound(1.5), -50.0);
        assert_eq!(summary.upper_bound(1.5), 150.0);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(NumericSummary::from_values(&[1.0, 2.0, 3.0], 4).is_none());
    }

    #[test]
    fn test_detects_extreme_value() {
        let mut rates: Vec<f64> = vec![70.0, 72.0, 71.0, 69.0, 73.0, 68.0, 70.0];
        rates.push(500.0);
        let recs = records(&rates);

        let flags = OutlierDetector::new().detect(&recs, &schema());
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].record_index, 7);
        assert_eq!(flags[0].field, "heart_rate");
        assert_eq!(flags[0].value, 500.0);
    }

    #[test]
    fn test_uniform_data_clean() {
        let recs = records(&[70.0, 71.0, 72.0, 73.0, 70.0, 71.0]);
        let flags = OutlierDetector::new().detect(&recs, &schema());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_skips_below_min_samples() {
        let recs = records(&[70.0, 500.0]);
        let flags = OutlierDetector::new().detect(&recs, &schema());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_summarize_numeric_fields_only() {
        let recs = records(&[70.0, 71.0, 72.0, 73.0, 70.0]);
        let summaries = OutlierDetector::new().summarize(&recs, &schema());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].0, "heart_rate");
        assert_eq!(summaries[0].1.min, 70.0);
        assert_eq!(summaries[0].1.max, 73.0);
    }

    #[test]
    fn test_non_numeric_values_skipped() {
        let mut recs = records(&[70.0, 71.0, 72.0, 73.0, 70.0]);
        recs.push(
            [("heart_rate".to_string(), RawValue::from("fast"))]
                .into_iter()
                .collect(),
        );
        let flags = OutlierDetector::new().detect(&recs, &schema());
        assert!(flags.is_empty());
    }
}
