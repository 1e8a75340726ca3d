//! Quality metric aggregation.
//!
//! Turns per-record validation outcomes into dataset-level scores:
//!
//! - **Completeness**: fraction of required field slots actually present.
//! - **Consistency**: fraction of field slots whose present values match the
//!   expected type/format (type and pattern failures lower it).
//! - **Accuracy**: fraction of field slots whose present, well-typed values
//!   fall within the declared domain (range and set failures lower it).
//!
//! Each score lives in `[0.0, 1.0]` with `0/0 -> 1.0` (no data is trivially
//! satisfied). Denominators always span all slots; only a score's own error
//! kinds lower its numerator, so one failure never double-counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    outlier::OutlierFlag,
    schema::RecordSchema,
    validate::{ErrorKind, RecordOutcome, Severity},
};

/// The three quality scores plus the per-kind error tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scores {
    /// Fraction of required field slots present, in `[0.0, 1.0]`.
    pub completeness: f64,
    /// Fraction of field slots matching expected shape, in `[0.0, 1.0]`.
    pub consistency: f64,
    /// Fraction of field slots within the valid domain, in `[0.0, 1.0]`.
    pub accuracy: f64,
    /// Error count per kind, in kind order.
    pub error_breakdown: BTreeMap<ErrorKind, usize>,
}

/// Aggregate validation outcomes into scores.
///
/// Order-independent: the same multiset of outcomes yields the same scores.
#[must_use]
pub fn aggregate(outcomes: &[RecordOutcome], schema: &RecordSchema) -> Scores {
    let mut error_breakdown = BTreeMap::new();
    for outcome in outcomes {
        for error in &outcome.errors {
            *error_breakdown.entry(error.kind).or_insert(0) += 1;
        }
    }

    let count = |kind: ErrorKind| error_breakdown.get(&kind).copied().unwrap_or(0);
    let missing = count(ErrorKind::MissingRequired);
    let shape = count(ErrorKind::TypeMismatch) + count(ErrorKind::PatternMismatch);
    let domain = count(ErrorKind::OutOfRange) + count(ErrorKind::NotInAllowedSet);

    let field_slots = outcomes.len() * schema.len();
    let required_slots = outcomes.len() * schema.required_count();

    Scores {
        completeness: score(missing, required_slots),
        consistency: score(shape, field_slots),
        accuracy: score(domain, field_slots),
        error_breakdown,
    }
}

/// `1 - errors/slots`, with the empty denominator trivially satisfied.
fn score(errors: usize, slots: usize) -> f64 {
    if slots == 0 {
        1.0
    } else {
        1.0 - errors as f64 / slots as f64
    }
}

/// Dataset-level quality report.
///
/// Produced by a [`DatasetAuditor`](crate::DatasetAuditor) run; read-only to
/// callers afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Number of records audited.
    pub total_records: usize,
    /// Fraction of required field slots present, in `[0.0, 1.0]`.
    pub completeness_score: f64,
    /// Fraction of field slots matching expected shape, in `[0.0, 1.0]`.
    pub consistency_score: f64,
    /// Fraction of field slots within the valid domain, in `[0.0, 1.0]`.
    pub accuracy_score: f64,
    /// Error count per kind.
    pub error_breakdown: BTreeMap<ErrorKind, usize>,
    /// One outcome per record, in input order.
    pub per_record_outcomes: Vec<RecordOutcome>,
    /// Informational outlier flags; never move the three scores.
    pub outliers: Vec<OutlierFlag>,
}

impl QualityReport {
    /// Total validation error count across all records.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_breakdown.values().sum()
    }

    /// Number of records with at least one error.
    #[must_use]
    pub fn invalid_record_count(&self) -> usize {
        self.per_record_outcomes
            .iter()
            .filter(|o| !o.is_valid)
            .count()
    }

    /// Whether the dataset produced no errors at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    /// Render a plain-text summary of the report.
    #[must_use]
    pub fn summary(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        let _ = writeln!(out, "EHR Data Quality Report");
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out, "Records analyzed: {}", self.total_records);
        let _ = writeln!(out, "Records with issues: {}", self.invalid_record_count());
        let _ = writeln!(out);
        let _ = writeln!(out, "Quality Scores:");
        let _ = writeln!(out, "  Completeness: {:.2}%", self.completeness_score * 100.0);
        let _ = writeln!(out, "  Consistency:  {:.2}%", self.consistency_score * 100.0);
        let _ = writeln!(out, "  Accuracy:     {:.2}%", self.accuracy_score * 100.0);

        if !self.error_breakdown.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Error Breakdown:");
            for (kind, count) in &self.error_breakdown {
                let _ = writeln!(out, "  {:<20} {}", kind.name(), count);
            }
        }

        for severity in [Severity::High, Severity::Medium, Severity::Low] {
            let issues: Vec<_> = self
                .per_record_outcomes
                .iter()
                .flat_map(|o| o.errors.iter().map(move |e| (o.record_index, e)))
                .filter(|(_, e)| e.severity() == severity)
                .collect();
            if issues.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "{} severity issues:", severity.to_string().to_uppercase());
            for (index, error) in issues {
                let _ = writeln!(out, "  record {}: {} - {}", index, error.field, error.detail);
            }
        }

        if !self.outliers.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Outliers ({}):", self.outliers.len());
            for flag in &self.outliers {
                let _ = writeln!(
                    out,
                    "  record {}: {} = {} outside [{:.2}, {:.2}]",
                    flag.record_index, flag.field, flag.value, flag.lower, flag.upper
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rule::FieldRule,
        validate::{validate_record, ValidationError},
        value::{RawValue, Record},
    };

    fn demo_schema() -> RecordSchema {
        RecordSchema::builder()
            .field(FieldRule::integer("age").required().range(0.0, 120.0))
            .field(FieldRule::categorical("sex", ["M", "F"]).required())
            .build()
            .unwrap()
    }

    fn outcome(index: usize, errors: Vec<ValidationError>) -> RecordOutcome {
        RecordOutcome::from_errors(index, errors)
    }

    fn error(field: &str, kind: ErrorKind) -> ValidationError {
        ValidationError::new(field, kind, None, "test")
    }

    #[test]
    fn test_empty_outcomes_trivially_satisfied() {
        let scores = aggregate(&[], &demo_schema());
        assert_eq!(scores.completeness, 1.0);
        assert_eq!(scores.consistency, 1.0);
        assert_eq!(scores.accuracy, 1.0);
        assert!(scores.error_breakdown.is_empty());
    }

    #[test]
    fn test_mixed_dataset_scores() {
        // records: {age: 45, sex: M}, {age: -5, sex: M}, {sex: F}
        let schema = demo_schema();
        let records: Vec<Record> = vec![
            [("age", RawValue::Int(45)), ("sex", RawValue::from("M"))],
            [("age", RawValue::Int(-5)), ("sex", RawValue::from("M"))],
            [("age", RawValue::Null), ("sex", RawValue::from("F"))],
        ]
        .into_iter()
        .map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect()
        })
        .collect();

        let outcomes: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(i, r)| validate_record(&schema, r, i))
            .collect();

        assert!(outcomes[0].is_valid);
        assert_eq!(outcomes[1].errors[0].kind, ErrorKind::OutOfRange);
        assert_eq!(outcomes[2].errors[0].kind, ErrorKind::MissingRequired);

        let scores = aggregate(&outcomes, &schema);
        assert!((scores.completeness - 5.0 / 6.0).abs() < 1e-9);
        assert!((scores.accuracy - 5.0 / 6.0).abs() < 1e-9);
        assert_eq!(scores.consistency, 1.0);
    }

    #[test]
    fn test_no_cross_dimension_double_counting() {
        // One missing-required error lowers completeness only.
        let schema = demo_schema();
        let outcomes = vec![outcome(0, vec![error("age", ErrorKind::MissingRequired)])];
        let scores = aggregate(&outcomes, &schema);
        assert!(scores.completeness < 1.0);
        assert_eq!(scores.consistency, 1.0);
        assert_eq!(scores.accuracy, 1.0);
    }

    #[test]
    fn test_shape_errors_lower_consistency_only() {
        let schema = demo_schema();
        let outcomes = vec![outcome(
            0,
            vec![
                error("age", ErrorKind::TypeMismatch),
                error("sex", ErrorKind::PatternMismatch),
            ],
        )];
        let scores = aggregate(&outcomes, &schema);
        assert_eq!(scores.completeness, 1.0);
        assert_eq!(scores.accuracy, 1.0);
        // 2 shape errors over 2 field slots
        assert!(scores.consistency.abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_tallies_every_kind() {
        let schema = demo_schema();
        let outcomes = vec![
            outcome(0, vec![error("age", ErrorKind::OutOfRange)]),
            outcome(1, vec![error("age", ErrorKind::OutOfRange)]),
            outcome(2, vec![error("sex", ErrorKind::NotInAllowedSet)]),
        ];
        let scores = aggregate(&outcomes, &schema);
        assert_eq!(scores.error_breakdown[&ErrorKind::OutOfRange], 2);
        assert_eq!(scores.error_breakdown[&ErrorKind::NotInAllowedSet], 1);
        assert_eq!(scores.error_breakdown.len(), 2);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let schema = demo_schema();
        // Every slot fails its domain check.
        let outcomes: Vec<_> = (0..4)
            .map(|i| {
                outcome(
                    i,
                    vec![
                        error("age", ErrorKind::OutOfRange),
                        error("sex", ErrorKind::NotInAllowedSet),
                    ],
                )
            })
            .collect();
        let scores = aggregate(&outcomes, &schema);
        assert!((0.0..=1.0).contains(&scores.accuracy));
        assert_eq!(scores.accuracy, 0.0);
    }

    #[test]
    fn test_report_helpers() {
        let schema = demo_schema();
        let outcomes = vec![
            outcome(0, vec![]),
            outcome(1, vec![error("age", ErrorKind::OutOfRange)]),
        ];
        let scores = aggregate(&outcomes, &schema);
        let report = QualityReport {
            total_records: 2,
            completeness_score: scores.completeness,
            consistency_score: scores.consistency,
            accuracy_score: scores.accuracy,
            error_breakdown: scores.error_breakdown,
            per_record_outcomes: outcomes,
            outliers: Vec::new(),
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.invalid_record_count(), 1);
        assert!(!report.is_clean());

        let summary = report.summary();
        assert!(summary.contains("Records analyzed: 2"));
        assert!(summary.contains("out_of_range"));
        assert!(summary.contains("MEDIUM severity issues:"));
    }
}
