//! ehr-audit - Rule-Based Quality Auditing for EHR Datasets
//!
//! Assesses the quality of Electronic Health Record datasets supplied as
//! tabular records, scoring them along completeness, consistency, and
//! accuracy dimensions and reporting per-field validation failures.
//!
//! # Design Principles
//!
//! 1. **Bad data is data** - validation failures are collected and scored,
//!    never raised; only configuration mistakes abort a run
//! 2. **Explicit coercion** - every field type has one testable coercion
//!    branch, no implicit library magic
//! 3. **Deterministic** - records are processed sequentially in input order,
//!    so reports are bit-identical across runs
//!
//! # Quick Start
//!
//! ```
//! use ehr_audit::{DatasetAuditor, FieldRule, RawValue, Record, RecordSchema};
//!
//! let schema = RecordSchema::builder()
//!     .field(FieldRule::integer("age").required().range(0.0, 120.0))
//!     .field(FieldRule::categorical("sex", ["M", "F"]).required())
//!     .build()
//!     .unwrap();
//!
//! let mut record = Record::new();
//! record.insert("age".to_string(), RawValue::Int(45));
//! record.insert("sex".to_string(), RawValue::from("M"));
//!
//! let auditor = DatasetAuditor::new(schema).unwrap();
//! let report = auditor.run(&[record]);
//! assert_eq!(report.total_records, 1);
//! assert!((report.accuracy_score - 1.0).abs() < 1e-9);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::too_many_lines
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod dataset;
pub mod error;
pub mod outlier;
pub mod rule;
pub mod schema;
pub mod score;
pub mod validate;
pub mod value;

// Re-exports for convenience
pub use audit::DatasetAuditor;
pub use dataset::{records_from_csv_path, records_from_csv_reader, records_from_csv_str};
pub use error::{Error, Result};
pub use outlier::{NumericSummary, OutlierDetector, OutlierFlag};
pub use rule::{FieldRule, FieldRuleBuilder, FieldType};
pub use schema::{RecordSchema, SchemaBuilder};
pub use score::{aggregate, QualityReport, Scores};
pub use validate::{validate_record, ErrorKind, RecordOutcome, Severity, ValidationError};
pub use value::{RawValue, Record};
