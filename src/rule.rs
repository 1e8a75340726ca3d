//! Field rules.
//!
//! A [`FieldRule`] is one declarative constraint for one field: its expected
//! type, whether it is required, and at most one domain constraint (numeric
//! range, allowed set, or pattern) matching that type. Rules are built
//! through [`FieldRuleBuilder`] so invariant violations surface as
//! configuration errors before any data is validated.
//!
//! Evaluation is result-returning: `evaluate` yields at most one
//! [`ValidationError`] per field per record, checking required → type →
//! constraint and stopping at the first failure.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    validate::{ErrorKind, ValidationError},
    value::RawValue,
};

/// Date rules accept ISO 8601 calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expected type of a field, with one explicit coercion branch per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Whole number. Accepts integral floats and numeric strings.
    Integer,
    /// Floating-point number. Accepts integers and numeric strings.
    Float,
    /// Free text. Any present value stringifies.
    #[serde(rename = "string", alias = "text")]
    Text,
    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    Date,
    /// Text drawn from a declared set of values.
    Categorical,
}

impl FieldType {
    /// Get human-readable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "string",
            Self::Date => "date",
            Self::Categorical => "categorical",
        }
    }

    /// Check if values of this type are numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// The single domain constraint a rule may carry.
#[derive(Debug, Clone)]
enum Constraint {
    /// No constraint beyond the type itself.
    Unconstrained,
    /// Inclusive numeric bounds; either end may be open.
    Range { min: Option<f64>, max: Option<f64> },
    /// Set membership for categorical fields.
    AllowedValues(BTreeSet<String>),
    /// Full-match pattern for text fields. The source string is kept for
    /// error messages; the compiled regex is anchored.
    Pattern { regex: Regex, source: String },
}

/// A successfully coerced value, ready for its constraint check.
enum Coerced {
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

/// A single declarative constraint for one field.
///
/// Immutable once built. Construct via the typed entry points
/// ([`FieldRule::integer`], [`FieldRule::categorical`], ...) and finish with
/// [`FieldRuleBuilder::build`] or by handing the builder to a
/// [`SchemaBuilder`](crate::SchemaBuilder).
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    field_type: FieldType,
    required: bool,
    constraint: Constraint,
}

impl FieldRule {
    /// Start a rule for an integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder::new(name, FieldType::Integer)
    }

    /// Start a rule for a float field.
    #[must_use]
    pub fn float(name: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder::new(name, FieldType::Float)
    }

    /// Start a rule for a free-text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder::new(name, FieldType::Text)
    }

    /// Start a rule for a date field.
    #[must_use]
    pub fn date(name: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder::new(name, FieldType::Date)
    }

    /// Start a rule for a categorical field with its allowed values.
    #[must_use]
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> FieldRuleBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldRuleBuilder::new(name, FieldType::Categorical).allowed(values)
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expected field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether the field must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Evaluate this rule against a raw value.
    ///
    /// Returns at most one error: the first failing check in the order
    /// required → type coercion → domain constraint. Absent optional fields
    /// pass without further checks.
    #[must_use]
    pub fn evaluate(&self, raw: Option<&RawValue>) -> Option<ValidationError> {
        let Some(value) = raw.filter(|v| !v.is_missing()) else {
            if self.required {
                return Some(ValidationError::new(
                    &self.name,
                    ErrorKind::MissingRequired,
                    raw.cloned(),
                    format!("required field '{}' is missing", self.name),
                ));
            }
            return None;
        };

        match self.coerce(value) {
            Ok(coerced) => self.check_constraint(&coerced, value),
            Err(detail) => Some(ValidationError::new(
                &self.name,
                ErrorKind::TypeMismatch,
                Some(value.clone()),
                detail,
            )),
        }
    }

    /// Coerce a present raw value to this rule's type.
    ///
    /// Numeric strings parse; non-numeric strings are never forced. The raw
    /// value is reported unmodified on failure.
    fn coerce(&self, value: &RawValue) -> std::result::Result<Coerced, String> {
        match self.field_type {
            FieldType::Integer => match value {
                RawValue::Int(i) => Ok(Coerced::Number(*i as f64)),
                RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(Coerced::Number(*f)),
                RawValue::Text(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|i| Coerced::Number(i as f64))
                    .map_err(|_| format!("expected integer, got '{}'", value)),
                _ => Err(format!("expected integer, got '{}'", value)),
            },
            FieldType::Float => value
                .as_f64()
                .map(Coerced::Number)
                .ok_or_else(|| format!("expected float, got '{}'", value)),
            FieldType::Text | FieldType::Categorical => Ok(Coerced::Text(value.to_string())),
            FieldType::Date => match value {
                RawValue::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                    .map(Coerced::Date)
                    .map_err(|_| format!("expected date (YYYY-MM-DD), got '{}'", value)),
                _ => Err(format!("expected date (YYYY-MM-DD), got '{}'", value)),
            },
        }
    }

    /// Apply the populated constraint to a coerced value.
    fn check_constraint(&self, coerced: &Coerced, raw: &RawValue) -> Option<ValidationError> {
        match (&self.constraint, coerced) {
            (Constraint::Range { min, max }, Coerced::Number(n)) => {
                let below = min.is_some_and(|lo| *n < lo);
                let above = max.is_some_and(|hi| *n > hi);
                if below || above {
                    return Some(ValidationError::new(
                        &self.name,
                        ErrorKind::OutOfRange,
                        Some(raw.clone()),
                        format!(
                            "value {} outside range [{}, {}]",
                            n,
                            min.map_or_else(|| "-inf".to_string(), |v| v.to_string()),
                            max.map_or_else(|| "+inf".to_string(), |v| v.to_string()),
                        ),
                    ));
                }
                None
            }
            (Constraint::AllowedValues(allowed), Coerced::Text(t)) => {
                if !allowed.contains(t) {
                    let values: Vec<&str> = allowed.iter().map(String::as_str).collect();
                    return Some(ValidationError::new(
                        &self.name,
                        ErrorKind::NotInAllowedSet,
                        Some(raw.clone()),
                        format!("value '{}' not in allowed set {{{}}}", t, values.join(", ")),
                    ));
                }
                None
            }
            (Constraint::Pattern { regex, source }, Coerced::Text(t)) => {
                if !regex.is_match(t) {
                    return Some(ValidationError::new(
                        &self.name,
                        ErrorKind::PatternMismatch,
                        Some(raw.clone()),
                        format!("value '{}' does not match pattern '{}'", t, source),
                    ));
                }
                None
            }
            // Unconstrained, or a constraint/coercion pairing the builder
            // invariants rule out.
            _ => None,
        }
    }
}

/// Builder for a [`FieldRule`].
///
/// Setters record intent infallibly; [`build`](Self::build) enforces the
/// construction invariants: at most one constraint family populated, and the
/// family must match the field type.
#[derive(Debug, Clone)]
pub struct FieldRuleBuilder {
    name: String,
    field_type: FieldType,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    allowed: Option<BTreeSet<String>>,
    pattern: Option<String>,
}

impl FieldRuleBuilder {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            min: None,
            max: None,
            allowed: None,
            pattern: None,
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set an inclusive numeric range.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set an inclusive lower bound only.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set an inclusive upper bound only.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the allowed value set.
    #[must_use]
    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set a full-match pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Validate the invariants and produce the immutable rule.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when more than one constraint family is
    /// populated, when the family does not match the field type, when the
    /// range is inverted, or when the pattern fails to compile.
    pub fn build(self) -> Result<FieldRule> {
        let has_range = self.min.is_some() || self.max.is_some();
        let has_allowed = self.allowed.is_some();
        let has_pattern = self.pattern.is_some();

        let populated = usize::from(has_range) + usize::from(has_allowed) + usize::from(has_pattern);
        if populated > 1 {
            return Err(Error::invalid_rule(
                &self.name,
                "at most one of min/max, allowed_values, pattern may be set",
            ));
        }

        if has_range && !self.field_type.is_numeric() {
            return Err(Error::invalid_rule(
                &self.name,
                format!("min/max requires a numeric type, not {}", self.field_type.name()),
            ));
        }
        if has_allowed && self.field_type != FieldType::Categorical {
            return Err(Error::invalid_rule(
                &self.name,
                format!(
                    "allowed_values requires categorical type, not {}",
                    self.field_type.name()
                ),
            ));
        }
        if has_pattern && self.field_type != FieldType::Text {
            return Err(Error::invalid_rule(
                &self.name,
                format!("pattern requires string type, not {}", self.field_type.name()),
            ));
        }

        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(Error::invalid_rule(
                    &self.name,
                    format!("min {} exceeds max {}", lo, hi),
                ));
            }
        }

        let constraint = if has_range {
            Constraint::Range {
                min: self.min,
                max: self.max,
            }
        } else if let Some(allowed) = self.allowed {
            Constraint::AllowedValues(allowed)
        } else if let Some(source) = self.pattern {
            // Anchor for full-match semantics; `is_match` alone searches.
            let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
                Error::InvalidPattern {
                    field: self.name.clone(),
                    source: e,
                }
            })?;
            Constraint::Pattern { regex, source }
        } else {
            Constraint::Unconstrained
        };

        Ok(FieldRule {
            name: self.name,
            field_type: self.field_type,
            required: self.required,
            constraint,
        })
    }
}
