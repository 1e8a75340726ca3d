//! Raw record values.
//!
//! The core consumes records as mappings from field name to a raw, untyped
//! value. Type coercion is the job of each field rule, not of this module.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// A raw record: field name mapped to its raw value.
///
/// Keys absent from the map count as missing values during validation.
pub type Record = HashMap<String, RawValue>;

/// An untyped value as produced by a record source.
///
/// Variant order matters for untagged deserialization: integers are tried
/// before floats so `45` stays integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Explicit null (e.g. an empty CSV cell).
    Null,
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl RawValue {
    /// Whether this value counts as missing.
    ///
    /// Nulls and blank/whitespace-only strings are missing; everything else
    /// is present.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Numeric view of this value, if it has one.
    ///
    /// Text is parsed after trimming; non-finite floats yield `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => f.is_finite().then_some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_null() {
        assert!(RawValue::Null.is_missing());
    }

    #[test]
    fn test_missing_blank_text() {
        assert!(RawValue::from("").is_missing());
        assert!(RawValue::from("   ").is_missing());
        assert!(!RawValue::from("x").is_missing());
    }

    #[test]
    fn test_numbers_never_missing() {
        assert!(!RawValue::Int(0).is_missing());
        assert!(!RawValue::Float(0.0).is_missing());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(RawValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(RawValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(RawValue::from(" 1.25 ").as_f64(), Some(1.25));
        assert_eq!(RawValue::from("forty").as_f64(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(RawValue::Null.as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RawValue::Int(45).to_string(), "45");
        assert_eq!(RawValue::from("M").to_string(), "M");
        assert_eq!(RawValue::Null.to_string(), "");
    }

    #[test]
    fn test_untagged_deserialization() {
        let v: RawValue = serde_json::from_str("45").unwrap();
        assert_eq!(v, RawValue::Int(45));
        let v: RawValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(v, RawValue::Float(4.5));
        let v: RawValue = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(v, RawValue::Text("M".to_string()));
        let v: RawValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, RawValue::Null);
    }
}
