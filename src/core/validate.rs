//! Comparison validation collaborator.
//!
//! Validation is a parallel concern to the response pipeline: a validator
//! checks a candidate value against a comparison target and, on failure,
//! produces a [`ValidationFailure`] carrying a message key and an error-code
//! tag. The failure converts into a [`ResponseStatus`](crate::response::ResponseStatus)
//! that the responder renders as a structured error body in the negotiated
//! format, through the same header-setting and streaming machinery as a
//! success response.
//!
//! # Comparison Types
//!
//! | Operator | Tag | Satisfied when |
//! |----------|-----|----------------|
//! | `<` | [`Comparison::LessThan`] | candidate < target |
//! | `<=` | [`Comparison::LessThanOrEqual`] | candidate <= target |
//! | `>` | [`Comparison::GreaterThan`] | candidate > target |
//! | `>=` | [`Comparison::GreaterThanOrEqual`] | candidate >= target |
//! | `==` | [`Comparison::Equal`] | candidate == target |
//! | `!=` | [`Comparison::NotEqual`] | candidate != target |
//!
//! # Examples
//!
//! ```
//! use wireform::core::validate::{Comparison, ComparisonValidator, ComparisonValue};
//!
//! let validator = ComparisonValidator::new(Comparison::LessThan, ComparisonValue::from(100));
//!
//! assert!(validator.is_valid(&ComparisonValue::from(42)));
//! assert!(!validator.is_valid(&ComparisonValue::from(100)));
//!
//! let failure = validator.validate("age", &ComparisonValue::from(150)).unwrap();
//! assert_eq!(failure.error_code, "LessThan");
//! ```
//!
//! # Behavior Notes
//!
//! - Ordering comparisons between different value kinds are not satisfiable
//!   and report invalid
//! - `Equal`/`NotEqual` use plain equality, so cross-kind `NotEqual` holds
//! - Integers and floats compare numerically across kinds

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WireformError};
use crate::response::ResponseStatus;

/// The comparison operator family, collapsed into a tagged variant.
///
/// Each variant doubles as the error-code tag on a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// Candidate must be strictly less than the target
    LessThan,
    /// Candidate must be less than or equal to the target
    LessThanOrEqual,
    /// Candidate must be strictly greater than the target
    GreaterThan,
    /// Candidate must be greater than or equal to the target
    GreaterThanOrEqual,
    /// Candidate must equal the target
    Equal,
    /// Candidate must not equal the target
    NotEqual,
}

impl Comparison {
    /// Returns the error-code tag attached to failures.
    pub fn error_code(&self) -> &'static str {
        match self {
            Comparison::LessThan => "LessThan",
            Comparison::LessThanOrEqual => "LessThanOrEqual",
            Comparison::GreaterThan => "GreaterThan",
            Comparison::GreaterThanOrEqual => "GreaterThanOrEqual",
            Comparison::Equal => "Equal",
            Comparison::NotEqual => "NotEqual",
        }
    }

    /// Returns the localization key for the failure message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Comparison::LessThan => "lessthan_error",
            Comparison::LessThanOrEqual => "lessthanorequal_error",
            Comparison::GreaterThan => "greaterthan_error",
            Comparison::GreaterThanOrEqual => "greaterthanorequal_error",
            Comparison::Equal => "equal_error",
            Comparison::NotEqual => "notequal_error",
        }
    }

    /// The single dispatch point for all six operators.
    fn satisfied(&self, ordering: Option<Ordering>, equal: bool) -> bool {
        match self {
            Comparison::LessThan => ordering == Some(Ordering::Less),
            Comparison::LessThanOrEqual => {
                matches!(ordering, Some(Ordering::Less | Ordering::Equal))
            }
            Comparison::GreaterThan => ordering == Some(Ordering::Greater),
            Comparison::GreaterThanOrEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
            Comparison::Equal => equal,
            Comparison::NotEqual => !equal,
        }
    }

    /// Returns the message template phrase for this operator.
    fn phrase(&self) -> &'static str {
        match self {
            Comparison::LessThan => "must be less than",
            Comparison::LessThanOrEqual => "must be less than or equal to",
            Comparison::GreaterThan => "must be greater than",
            Comparison::GreaterThanOrEqual => "must be greater than or equal to",
            Comparison::Equal => "must be equal to",
            Comparison::NotEqual => "must not be equal to",
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.error_code())
    }
}

/// A typed value usable on either side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonValue {
    /// A signed integer
    Integer(i64),
    /// A floating-point number
    Float(f64),
    /// A text value (ordered lexicographically)
    Text(String),
    /// A UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl ComparisonValue {
    /// Parses a `YYYY-MM-DD` date into a timestamp at start of day.
    ///
    /// # Errors
    ///
    /// Returns [`WireformError::InvalidDate`] if the format is invalid.
    pub fn from_date(date_str: &str) -> Result<Self> {
        let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| WireformError::invalid_date(date_str))?;
        let naive_dt = naive.and_hms_opt(0, 0, 0).unwrap();
        Ok(ComparisonValue::Timestamp(naive_dt.and_utc()))
    }

    /// Compares two values of compatible kinds.
    ///
    /// Integers and floats compare numerically; text compares
    /// lexicographically; timestamps chronologically. Incompatible kinds
    /// return `None`.
    fn compare(&self, other: &ComparisonValue) -> Option<Ordering> {
        use ComparisonValue::{Float, Integer, Text, Timestamp};
        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComparisonValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonValue::Integer(v) => write!(f, "{v}"),
            ComparisonValue::Float(v) => write!(f, "{v}"),
            ComparisonValue::Text(v) => f.write_str(v),
            ComparisonValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<i64> for ComparisonValue {
    fn from(v: i64) -> Self {
        ComparisonValue::Integer(v)
    }
}

impl From<f64> for ComparisonValue {
    fn from(v: f64) -> Self {
        ComparisonValue::Float(v)
    }
}

impl From<&str> for ComparisonValue {
    fn from(v: &str) -> Self {
        ComparisonValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for ComparisonValue {
    fn from(v: DateTime<Utc>) -> Self {
        ComparisonValue::Timestamp(v)
    }
}

/// Validates candidates against a fixed comparison target.
///
/// One validator instance covers all six operators through the
/// [`Comparison`] tag; there is no per-operator type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonValidator {
    comparison: Comparison,
    target: ComparisonValue,
}

impl ComparisonValidator {
    /// Creates a validator for the given operator and target.
    pub fn new(comparison: Comparison, target: ComparisonValue) -> Self {
        Self { comparison, target }
    }

    /// Returns the operator tag.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Returns the comparison target.
    pub fn target(&self) -> &ComparisonValue {
        &self.target
    }

    /// Returns `true` if the candidate satisfies the comparison.
    pub fn is_valid(&self, candidate: &ComparisonValue) -> bool {
        let ordering = candidate.compare(&self.target);
        self.comparison
            .satisfied(ordering, candidate == &self.target)
    }

    /// Validates a named field, returning the failure if any.
    pub fn validate(&self, field: &str, candidate: &ComparisonValue) -> Option<ValidationFailure> {
        if self.is_valid(candidate) {
            return None;
        }
        Some(ValidationFailure {
            field: field.to_string(),
            error_code: self.comparison.error_code().to_string(),
            message_key: self.comparison.message_key().to_string(),
            message: format!("'{}' {} '{}'.", field, self.comparison.phrase(), self.target),
        })
    }
}

/// A failed validation: the error-code tag, the localization key, and the
/// resolved default message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The field that failed
    pub field: String,
    /// The error-code tag (the comparison name)
    pub error_code: String,
    /// The localization key for the message
    pub message_key: String,
    /// The default English message
    pub message: String,
}

impl ValidationFailure {
    /// Converts the failure into a response status for the error pipeline.
    pub fn to_status(&self) -> ResponseStatus {
        ResponseStatus::new(&self.error_code, &self.message)
    }
}
