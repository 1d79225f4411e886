//! Constraining facets
//!
//! Leaf checks shared by several validator kinds. Each facet is validated at
//! construction and checks one already-cast value, returning the failure
//! that describes the violated keyword.

use super::exceptions::{Failure, FailureKind};
use super::helpers::{compare_numbers, number_from_f64};
use crate::error::{Error, Result};
use crate::locations::InstancePath;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Number;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Outcome of a single facet check
pub type CheckResult = std::result::Result<(), Failure>;

// =============================================================================
// Numeric Range
// =============================================================================

/// Numeric bounds shared by number, integer and unsigned integer validators
///
/// Bounds are kept as JSON numbers and compared exactly, so integer bounds
/// beyond 2^53 and unsigned values above `i64::MAX` are not rounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericRange {
    /// Lower bound
    pub minimum: Option<Number>,
    /// Upper bound
    pub maximum: Option<Number>,
    /// Whether the lower bound itself is rejected
    pub exclusive_minimum: bool,
    /// Whether the upper bound itself is rejected
    pub exclusive_maximum: bool,
    /// Values must be an integral multiple of this
    pub multiple_of: Option<Number>,
}

/// Convert a float bound given in code; fails if it is not finite
pub fn float_bound(value: f64) -> Result<Number> {
    number_from_f64(value)
        .ok_or_else(|| Error::Value(format!("Numeric bound {} is not finite", value)))
}

impl NumericRange {
    /// Create a range; fails if `maximum < minimum`
    pub fn new(minimum: Option<Number>, maximum: Option<Number>) -> Result<Self> {
        if let (Some(min), Some(max)) = (&minimum, &maximum) {
            if compare_numbers(max, min) == Some(Ordering::Less) {
                return Err(Error::Value(format!(
                    "maximum {} is lower than minimum {}",
                    max, min
                )));
            }
        }
        Ok(Self {
            minimum,
            maximum,
            ..Default::default()
        })
    }

    /// Set whether the lower bound is exclusive
    pub fn with_exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    /// Set whether the upper bound is exclusive
    pub fn with_exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    /// Set the divisor; must be greater than zero
    pub fn with_multiple_of(mut self, multiple_of: Number) -> Result<Self> {
        if compare_numbers(&multiple_of, &Number::from(0)) != Some(Ordering::Greater) {
            return Err(Error::Value(format!(
                "multipleOf must be greater than 0, got {}",
                multiple_of
            )));
        }
        self.multiple_of = Some(multiple_of);
        Ok(self)
    }

    /// Check a cast number against the range
    pub fn check(&self, value: &Number, path: &InstancePath) -> CheckResult {
        if let Some(min) = &self.minimum {
            let order = compare_numbers(value, min);
            if self.exclusive_minimum && order != Some(Ordering::Greater) {
                return Err(Failure::new(FailureKind::ExclusiveMinimum, path.to_pointer())
                    .with_message(format!("{} is not greater than {}", value, min)));
            }
            if order == Some(Ordering::Less) {
                return Err(Failure::new(FailureKind::Minimum, path.to_pointer())
                    .with_message(format!("{} is lower than minimum {}", value, min)));
            }
        }

        if let Some(max) = &self.maximum {
            let order = compare_numbers(value, max);
            if self.exclusive_maximum && order != Some(Ordering::Less) {
                return Err(Failure::new(FailureKind::ExclusiveMaximum, path.to_pointer())
                    .with_message(format!("{} is not lower than {}", value, max)));
            }
            if order == Some(Ordering::Greater) {
                return Err(Failure::new(FailureKind::Maximum, path.to_pointer())
                    .with_message(format!("{} is greater than maximum {}", value, max)));
            }
        }

        if let Some(divisor) = &self.multiple_of {
            if !is_multiple_of(value, divisor) {
                return Err(Failure::new(FailureKind::MultipleOf, path.to_pointer())
                    .with_message(format!("{} is not a multiple of {}", value, divisor)));
            }
        }

        Ok(())
    }
}

/// Check divisibility in decimal arithmetic, so 0.3 is a multiple of 0.1
/// and large integers stay exact. Values outside the decimal range fall back
/// to a relative float tolerance.
pub fn is_multiple_of(value: &Number, divisor: &Number) -> bool {
    let exact = (
        Decimal::from_str(&value.to_string()),
        Decimal::from_str(&divisor.to_string()),
    );
    if let (Ok(v), Ok(d)) = exact {
        if !d.is_zero() {
            if let Some(rem) = v.checked_rem(d) {
                return rem.is_zero();
            }
        }
    }

    let (Some(value), Some(divisor)) = (value.as_f64(), divisor.as_f64()) else {
        return false;
    };
    let quotient = value / divisor;
    (quotient - quotient.round()).abs() <= f64::EPSILON * quotient.abs().max(1.0)
}

// =============================================================================
// Length Range
// =============================================================================

/// Count bounds (string length, item count, property count)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthRange {
    /// Minimum count
    pub min: usize,
    /// Maximum count
    pub max: Option<usize>,
}

impl LengthRange {
    /// Create a range; fails if `max < min`
    pub fn new(min: usize, max: Option<usize>) -> Result<Self> {
        if let Some(max) = max {
            if max < min {
                return Err(Error::Value(format!(
                    "maximum length {} is lower than minimum length {}",
                    max, min
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Check a count, reporting `min_kind` or `max_kind` on violation
    pub fn check(
        &self,
        count: usize,
        path: &InstancePath,
        min_kind: FailureKind,
        max_kind: FailureKind,
    ) -> CheckResult {
        if count < self.min {
            return Err(Failure::new(min_kind, path.to_pointer())
                .with_message(format!("count {} is lower than {}", count, self.min)));
        }
        if let Some(max) = self.max {
            if count > max {
                return Err(Failure::new(max_kind, path.to_pointer())
                    .with_message(format!("count {} is greater than {}", count, max)));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// Pattern facet using regular expressions (unanchored search)
#[derive(Debug, Clone)]
pub struct PatternFacet {
    /// Regular expression pattern
    pub pattern: String,
    /// Compiled regex
    regex: Regex,
}

impl PatternFacet {
    /// Create a new pattern facet
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Value(format!("Invalid pattern '{}': {}", pattern, e)))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check if a value matches
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Check a value against this pattern
    pub fn check(&self, value: &str, path: &InstancePath) -> CheckResult {
        if self.is_match(value) {
            Ok(())
        } else {
            Err(Failure::new(FailureKind::Pattern, path.to_pointer())
                .with_message(format!("'{}' does not match pattern '{}'", value, self.pattern)))
        }
    }
}

impl PartialEq for PatternFacet {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

// =============================================================================
// Format Range
// =============================================================================

/// A date or datetime bound, kept with its source spelling for export
#[derive(Debug, Clone, PartialEq)]
pub struct FormatBound<T> {
    /// Spelling found in the schema
    pub raw: String,
    /// Parsed bound
    pub value: T,
}

/// Inclusive bounds over parsed dates or datetimes
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRange<T> {
    /// Earliest accepted value
    pub minimum: Option<FormatBound<T>>,
    /// Latest accepted value
    pub maximum: Option<FormatBound<T>>,
}

impl<T> Default for FormatRange<T> {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
        }
    }
}

impl<T: PartialOrd + fmt::Display> FormatRange<T> {
    /// Check that `maximum` is not before `minimum`
    pub fn check_bounds(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (&self.minimum, &self.maximum) {
            if max.value < min.value {
                return Err(Error::Value(format!(
                    "formatMaximum {} is before formatMinimum {}",
                    max.raw, min.raw
                )));
            }
        }
        Ok(())
    }

    /// Check a parsed value against the bounds
    pub fn check(&self, value: &T, path: &InstancePath) -> CheckResult {
        if let Some(min) = &self.minimum {
            if *value < min.value {
                return Err(Failure::new(FailureKind::FormatMinimum, path.to_pointer())
                    .with_message(format!("{} is before {}", value, min.raw)));
            }
        }
        if let Some(max) = &self.maximum {
            if *value > max.value {
                return Err(Failure::new(FailureKind::FormatMaximum, path.to_pointer())
                    .with_message(format!("{} is after {}", value, max.raw)));
            }
        }
        Ok(())
    }
}
