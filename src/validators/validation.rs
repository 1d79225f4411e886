//! Validation results
//!
//! The outcome of one `validate` call: the cast value plus either success or
//! a structured failure. Fields are private so `status` and `failure` can
//! never disagree.

use super::exceptions::Failure;
use serde_json::Value;

/// Outcome of validating one value
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    value: Value,
    failure: Option<Failure>,
}

impl ValidationResult {
    /// A successful outcome carrying the cast value
    pub fn success(value: Value) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    /// A failed outcome; `value` is whatever the validator had at hand and
    /// must not be trusted by callers
    pub fn fail(value: Value, failure: Failure) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    /// Whether validation passed
    pub fn status(&self) -> bool {
        self.failure.is_none()
    }

    /// Whether validation passed
    pub fn is_valid(&self) -> bool {
        self.status()
    }

    /// The cast value (meaningful only on success)
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The failure, if validation did not pass
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Consume the result, keeping the value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Consume the result into its parts
    pub fn into_parts(self) -> (Value, Option<Failure>) {
        (self.value, self.failure)
    }

    /// Convert into a std `Result`, cast value on success
    pub fn into_result(self) -> std::result::Result<Value, Failure> {
        match self.failure {
            None => Ok(self.value),
            Some(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::exceptions::FailureKind;
    use serde_json::json;

    #[test]
    fn test_success_invariant() {
        let result = ValidationResult::success(json!(5));
        assert!(result.status());
        assert!(result.failure().is_none());
        assert_eq!(result.value(), &json!(5));
        assert_eq!(result.into_result(), Ok(json!(5)));
    }

    #[test]
    fn test_failure_invariant() {
        let result = ValidationResult::fail(json!("x"), Failure::new(FailureKind::Type, ""));
        assert!(!result.is_valid());
        assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::Type));

        let (value, failure) = result.into_parts();
        assert_eq!(value, json!("x"));
        assert!(failure.is_some());
    }
}
