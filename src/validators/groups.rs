//! Composition validators
//!
//! This module implements boolean composition over a list of child
//! validators:
//! - anyOf - at least one child accepts the value
//! - allOf - every child accepts the value
//! - oneOf - exactly one child accepts the value
//!
//! Every child is evaluated on the same input, independently. `not` is a
//! common keyword (see [`Common`]), not a compositor.

use super::base::{impl_with_common, Common, Validator, ValidatorRef};
use super::builders::{BuildContext, FromDocument};
use super::builtins::{KW_ALL_OF, KW_ANY_OF, KW_ONE_OF};
use super::exceptions::{Failure, FailureKind};
use super::validation::ValidationResult;
use crate::error::{Error, Result};
use crate::locations::InstancePath;
use serde_json::{Map, Value};
use std::fmt;

/// How many children must accept a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compositor {
    /// At least one child
    AnyOf,
    /// Every child
    AllOf,
    /// Exactly one child
    OneOf,
}

impl Compositor {
    /// Parse from a schema keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            KW_ANY_OF => Some(Self::AnyOf),
            KW_ALL_OF => Some(Self::AllOf),
            KW_ONE_OF => Some(Self::OneOf),
            _ => None,
        }
    }

    /// Schema keyword holding the children
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AnyOf => KW_ANY_OF,
            Self::AllOf => KW_ALL_OF,
            Self::OneOf => KW_ONE_OF,
        }
    }

    /// Failure kind reported when the composition rejects a value
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AnyOf => FailureKind::AnyOf,
            Self::AllOf => FailureKind::AllOf,
            Self::OneOf => FailureKind::OneOf,
        }
    }

    fn is_satisfied(&self, matched: usize, total: usize) -> bool {
        match self {
            Self::AnyOf => matched >= 1,
            Self::AllOf => matched == total,
            Self::OneOf => matched == 1,
        }
    }
}

impl fmt::Display for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Composition of child validators
///
/// On success the cast value comes from a single child and is never merged
/// with its siblings:
/// - anyOf: the first accepting child, in list order;
/// - allOf: the first child;
/// - oneOf: the only accepting child.
#[derive(Debug, Clone)]
pub struct CompositionValidator {
    compositor: Compositor,
    children: Vec<ValidatorRef>,
    common: Common,
}

impl CompositionValidator {
    /// Create a composition; fails on an empty child list
    pub fn new(compositor: Compositor, children: Vec<ValidatorRef>) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::Value(format!(
                "{} requires at least one schema",
                compositor
            )));
        }
        Ok(Self {
            compositor,
            children,
            common: Common::new(),
        })
    }

    /// anyOf composition
    pub fn any_of(children: Vec<ValidatorRef>) -> Result<Self> {
        Self::new(Compositor::AnyOf, children)
    }

    /// allOf composition
    pub fn all_of(children: Vec<ValidatorRef>) -> Result<Self> {
        Self::new(Compositor::AllOf, children)
    }

    /// oneOf composition
    pub fn one_of(children: Vec<ValidatorRef>) -> Result<Self> {
        Self::new(Compositor::OneOf, children)
    }

    /// The compositor
    pub fn compositor(&self) -> Compositor {
        self.compositor
    }

    /// Child validators, in declaration order
    pub fn children(&self) -> &[ValidatorRef] {
        &self.children
    }
}

impl Validator for CompositionValidator {
    fn type_name(&self) -> Option<&str> {
        None
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for child in &self.children {
            match child.validate_at(value, path).into_result() {
                Ok(cast) => accepted.push(cast),
                Err(failure) => rejected.push(failure),
            }
        }

        let total = self.children.len();
        if !self.compositor.is_satisfied(accepted.len(), total) {
            let failure = Failure::new(self.compositor.failure_kind(), path.to_pointer())
                .with_message(format!(
                    "{} of {} schemas matched for {}",
                    accepted.len(),
                    total,
                    self.compositor
                ))
                .with_nested(rejected);
            return ValidationResult::fail(value.clone(), failure);
        }

        // satisfied compositors have at least one match since `new` rejects
        // an empty child list; for allOf the first match is the first child
        ValidationResult::success(accepted.swap_remove(0))
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        let children = self.children.iter().map(|child| child.to_document()).collect();
        document.insert(self.compositor.keyword().to_string(), Value::Array(children));
    }
}

impl FromDocument for CompositionValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let present: Vec<Compositor> = document
            .keys()
            .filter_map(|key| Compositor::from_keyword(key))
            .collect();

        let compositor = match present.as_slice() {
            [single] => *single,
            [] => return Err(ctx.error(KW_ANY_OF, "expected one of anyOf, allOf or oneOf")),
            _ => {
                return Err(ctx.error(
                    present[1].keyword(),
                    "anyOf, allOf and oneOf are mutually exclusive",
                ))
            }
        };

        let keyword = compositor.keyword();
        let Some(Value::Array(items)) = document.get(keyword) else {
            return Err(ctx.error(keyword, format!("'{}' must be an array of schemas", keyword)));
        };

        let mut children = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let index = index.to_string();
            children.push(ctx.build_child(item, &[keyword, &index])?);
        }

        let mut validator = ctx.located(Self::new(compositor, children), keyword)?;
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

impl_with_common!(CompositionValidator);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::base::WithCommon;
    use crate::validators::simple_types::{
        IntegerValidator, NumberValidator, StringValidator, UnsignedIntegerValidator,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn integer(min: Option<i64>, max: Option<i64>) -> ValidatorRef {
        Arc::new(IntegerValidator::new(min, max).unwrap())
    }

    fn unsigned() -> ValidatorRef {
        Arc::new(UnsignedIntegerValidator::new(None, None).unwrap())
    }

    #[test]
    fn test_empty_composition_rejected() {
        assert!(CompositionValidator::any_of(vec![]).is_err());
        assert!(CompositionValidator::all_of(vec![]).is_err());
        assert!(CompositionValidator::one_of(vec![]).is_err());
    }

    #[test]
    fn test_all_of() {
        let validator = CompositionValidator::all_of(vec![integer(None, None), unsigned()]).unwrap();
        assert_eq!(validator.parse(&json!(5)).unwrap(), json!(5));

        let result = validator.validate(&json!(-5));
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::AllOf);
        assert_eq!(failure.nested.len(), 1);
        assert_eq!(failure.nested[0].kind, FailureKind::Minimum);
    }

    #[test]
    fn test_all_of_keeps_first_child_value() {
        let validator = CompositionValidator::all_of(vec![
            Arc::new(StringValidator::new(1, None).unwrap()),
            integer(None, None),
        ])
        .unwrap();
        assert_eq!(validator.parse(&json!("7")).unwrap(), json!("7"));

        let reversed = CompositionValidator::all_of(vec![
            integer(None, None),
            Arc::new(StringValidator::new(1, None).unwrap()),
        ])
        .unwrap();
        assert_eq!(reversed.parse(&json!("7")).unwrap(), json!(7));
    }

    #[test]
    fn test_one_of() {
        let validator =
            CompositionValidator::one_of(vec![integer(Some(-999), Some(-1)), unsigned()]).unwrap();
        assert!(validator.is_valid(&json!(10)));
        assert!(validator.is_valid(&json!(-2)));
        assert_eq!(
            validator.validate(&json!(-1000)).failure().map(|f| f.kind),
            Some(FailureKind::OneOf)
        );

        let overlapping =
            CompositionValidator::one_of(vec![integer(Some(0), Some(10)), integer(Some(5), None)])
                .unwrap();
        assert!(overlapping.is_valid(&json!(2)));
        assert_eq!(
            overlapping.validate(&json!(7)).failure().map(|f| f.kind),
            Some(FailureKind::OneOf)
        );
    }

    #[test]
    fn test_any_of_takes_first_match() {
        let validator = CompositionValidator::any_of(vec![
            Arc::new(StringValidator::new(0, None).unwrap()),
            integer(None, None),
        ])
        .unwrap();
        for _ in 0..3 {
            assert_eq!(validator.parse(&json!("5")).unwrap(), json!("5"));
        }
        assert_eq!(validator.parse(&json!(5.0)).unwrap(), json!(5));

        let result = validator.validate(&json!(true));
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::AnyOf);
        assert_eq!(failure.nested.len(), 2);
    }

    #[test]
    fn test_common_pipeline_runs_on_selected_value() {
        let validator = CompositionValidator::any_of(vec![
            integer(None, None),
            Arc::new(NumberValidator::new(None, None).unwrap()),
        ])
        .unwrap()
        .with_enum(vec![json!(3)])
        .unwrap()
        .with_validate_type(true);

        assert_eq!(validator.parse(&json!("3")).unwrap(), json!(3));
        assert_eq!(
            validator.validate(&json!(4)).failure().map(|f| f.kind),
            Some(FailureKind::Enum)
        );
    }

    #[test]
    fn test_export() {
        let validator = CompositionValidator::one_of(vec![integer(Some(1), None), unsigned()])
            .unwrap()
            .with_title("count");
        assert_eq!(
            validator.to_document(),
            json!({
                "oneOf": [
                    {"type": "integer", "minimum": 1},
                    {"type": "unsignedinteger"}
                ],
                "title": "count"
            })
        );
    }
}
