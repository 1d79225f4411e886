//! Object validator
//!
//! Validates keyed mappings: property count, required keys, per-property
//! recursion with default substitution, inter-property dependencies and the
//! additional-properties policy.
//!
//! Every declared property is attempted before the outcome is decided, so a
//! single failure lists all incorrect keys, all missing required keys and all
//! missing dependencies at once. The input is never modified: cast property
//! values and substituted defaults are written into an owned copy.

use super::base::{impl_with_common, Common, Validator, ValidatorRef};
use super::builders::{BuildContext, FromDocument};
use super::builtins::{
    KW_ADDITIONAL_PROPERTIES, KW_DEPENDENCIES, KW_MAX_PROPERTIES, KW_MIN_PROPERTIES,
    KW_PROPERTIES, KW_REQUIRED, TYPE_OBJECT,
};
use super::exceptions::{Failure, FailureDetail, FailureKind};
use super::facets::LengthRange;
use super::helpers::kind_name;
use super::validation::ValidationResult;
use crate::error::Result;
use crate::locations::InstancePath;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Validator for keyed mappings
#[derive(Debug, Clone, Default)]
pub struct ObjectValidator {
    properties: IndexMap<String, ValidatorRef>,
    required: Vec<String>,
    /// `None` and `Some(true)` both allow undeclared keys
    additional_properties: Option<bool>,
    count: LengthRange,
    dependencies: IndexMap<String, Vec<String>>,
    common: Common,
}

impl ObjectValidator {
    /// Create an object validator with property-count bounds
    pub fn new(min_properties: usize, max_properties: Option<usize>) -> Result<Self> {
        Ok(Self {
            count: LengthRange::new(min_properties, max_properties)?,
            ..Default::default()
        })
    }

    /// Declare a property
    pub fn with_property(mut self, name: impl Into<String>, validator: ValidatorRef) -> Self {
        self.properties.insert(name.into(), validator);
        self
    }

    /// Declare several properties, keeping their order
    pub fn with_properties<I, K>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, ValidatorRef)>,
        K: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(name, validator)| (name.into(), validator)));
        self
    }

    /// Set the required keys
    pub fn with_required<I, K>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    /// Allow (`true`) or reject (`false`) undeclared keys
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Require `dependencies` to be present whenever `key` is
    pub fn with_dependency<I, K>(mut self, key: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.dependencies
            .insert(key.into(), dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Declared properties
    pub fn properties(&self) -> &IndexMap<String, ValidatorRef> {
        &self.properties
    }

    /// Required keys
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Dependency mapping
    pub fn dependencies(&self) -> &IndexMap<String, Vec<String>> {
        &self.dependencies
    }

    /// Whether undeclared keys are accepted
    pub fn allows_additional_properties(&self) -> bool {
        self.additional_properties.unwrap_or(true)
    }

    fn missing_dependencies(&self, map: &Map<String, Value>) -> IndexMap<String, Vec<String>> {
        self.dependencies
            .iter()
            .filter(|(key, _)| map.contains_key(key.as_str()))
            .filter_map(|(key, dependencies)| {
                let lacking: Vec<String> = dependencies
                    .iter()
                    .filter(|dependency| !map.contains_key(dependency.as_str()))
                    .cloned()
                    .collect();
                (!lacking.is_empty()).then(|| (key.clone(), lacking))
            })
            .collect()
    }
}

impl Validator for ObjectValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_OBJECT)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::Object(map) = value else {
            let failure = Failure::new(FailureKind::Type, path.to_pointer())
                .with_message(format!("expected object, got {}", kind_name(value)));
            return ValidationResult::fail(value.clone(), failure);
        };

        if let Err(failure) = self.count.check(
            map.len(),
            path,
            FailureKind::MinProperties,
            FailureKind::MaxProperties,
        ) {
            return ValidationResult::fail(value.clone(), failure);
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !map.contains_key(key.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() && map.is_empty() {
            if let Some(default) = &self.common.default {
                return ValidationResult::success(default.clone());
            }
        }

        let mut output = map.clone();
        let mut incorrect = Vec::new();
        let mut nested = Vec::new();

        for (key, validator) in &self.properties {
            match map.get(key) {
                Some(item) => match validator.validate_at(item, &path.key(key)).into_result() {
                    Ok(cast) => {
                        output.insert(key.clone(), cast);
                    }
                    Err(failure) => {
                        incorrect.push(key.clone());
                        nested.push(failure);
                    }
                },
                None => {
                    if let Some(default) = validator.default_value() {
                        output.insert(key.clone(), default.clone());
                    }
                }
            }
        }

        let missing_dependencies = self.missing_dependencies(map);

        if !missing.is_empty() || !incorrect.is_empty() || !missing_dependencies.is_empty() {
            let (kind, message) = if !missing.is_empty() {
                (
                    FailureKind::Required,
                    format!("missing required properties: {}", missing.join(", ")),
                )
            } else if !incorrect.is_empty() {
                (
                    FailureKind::Properties,
                    format!("invalid properties: {}", incorrect.join(", ")),
                )
            } else {
                let keys: Vec<&str> = missing_dependencies.keys().map(String::as_str).collect();
                (
                    FailureKind::Dependencies,
                    format!("missing dependencies of: {}", keys.join(", ")),
                )
            };

            let failure = Failure::new(kind, path.to_pointer())
                .with_message(message)
                .with_detail(FailureDetail::Properties {
                    incorrect,
                    missing,
                    missing_dependencies,
                })
                .with_nested(nested);
            return ValidationResult::fail(value.clone(), failure);
        }

        if !self.allows_additional_properties() {
            let undeclared: Vec<String> = map
                .keys()
                .filter(|key| !self.properties.contains_key(key.as_str()))
                .cloned()
                .collect();
            if !undeclared.is_empty() {
                let failure = Failure::new(FailureKind::AdditionalProperties, path.to_pointer())
                    .with_message(format!("undeclared properties: {}", undeclared.join(", ")))
                    .with_detail(FailureDetail::Keys { keys: undeclared });
                return ValidationResult::fail(value.clone(), failure);
            }
        }

        ValidationResult::success(Value::Object(output))
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        if self.count.min > 0 {
            document.insert(KW_MIN_PROPERTIES.to_string(), Value::from(self.count.min));
        }
        if let Some(max) = self.count.max {
            document.insert(KW_MAX_PROPERTIES.to_string(), Value::from(max));
        }
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, validator)| (name.clone(), validator.to_document()))
                .collect();
            document.insert(KW_PROPERTIES.to_string(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            document.insert(KW_REQUIRED.to_string(), Value::from(self.required.clone()));
        }
        if let Some(allowed) = self.additional_properties {
            document.insert(KW_ADDITIONAL_PROPERTIES.to_string(), Value::Bool(allowed));
        }
        if !self.dependencies.is_empty() {
            let dependencies: Map<String, Value> = self
                .dependencies
                .iter()
                .map(|(key, keys)| (key.clone(), Value::from(keys.clone())))
                .collect();
            document.insert(KW_DEPENDENCIES.to_string(), Value::Object(dependencies));
        }
    }
}

impl FromDocument for ObjectValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let min = ctx.get_usize(document, KW_MIN_PROPERTIES)?.unwrap_or(0);
        let max = ctx.get_usize(document, KW_MAX_PROPERTIES)?;
        let mut validator = ctx.located(Self::new(min, max), KW_MAX_PROPERTIES)?;

        match document.get(KW_PROPERTIES) {
            None => {}
            Some(Value::Object(properties)) => {
                for (name, property) in properties {
                    let child = ctx.build_child(property, &[KW_PROPERTIES, name.as_str()])?;
                    validator.properties.insert(name.clone(), child);
                }
            }
            Some(_) => {
                return Err(ctx.error(KW_PROPERTIES, "'properties' must map names to schemas"))
            }
        }

        if let Some(required) = ctx.get_string_list(document, KW_REQUIRED)? {
            validator.required = required;
        }

        match document.get(KW_ADDITIONAL_PROPERTIES) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(allowed)) => validator.additional_properties = Some(*allowed),
            Some(_) => {
                return Err(ctx.error(
                    KW_ADDITIONAL_PROPERTIES,
                    "'additionalProperties' must be a boolean",
                ))
            }
        }

        match document.get(KW_DEPENDENCIES) {
            None => {}
            Some(Value::Object(dependencies)) => {
                for (key, keys) in dependencies {
                    let keys = match keys {
                        Value::Array(items) => items
                            .iter()
                            .map(|item| item.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>(),
                        _ => None,
                    };
                    match keys {
                        Some(keys) => {
                            validator.dependencies.insert(key.clone(), keys);
                        }
                        None => {
                            return Err(ctx.error(
                                KW_DEPENDENCIES,
                                format!("dependencies of '{}' must be a list of keys", key),
                            ))
                        }
                    }
                }
            }
            Some(_) => {
                return Err(ctx.error(KW_DEPENDENCIES, "'dependencies' must be an object"))
            }
        }

        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

impl_with_common!(ObjectValidator);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::base::WithCommon;
    use crate::validators::simple_types::{BooleanValidator, IntegerValidator, StringValidator};
    use serde_json::json;
    use std::sync::Arc;

    fn sample() -> ObjectValidator {
        ObjectValidator::new(0, None)
            .unwrap()
            .with_property("str", Arc::new(StringValidator::new(2, Some(4)).unwrap()))
            .with_property("ok", Arc::new(BooleanValidator::new()))
            .with_required(["ok"])
    }

    fn detail(result: &ValidationResult) -> FailureDetail {
        result.failure().map(|f| f.detail.clone()).unwrap_or_default()
    }

    #[test]
    fn test_missing_required() {
        let result = sample().validate(&json!({}));
        assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::Required));
        match detail(&result) {
            FailureDetail::Properties { missing, .. } => assert_eq!(missing, vec!["ok"]),
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_properties_are_cast() {
        let validator = sample();
        assert_eq!(validator.parse(&json!({"ok": "true"})).unwrap(), json!({"ok": true}));

        let input = json!({"str": "abc", "ok": "no", "extra": 1});
        assert_eq!(
            validator.parse(&input).unwrap(),
            json!({"str": "abc", "ok": false, "extra": 1})
        );
        assert_eq!(input["ok"], json!("no"));
    }

    #[test]
    fn test_all_failures_collected() {
        let validator = ObjectValidator::new(0, None)
            .unwrap()
            .with_property("a", Arc::new(IntegerValidator::new(None, None).unwrap()))
            .with_property("b", Arc::new(StringValidator::new(0, Some(1)).unwrap()))
            .with_property("c", Arc::new(BooleanValidator::new()))
            .with_required(["c", "d"])
            .with_dependency("a", ["e"]);

        let result = validator.validate(&json!({"a": "x", "b": "too long"}));
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Required);
        assert_eq!(failure.nested.len(), 2);
        assert_eq!(failure.nested[0].path, "/a");
        assert_eq!(failure.nested[1].kind, FailureKind::MaxLength);

        match &failure.detail {
            FailureDetail::Properties {
                incorrect,
                missing,
                missing_dependencies,
            } => {
                assert_eq!(incorrect, &vec!["a", "b"]);
                assert_eq!(missing, &vec!["c", "d"]);
                assert_eq!(missing_dependencies.get("a"), Some(&vec!["e".to_string()]));
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_incorrect_property_kind() {
        let result = sample().validate(&json!({"ok": true, "str": "x"}));
        assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::Properties));
    }

    #[test]
    fn test_dependencies() {
        let validator = ObjectValidator::new(0, None)
            .unwrap()
            .with_dependency("card", ["billing_address"]);
        assert!(validator.is_valid(&json!({"name": "x"})));
        assert!(validator.is_valid(&json!({"card": 1, "billing_address": "y"})));

        let result = validator.validate(&json!({"card": 1}));
        assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::Dependencies));
    }

    #[test]
    fn test_additional_properties() {
        let strict = sample().with_additional_properties(false);
        let result = strict.validate(&json!({"ok": true, "extra": 1, "more": 2}));
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::AdditionalProperties);
        assert_eq!(failure.keys(), ["extra", "more"]);

        let open = sample().with_additional_properties(true);
        assert_eq!(
            open.parse(&json!({"ok": 1, "extra": [1]})).unwrap(),
            json!({"ok": true, "extra": [1]})
        );
    }

    #[test]
    fn test_property_count() {
        let validator = ObjectValidator::new(1, Some(2)).unwrap();
        assert_eq!(
            validator.validate(&json!({})).failure().map(|f| f.kind),
            Some(FailureKind::MinProperties)
        );
        assert_eq!(
            validator.validate(&json!({"a": 1, "b": 2, "c": 3})).failure().map(|f| f.kind),
            Some(FailureKind::MaxProperties)
        );
        assert!(ObjectValidator::new(3, Some(1)).is_err());
    }

    #[test]
    fn test_defaults() {
        let address = ObjectValidator::new(0, None)
            .unwrap()
            .with_property("city", Arc::new(StringValidator::new(0, None).unwrap()))
            .with_default(json!({"city": "Paris"}));
        let validator = ObjectValidator::new(0, None)
            .unwrap()
            .with_property(
                "active",
                Arc::new(BooleanValidator::new().with_default(json!(false))),
            )
            .with_property("address", Arc::new(address))
            .with_property("name", Arc::new(StringValidator::new(0, None).unwrap()));

        assert_eq!(
            validator.parse(&json!({"name": "x"})).unwrap(),
            json!({"name": "x", "active": false, "address": {"city": "Paris"}})
        );
        assert_eq!(
            validator.parse(&json!({"active": "yes"})).unwrap(),
            json!({"active": true, "address": {"city": "Paris"}})
        );
    }

    #[test]
    fn test_empty_object_default() {
        let validator = sample().with_default(json!({"ok": false}));
        assert!(!validator.is_valid(&json!({})));

        let optional = ObjectValidator::new(0, None)
            .unwrap()
            .with_default(json!({"ok": false}));
        assert_eq!(optional.parse(&json!({})).unwrap(), json!({"ok": false}));
    }

    #[test]
    fn test_type_failure() {
        let result = sample().validate(&json!([1]));
        assert_eq!(result.failure().map(|f| f.kind), Some(FailureKind::Type));
    }

    #[test]
    fn test_export() {
        let document = sample()
            .with_additional_properties(false)
            .with_dependency("str", ["ok"])
            .to_document();
        assert_eq!(
            document,
            json!({
                "type": "object",
                "properties": {
                    "str": {"type": "string", "minLength": 2, "maxLength": 4},
                    "ok": {"type": "boolean"}
                },
                "required": ["ok"],
                "additionalProperties": false,
                "dependencies": {"str": ["ok"]}
            })
        );
    }
}
