//! Base validator infrastructure
//!
//! This module provides the capability every validator kind implements and
//! the keywords shared by all of them. Evaluation order is fixed:
//!
//! 1. the kind's own type/shape and structural checks ([`Validator::check`]);
//! 2. `enum` membership of the cast value;
//! 3. `not`, which must reject the original value;
//! 4. the user callback, whose result is returned verbatim.
//!
//! The first failing stage ends the evaluation.

use super::builders::BuildContext;
use super::builtins::{
    KW_DEFAULT, KW_DESCRIPTION, KW_ENUM, KW_NOT, KW_TITLE, KW_TYPE, KW_VALIDATE_TYPE,
};
use super::exceptions::{Failure, FailureKind};
use super::helpers::values_equal;
use super::validation::ValidationResult;
use crate::error::{Error, Result};
use crate::locations::InstancePath;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a node of a validator tree
pub type ValidatorRef = Arc<dyn Validator>;

/// Post-validation hook; receives the successful result and the validator
/// that produced it, and returns the final result
pub type Callback = Arc<dyn Fn(ValidationResult, &dyn Validator) -> ValidationResult + Send + Sync>;

/// Upcast to a validator trait object
pub trait AsValidator {
    /// View as `&dyn Validator`
    fn as_validator(&self) -> &dyn Validator;
}

impl<T: Validator> AsValidator for T {
    fn as_validator(&self) -> &dyn Validator {
        self
    }
}

/// Base trait for all validators
///
/// Implementors provide the kind-specific stage and keyword export; the
/// provided methods run the shared pipeline. A validator never changes while
/// validating, so one tree can be shared between threads.
pub trait Validator: AsValidator + fmt::Debug + Send + Sync {
    /// Schema `type` name, `None` for composition validators
    fn type_name(&self) -> Option<&str>;

    /// Keywords shared by every kind
    fn common(&self) -> &Common;

    /// Type/shape and structural checks, producing the cast value
    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult;

    /// Write the kind-specific keywords into a schema document
    fn export_keywords(&self, document: &mut Map<String, Value>);

    /// Validate a value at the root location
    fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_at(value, &InstancePath::root())
    }

    /// Validate a value found at `path` inside a larger value
    fn validate_at(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let result = self.check(value, path);
        let result = if result.is_valid() {
            self.common().apply(value, result, path, self.as_validator())
        } else {
            result
        };

        if let Some(failure) = result.failure() {
            tracing::trace!(kind = %failure.kind, path = %failure.path, "value rejected");
        }
        result
    }

    /// Validate and return the cast value, or the failure as an error
    fn parse(&self, value: &Value) -> Result<Value> {
        self.validate(value).into_result().map_err(Error::from)
    }

    /// Check if a value passes validation
    fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_valid()
    }

    /// Value substituted when this validator's property is absent
    fn default_value(&self) -> Option<&Value> {
        self.common().default.as_ref()
    }

    /// Export as a schema document
    fn to_document(&self) -> Value {
        let mut document = Map::new();
        if let Some(name) = self.type_name() {
            document.insert(KW_TYPE.to_string(), Value::String(name.to_string()));
        }
        self.export_keywords(&mut document);
        self.common().export(&mut document);
        Value::Object(document)
    }

    /// Export as a JSON schema document string
    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }
}

// =============================================================================
// Common Keywords
// =============================================================================

/// Keywords every validator kind carries
#[derive(Clone, Default)]
pub struct Common {
    /// Short title
    pub title: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Value substituted for absent properties (and empty objects)
    pub default: Option<Value>,
    /// Allowed literal values for the cast value
    pub enumeration: Option<Vec<Value>>,
    /// Schema the original value must not match
    pub not: Option<ValidatorRef>,
    /// Require identical primitive kinds when matching `enum`
    pub validate_type: bool,
    /// Post-validation hook
    pub callback: Option<Callback>,
}

impl Common {
    /// Create an empty keyword set
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the enum / not / callback stages over a successful result
    pub fn apply(
        &self,
        original: &Value,
        result: ValidationResult,
        path: &InstancePath,
        validator: &dyn Validator,
    ) -> ValidationResult {
        let value = result.into_value();

        if let Some(allowed) = &self.enumeration {
            if !allowed
                .iter()
                .any(|literal| values_equal(&value, literal, self.validate_type))
            {
                let failure = Failure::new(FailureKind::Enum, path.to_pointer())
                    .with_message(format!("{} is not one of the allowed values", value));
                return ValidationResult::fail(value, failure);
            }
        }

        if let Some(not) = &self.not {
            if not.validate_at(original, path).is_valid() {
                let failure = Failure::new(FailureKind::Not, path.to_pointer())
                    .with_message("value matches a schema it must not match");
                return ValidationResult::fail(value, failure);
            }
        }

        let result = ValidationResult::success(value);
        match &self.callback {
            Some(callback) => callback(result, validator),
            None => result,
        }
    }

    /// Read the common keywords of a schema document
    pub fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let mut common = Common::new();
        common.title = ctx.get_string(document, KW_TITLE)?;
        common.description = ctx.get_string(document, KW_DESCRIPTION)?;
        common.default = document.get(KW_DEFAULT).cloned();

        if let Some(values) = document.get(KW_ENUM) {
            match values {
                Value::Array(items) if !items.is_empty() => {
                    common.enumeration = Some(items.clone());
                }
                _ => return Err(ctx.error(KW_ENUM, "'enum' must be a non-empty array")),
            }
        }

        if let Some(not) = document.get(KW_NOT) {
            common.not = Some(ctx.build_child(not, &[KW_NOT])?);
        }

        common.validate_type = ctx.get_bool(document, KW_VALIDATE_TYPE)?.unwrap_or(false);
        Ok(common)
    }

    /// Write the common keywords into a schema document
    pub fn export(&self, document: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            document.insert(KW_TITLE.to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            document.insert(KW_DESCRIPTION.to_string(), Value::String(description.clone()));
        }
        if let Some(default) = &self.default {
            document.insert(KW_DEFAULT.to_string(), default.clone());
        }
        if let Some(values) = &self.enumeration {
            document.insert(KW_ENUM.to_string(), Value::Array(values.clone()));
        }
        if let Some(not) = &self.not {
            document.insert(KW_NOT.to_string(), not.to_document());
        }
        if self.validate_type {
            document.insert(KW_VALIDATE_TYPE.to_string(), Value::Bool(true));
        }
    }
}

impl fmt::Debug for Common {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Common")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("enumeration", &self.enumeration)
            .field("not", &self.not)
            .field("validate_type", &self.validate_type)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Builder methods for the common keywords, available on every kind
pub trait WithCommon: Sized {
    /// Mutable access to the common keywords
    fn common_mut(&mut self) -> &mut Common;

    /// Set the title
    fn with_title(mut self, title: impl Into<String>) -> Self {
        self.common_mut().title = Some(title.into());
        self
    }

    /// Set the description
    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.common_mut().description = Some(description.into());
        self
    }

    /// Set the default value
    fn with_default(mut self, default: Value) -> Self {
        self.common_mut().default = Some(default);
        self
    }

    /// Restrict the cast value to a non-empty list of literals
    fn with_enum(mut self, values: Vec<Value>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::Value("enum requires at least one value".to_string()));
        }
        self.common_mut().enumeration = Some(values);
        Ok(self)
    }

    /// Set a schema the value must not match
    fn with_not(mut self, not: ValidatorRef) -> Self {
        self.common_mut().not = Some(not);
        self
    }

    /// Require identical primitive kinds when matching `enum`
    fn with_validate_type(mut self, validate_type: bool) -> Self {
        self.common_mut().validate_type = validate_type;
        self
    }

    /// Set the post-validation hook
    fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(ValidationResult, &dyn Validator) -> ValidationResult + Send + Sync + 'static,
    {
        self.common_mut().callback = Some(Arc::new(callback));
        self
    }
}

/// Implement [`WithCommon`] for validators storing their keywords in a
/// `common` field
macro_rules! impl_with_common {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::validators::base::WithCommon for $ty {
                fn common_mut(&mut self) -> &mut $crate::validators::base::Common {
                    &mut self.common
                }
            }
        )*
    };
}

pub(crate) use impl_with_common;
