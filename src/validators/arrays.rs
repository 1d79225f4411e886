//! Array validator

use super::base::{impl_with_common, Common, Validator, ValidatorRef};
use super::builders::{BuildContext, FromDocument};
use super::builtins::{KW_ITEMS, KW_MAX_ITEMS, KW_MIN_ITEMS, KW_UNIQUE_ITEMS, TYPE_ARRAY};
use super::exceptions::{Failure, FailureDetail, FailureKind};
use super::facets::LengthRange;
use super::helpers::{duplicate_indices, kind_name};
use super::validation::ValidationResult;
use crate::error::Result;
use crate::locations::InstancePath;
use serde_json::{Map, Value};

/// Validator for sequences
///
/// Every item is checked against the single item schema, all failing
/// positions are reported together, and uniqueness is decided on the cast
/// items (so `"1"` and `1` collide under an integer item schema).
#[derive(Debug, Clone, Default)]
pub struct ArrayValidator {
    length: LengthRange,
    items: Option<ValidatorRef>,
    unique_items: bool,
    common: Common,
}

impl ArrayValidator {
    /// Create an array validator with length bounds
    pub fn new(min_items: usize, max_items: Option<usize>) -> Result<Self> {
        Ok(Self {
            length: LengthRange::new(min_items, max_items)?,
            ..Default::default()
        })
    }

    /// Validate every item against `items`
    pub fn with_items(mut self, items: ValidatorRef) -> Self {
        self.items = Some(items);
        self
    }

    /// Reject duplicate items
    pub fn with_unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    /// Item schema
    pub fn items(&self) -> Option<&ValidatorRef> {
        self.items.as_ref()
    }

    /// Whether duplicates are rejected
    pub fn unique_items(&self) -> bool {
        self.unique_items
    }
}

impl Validator for ArrayValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_ARRAY)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::Array(items) = value else {
            let failure = Failure::new(FailureKind::Type, path.to_pointer())
                .with_message(format!("expected array, got {}", kind_name(value)));
            return ValidationResult::fail(value.clone(), failure);
        };

        if let Err(failure) =
            self.length
                .check(items.len(), path, FailureKind::MinItems, FailureKind::MaxItems)
        {
            return ValidationResult::fail(value.clone(), failure);
        }

        let cast = match &self.items {
            None => items.clone(),
            Some(validator) => {
                let mut cast = Vec::with_capacity(items.len());
                let mut indices = Vec::new();
                let mut nested = Vec::new();

                for (index, item) in items.iter().enumerate() {
                    match validator.validate_at(item, &path.index(index)).into_result() {
                        Ok(value) => cast.push(value),
                        Err(failure) => {
                            indices.push(index);
                            nested.push(failure);
                        }
                    }
                }

                if !indices.is_empty() {
                    let failure = Failure::new(FailureKind::Items, path.to_pointer())
                        .with_message(format!("{} of {} items are invalid", indices.len(), items.len()))
                        .with_detail(FailureDetail::Indices { indices })
                        .with_nested(nested);
                    return ValidationResult::fail(value.clone(), failure);
                }
                cast
            }
        };

        if self.unique_items {
            let duplicates = duplicate_indices(&cast, self.common.validate_type);
            if !duplicates.is_empty() {
                let failure = Failure::new(FailureKind::UniqueItems, path.to_pointer())
                    .with_message("items are not unique")
                    .with_detail(FailureDetail::Indices {
                        indices: duplicates,
                    });
                return ValidationResult::fail(value.clone(), failure);
            }
        }

        ValidationResult::success(Value::Array(cast))
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        if self.length.min > 0 {
            document.insert(KW_MIN_ITEMS.to_string(), Value::from(self.length.min));
        }
        if let Some(max) = self.length.max {
            document.insert(KW_MAX_ITEMS.to_string(), Value::from(max));
        }
        if let Some(items) = &self.items {
            document.insert(KW_ITEMS.to_string(), items.to_document());
        }
        if self.unique_items {
            document.insert(KW_UNIQUE_ITEMS.to_string(), Value::Bool(true));
        }
    }
}

impl FromDocument for ArrayValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let min = ctx.get_usize(document, KW_MIN_ITEMS)?.unwrap_or(0);
        let max = ctx.get_usize(document, KW_MAX_ITEMS)?;
        let mut validator = ctx.located(Self::new(min, max), KW_MAX_ITEMS)?;

        if let Some(items) = document.get(KW_ITEMS) {
            if items.is_array() {
                return Err(ctx.error(KW_ITEMS, "per-position item schemas are not supported"));
            }
            validator.items = Some(ctx.build_child(items, &[KW_ITEMS])?);
        }
        validator.unique_items = ctx.get_bool(document, KW_UNIQUE_ITEMS)?.unwrap_or(false);
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

impl_with_common!(ArrayValidator);
