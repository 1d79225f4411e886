//! Leaf validators
//!
//! Scalar validators with no structural recursion. Each one checks the shape
//! of a value, casts it, and applies its own bounds before the common
//! pipeline runs:
//! - String and Username (length, pattern)
//! - Number, Integer and UnsignedInteger (shared [`NumericRange`])
//! - Boolean and Null
//! - Date and Datetime (chrono, format bounds)
//! - Enum, Url and Uuid

use super::base::{impl_with_common, Common, Validator};
use super::builders::{BuildContext, FromDocument};
use super::builtins::*;
use super::exceptions::{Failure, FailureKind};
use super::facets::{
    float_bound, FormatBound, FormatRange, LengthRange, NumericRange, PatternFacet,
};
use super::helpers::{cast_boolean, cast_integer, cast_number, compare_numbers, kind_name};
use super::validation::ValidationResult;
use crate::error::{Error, Result};
use crate::locations::InstancePath;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Default username pattern
pub const DEFAULT_USERNAME_PATTERN: &str = r"^[A-Za-z0-9_.]{3,32}$";

static DEFAULT_USERNAME: Lazy<PatternFacet> = Lazy::new(|| {
    PatternFacet::new(DEFAULT_USERNAME_PATTERN).expect("default username pattern is valid")
});

/// Date format
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime formats tried before RFC 3339
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn type_failure(expected: &str, value: &Value, path: &InstancePath) -> ValidationResult {
    let failure = Failure::new(FailureKind::Type, path.to_pointer())
        .with_message(format!("expected {}, got {}", expected, kind_name(value)));
    ValidationResult::fail(value.clone(), failure)
}

// =============================================================================
// String
// =============================================================================

/// Validator for strings
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    length: LengthRange,
    pattern: Option<PatternFacet>,
    common: Common,
}

impl StringValidator {
    /// Create a string validator; length counts characters
    pub fn new(min_length: usize, max_length: Option<usize>) -> Result<Self> {
        Ok(Self {
            length: LengthRange::new(min_length, max_length)?,
            ..Default::default()
        })
    }

    /// Require a match of `pattern` somewhere in the string
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(PatternFacet::new(pattern)?);
        Ok(self)
    }

    /// Minimum length
    pub fn min_length(&self) -> usize {
        self.length.min
    }

    /// Maximum length
    pub fn max_length(&self) -> Option<usize> {
        self.length.max
    }

    /// Pattern, if any
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.pattern.as_str())
    }
}

impl Validator for StringValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_STRING)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::String(s) = value else {
            return type_failure(TYPE_STRING, value, path);
        };

        let checked = self
            .length
            .check(s.chars().count(), path, FailureKind::MinLength, FailureKind::MaxLength)
            .and_then(|_| match &self.pattern {
                Some(pattern) => pattern.check(s, path),
                None => Ok(()),
            });

        match checked {
            Ok(()) => ValidationResult::success(value.clone()),
            Err(failure) => ValidationResult::fail(value.clone(), failure),
        }
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        if self.length.min > 0 {
            document.insert(KW_MIN_LENGTH.to_string(), Value::from(self.length.min));
        }
        if let Some(max) = self.length.max {
            document.insert(KW_MAX_LENGTH.to_string(), Value::from(max));
        }
        if let Some(pattern) = &self.pattern {
            document.insert(KW_PATTERN.to_string(), Value::String(pattern.pattern.clone()));
        }
    }
}

impl FromDocument for StringValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let min = ctx.get_usize(document, KW_MIN_LENGTH)?.unwrap_or(0);
        let max = ctx.get_usize(document, KW_MAX_LENGTH)?;
        let mut validator = ctx.located(Self::new(min, max), KW_MAX_LENGTH)?;

        if let Some(pattern) = ctx.get_string(document, KW_PATTERN)? {
            validator = ctx.located(validator.with_pattern(&pattern), KW_PATTERN)?;
        }
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

// =============================================================================
// Numeric
// =============================================================================

fn export_range(range: &NumericRange, document: &mut Map<String, Value>) {
    if let Some(min) = &range.minimum {
        document.insert(KW_MINIMUM.to_string(), Value::Number(min.clone()));
    }
    if let Some(max) = &range.maximum {
        document.insert(KW_MAXIMUM.to_string(), Value::Number(max.clone()));
    }
    if range.exclusive_minimum {
        document.insert(KW_EXCLUSIVE_MINIMUM.to_string(), Value::Bool(true));
    }
    if range.exclusive_maximum {
        document.insert(KW_EXCLUSIVE_MAXIMUM.to_string(), Value::Bool(true));
    }
    if let Some(divisor) = &range.multiple_of {
        document.insert(KW_MULTIPLE_OF.to_string(), Value::Number(divisor.clone()));
    }
}

fn read_range(
    document: &Map<String, Value>,
    ctx: &mut BuildContext,
    default_minimum: Option<Number>,
) -> Result<NumericRange> {
    let minimum = ctx.get_number(document, KW_MINIMUM)?.or(default_minimum);
    let maximum = ctx.get_number(document, KW_MAXIMUM)?;
    let mut range = ctx
        .located(NumericRange::new(minimum, maximum), KW_MAXIMUM)?
        .with_exclusive_minimum(ctx.get_bool(document, KW_EXCLUSIVE_MINIMUM)?.unwrap_or(false))
        .with_exclusive_maximum(ctx.get_bool(document, KW_EXCLUSIVE_MAXIMUM)?.unwrap_or(false));

    if let Some(divisor) = ctx.get_number(document, KW_MULTIPLE_OF)? {
        range = ctx.located(range.with_multiple_of(divisor), KW_MULTIPLE_OF)?;
    }
    Ok(range)
}

/// Builder methods shared by the numeric validators
macro_rules! numeric_builders {
    ($ty:ty) => {
        impl $ty {
            /// Reject the minimum itself
            pub fn with_exclusive_minimum(mut self, exclusive: bool) -> Self {
                self.range = self.range.with_exclusive_minimum(exclusive);
                self
            }

            /// Reject the maximum itself
            pub fn with_exclusive_maximum(mut self, exclusive: bool) -> Self {
                self.range = self.range.with_exclusive_maximum(exclusive);
                self
            }

            /// Require an integral multiple of `divisor`
            pub fn with_multiple_of(mut self, divisor: f64) -> Result<Self> {
                self.range = self.range.with_multiple_of(float_bound(divisor)?)?;
                Ok(self)
            }

            /// Numeric bounds
            pub fn range(&self) -> &NumericRange {
                &self.range
            }
        }
    };
}

/// Validator for numbers (integers or reals, numeric strings cast)
#[derive(Debug, Clone, Default)]
pub struct NumberValidator {
    range: NumericRange,
    common: Common,
}

impl NumberValidator {
    /// Create a number validator
    pub fn new(minimum: Option<f64>, maximum: Option<f64>) -> Result<Self> {
        Ok(Self {
            range: NumericRange::new(
                minimum.map(float_bound).transpose()?,
                maximum.map(float_bound).transpose()?,
            )?,
            common: Common::new(),
        })
    }
}

numeric_builders!(NumberValidator);

impl Validator for NumberValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_NUMBER)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Some(number) = cast_number(value) else {
            return type_failure(TYPE_NUMBER, value, path);
        };
        match self.range.check(&number, path) {
            Ok(()) => ValidationResult::success(Value::Number(number)),
            Err(failure) => ValidationResult::fail(value.clone(), failure),
        }
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        export_range(&self.range, document);
    }
}

impl FromDocument for NumberValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            range: read_range(document, ctx, None)?,
            common: Common::from_document(document, ctx)?,
        })
    }
}

/// Validator for integers
///
/// Accepts integers, integral reals (`5.0`) and integer strings (`"5"`), and
/// casts them to an integer.
#[derive(Debug, Clone, Default)]
pub struct IntegerValidator {
    range: NumericRange,
    common: Common,
}

impl IntegerValidator {
    /// Create an integer validator
    pub fn new(minimum: Option<i64>, maximum: Option<i64>) -> Result<Self> {
        Ok(Self {
            range: NumericRange::new(minimum.map(Number::from), maximum.map(Number::from))?,
            common: Common::new(),
        })
    }
}

numeric_builders!(IntegerValidator);

fn check_integer(
    range: &NumericRange,
    expected: &str,
    value: &Value,
    path: &InstancePath,
) -> ValidationResult {
    let Some(integer) = cast_integer(value) else {
        return type_failure(expected, value, path);
    };
    match range.check(&integer, path) {
        Ok(()) => ValidationResult::success(Value::Number(integer)),
        Err(failure) => ValidationResult::fail(value.clone(), failure),
    }
}

impl Validator for IntegerValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_INTEGER)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        check_integer(&self.range, TYPE_INTEGER, value, path)
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        export_range(&self.range, document);
    }
}

impl FromDocument for IntegerValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            range: read_range(document, ctx, None)?,
            common: Common::from_document(document, ctx)?,
        })
    }
}

/// Validator for non-negative integers
#[derive(Debug, Clone)]
pub struct UnsignedIntegerValidator {
    range: NumericRange,
    common: Common,
}

impl UnsignedIntegerValidator {
    /// Create an unsigned integer validator; `minimum` defaults to 0
    pub fn new(minimum: Option<u64>, maximum: Option<u64>) -> Result<Self> {
        Ok(Self {
            range: NumericRange::new(
                Some(Number::from(minimum.unwrap_or(0))),
                maximum.map(Number::from),
            )?,
            common: Common::new(),
        })
    }
}

impl Default for UnsignedIntegerValidator {
    fn default() -> Self {
        Self {
            range: NumericRange {
                minimum: Some(Number::from(0u64)),
                ..Default::default()
            },
            common: Common::new(),
        }
    }
}

numeric_builders!(UnsignedIntegerValidator);

impl Validator for UnsignedIntegerValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_UNSIGNED_INTEGER)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        check_integer(&self.range, TYPE_UNSIGNED_INTEGER, value, path)
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        let mut range = self.range.clone();
        let zero = Number::from(0u64);
        let at_zero = range
            .minimum
            .as_ref()
            .map_or(false, |min| compare_numbers(min, &zero) == Some(Ordering::Equal));
        if at_zero && !range.exclusive_minimum {
            range.minimum = None;
        }
        export_range(&range, document);
    }
}

impl FromDocument for UnsignedIntegerValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let zero = Number::from(0u64);
        let range = read_range(document, ctx, Some(zero.clone()))?;
        let negative = range
            .minimum
            .as_ref()
            .map_or(false, |min| compare_numbers(min, &zero) == Some(Ordering::Less));
        if negative {
            return Err(ctx.error(KW_MINIMUM, "unsigned integer minimum must not be negative"));
        }
        Ok(Self {
            range,
            common: Common::from_document(document, ctx)?,
        })
    }
}

// =============================================================================
// Boolean and Null
// =============================================================================

/// Validator for booleans and boolean spellings
#[derive(Debug, Clone, Default)]
pub struct BooleanValidator {
    common: Common,
}

impl BooleanValidator {
    /// Create a boolean validator
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for BooleanValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_BOOLEAN)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        match cast_boolean(value) {
            Some(flag) => ValidationResult::success(Value::Bool(flag)),
            None => type_failure(TYPE_BOOLEAN, value, path),
        }
    }

    fn export_keywords(&self, _document: &mut Map<String, Value>) {}
}

impl FromDocument for BooleanValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            common: Common::from_document(document, ctx)?,
        })
    }
}

/// Validator accepting only `null`
#[derive(Debug, Clone, Default)]
pub struct NullValidator {
    common: Common,
}

impl NullValidator {
    /// Create a null validator
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for NullValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_NULL)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        if value.is_null() {
            ValidationResult::success(Value::Null)
        } else {
            type_failure(TYPE_NULL, value, path)
        }
    }

    fn export_keywords(&self, _document: &mut Map<String, Value>) {}
}

impl FromDocument for NullValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            common: Common::from_document(document, ctx)?,
        })
    }
}

// =============================================================================
// Date and Datetime
// =============================================================================

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Parse a datetime; RFC 3339 values are compared in UTC
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
}

fn format_bound<T>(raw: &str, parse: fn(&str) -> Option<T>, what: &str) -> Result<FormatBound<T>> {
    match parse(raw) {
        Some(value) => Ok(FormatBound {
            raw: raw.to_string(),
            value,
        }),
        None => Err(Error::Value(format!("'{}' is not a valid {}", raw, what))),
    }
}

fn export_format_range<T>(range: &FormatRange<T>, document: &mut Map<String, Value>) {
    if let Some(min) = &range.minimum {
        document.insert(KW_FORMAT_MINIMUM.to_string(), Value::String(min.raw.clone()));
    }
    if let Some(max) = &range.maximum {
        document.insert(KW_FORMAT_MAXIMUM.to_string(), Value::String(max.raw.clone()));
    }
}

/// Validator for `YYYY-MM-DD` dates; the cast value is the canonical spelling
#[derive(Debug, Clone, Default)]
pub struct DateValidator {
    bounds: FormatRange<NaiveDate>,
    common: Common,
}

impl DateValidator {
    /// Create a date validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject dates before `minimum`
    pub fn with_format_minimum(mut self, minimum: &str) -> Result<Self> {
        self.bounds.minimum = Some(format_bound(minimum, parse_date, TYPE_DATE)?);
        self.bounds.check_bounds()?;
        Ok(self)
    }

    /// Reject dates after `maximum`
    pub fn with_format_maximum(mut self, maximum: &str) -> Result<Self> {
        self.bounds.maximum = Some(format_bound(maximum, parse_date, TYPE_DATE)?);
        self.bounds.check_bounds()?;
        Ok(self)
    }
}

impl Validator for DateValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_DATE)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Some(date) = value.as_str().and_then(parse_date) else {
            return type_failure(TYPE_DATE, value, path);
        };
        match self.bounds.check(&date, path) {
            Ok(()) => ValidationResult::success(Value::String(date.format(DATE_FORMAT).to_string())),
            Err(failure) => ValidationResult::fail(value.clone(), failure),
        }
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        export_format_range(&self.bounds, document);
    }
}

impl FromDocument for DateValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let mut validator = Self::new();
        if let Some(min) = ctx.get_string(document, KW_FORMAT_MINIMUM)? {
            validator = ctx.located(validator.with_format_minimum(&min), KW_FORMAT_MINIMUM)?;
        }
        if let Some(max) = ctx.get_string(document, KW_FORMAT_MAXIMUM)? {
            validator = ctx.located(validator.with_format_maximum(&max), KW_FORMAT_MAXIMUM)?;
        }
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

/// Validator for datetimes (`YYYY-MM-DD HH:MM:SS` or RFC 3339)
#[derive(Debug, Clone, Default)]
pub struct DatetimeValidator {
    bounds: FormatRange<NaiveDateTime>,
    common: Common,
}

impl DatetimeValidator {
    /// Create a datetime validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject datetimes before `minimum`
    pub fn with_format_minimum(mut self, minimum: &str) -> Result<Self> {
        self.bounds.minimum = Some(format_bound(minimum, parse_datetime, TYPE_DATETIME)?);
        self.bounds.check_bounds()?;
        Ok(self)
    }

    /// Reject datetimes after `maximum`
    pub fn with_format_maximum(mut self, maximum: &str) -> Result<Self> {
        self.bounds.maximum = Some(format_bound(maximum, parse_datetime, TYPE_DATETIME)?);
        self.bounds.check_bounds()?;
        Ok(self)
    }
}

impl Validator for DatetimeValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_DATETIME)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Some(datetime) = value.as_str().and_then(parse_datetime) else {
            return type_failure(TYPE_DATETIME, value, path);
        };
        match self.bounds.check(&datetime, path) {
            Ok(()) => ValidationResult::success(value.clone()),
            Err(failure) => ValidationResult::fail(value.clone(), failure),
        }
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        export_format_range(&self.bounds, document);
    }
}

impl FromDocument for DatetimeValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let mut validator = Self::new();
        if let Some(min) = ctx.get_string(document, KW_FORMAT_MINIMUM)? {
            validator = ctx.located(validator.with_format_minimum(&min), KW_FORMAT_MINIMUM)?;
        }
        if let Some(max) = ctx.get_string(document, KW_FORMAT_MAXIMUM)? {
            validator = ctx.located(validator.with_format_maximum(&max), KW_FORMAT_MAXIMUM)?;
        }
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

// =============================================================================
// Enum
// =============================================================================

/// Validator restricting any value to a list of literals
///
/// Membership is checked by the common `enum` stage, so this kind only
/// guarantees the list is present.
#[derive(Debug, Clone)]
pub struct EnumValidator {
    common: Common,
}

impl EnumValidator {
    /// Create an enum validator from a non-empty list of literals
    pub fn new(values: Vec<Value>, validate_type: bool) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::Value("enum requires at least one value".to_string()));
        }
        let mut common = Common::new();
        common.enumeration = Some(values);
        common.validate_type = validate_type;
        Ok(Self { common })
    }

    /// Allowed literals
    pub fn values(&self) -> &[Value] {
        self.common.enumeration.as_deref().unwrap_or_default()
    }
}

impl Validator for EnumValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_ENUM)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, _path: &InstancePath) -> ValidationResult {
        ValidationResult::success(value.clone())
    }

    fn export_keywords(&self, _document: &mut Map<String, Value>) {}
}

impl FromDocument for EnumValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let common = Common::from_document(document, ctx)?;
        if common.enumeration.is_none() {
            return Err(ctx.error(KW_ENUM, "type 'enum' requires an 'enum' list"));
        }
        Ok(Self { common })
    }
}

// =============================================================================
// Url, Username and Uuid
// =============================================================================

/// Validator for absolute URLs with a host
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    common: Common,
}

impl UrlValidator {
    /// Create a url validator
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for UrlValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_URL)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::String(text) = value else {
            return type_failure(TYPE_URL, value, path);
        };
        match url::Url::parse(text) {
            Ok(parsed) if parsed.has_host() => ValidationResult::success(value.clone()),
            Ok(_) => ValidationResult::fail(
                value.clone(),
                Failure::new(FailureKind::Type, path.to_pointer())
                    .with_message(format!("'{}' has no host", text)),
            ),
            Err(err) => ValidationResult::fail(
                value.clone(),
                Failure::new(FailureKind::Type, path.to_pointer())
                    .with_message(format!("'{}' is not a valid url: {}", text, err)),
            ),
        }
    }

    fn export_keywords(&self, _document: &mut Map<String, Value>) {}
}

impl FromDocument for UrlValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            common: Common::from_document(document, ctx)?,
        })
    }
}

/// Validator for user names
#[derive(Debug, Clone)]
pub struct UsernameValidator {
    pattern: PatternFacet,
    common: Common,
}

impl UsernameValidator {
    /// Create a username validator with the default pattern
    pub fn new() -> Self {
        Self {
            pattern: (*DEFAULT_USERNAME).clone(),
            common: Common::new(),
        }
    }

    /// Replace the default pattern
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = PatternFacet::new(pattern)?;
        Ok(self)
    }
}

impl Default for UsernameValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for UsernameValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_USERNAME)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::String(text) = value else {
            return type_failure(TYPE_USERNAME, value, path);
        };
        match self.pattern.check(text, path) {
            Ok(()) => ValidationResult::success(value.clone()),
            Err(failure) => ValidationResult::fail(value.clone(), failure),
        }
    }

    fn export_keywords(&self, document: &mut Map<String, Value>) {
        if self.pattern.pattern != DEFAULT_USERNAME_PATTERN {
            document.insert(KW_PATTERN.to_string(), Value::String(self.pattern.pattern.clone()));
        }
    }
}

impl FromDocument for UsernameValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        let mut validator = Self::new();
        if let Some(pattern) = ctx.get_string(document, KW_PATTERN)? {
            validator = ctx.located(validator.with_pattern(&pattern), KW_PATTERN)?;
        }
        validator.common = Common::from_document(document, ctx)?;
        Ok(validator)
    }
}

/// Validator for UUIDs; the cast value is the lowercase hyphenated form
#[derive(Debug, Clone, Default)]
pub struct UuidValidator {
    common: Common,
}

impl UuidValidator {
    /// Create a uuid validator
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator for UuidValidator {
    fn type_name(&self) -> Option<&str> {
        Some(TYPE_UUID)
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
        let Value::String(text) = value else {
            return type_failure(TYPE_UUID, value, path);
        };
        match uuid::Uuid::parse_str(text.trim()) {
            Ok(parsed) => ValidationResult::success(Value::String(parsed.hyphenated().to_string())),
            Err(err) => ValidationResult::fail(
                value.clone(),
                Failure::new(FailureKind::Type, path.to_pointer())
                    .with_message(format!("'{}' is not a valid uuid: {}", text, err)),
            ),
        }
    }

    fn export_keywords(&self, _document: &mut Map<String, Value>) {}
}

impl FromDocument for UuidValidator {
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            common: Common::from_document(document, ctx)?,
        })
    }
}

impl_with_common!(
    StringValidator,
    NumberValidator,
    IntegerValidator,
    UnsignedIntegerValidator,
    BooleanValidator,
    NullValidator,
    DateValidator,
    DatetimeValidator,
    EnumValidator,
    UrlValidator,
    UsernameValidator,
    UuidValidator,
);
