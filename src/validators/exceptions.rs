//! Validation failures
//!
//! Structured description of why a value was rejected: which schema
//! constraint was violated, where in the value, and the child failures that
//! object, array and composition validators aggregate.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The schema constraint a value violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Wrong primitive kind or unparsable representation
    Type,
    /// String shorter than `minLength`
    MinLength,
    /// String longer than `maxLength`
    MaxLength,
    /// String does not match `pattern`
    Pattern,
    /// Number lower than `minimum`
    Minimum,
    /// Number greater than `maximum`
    Maximum,
    /// Number not strictly greater than an exclusive `minimum`
    ExclusiveMinimum,
    /// Number not strictly lower than an exclusive `maximum`
    ExclusiveMaximum,
    /// Number is not a multiple of `multipleOf`
    MultipleOf,
    /// Date or datetime before `formatMinimum`
    FormatMinimum,
    /// Date or datetime after `formatMaximum`
    FormatMaximum,
    /// Sequence shorter than `minItems`
    MinItems,
    /// Sequence longer than `maxItems`
    MaxItems,
    /// Sequence holds duplicate items
    UniqueItems,
    /// One or more items failed the item schema
    Items,
    /// Mapping has fewer than `minProperties` keys
    MinProperties,
    /// Mapping has more than `maxProperties` keys
    MaxProperties,
    /// Required keys are missing
    Required,
    /// One or more declared properties failed
    Properties,
    /// Keys not declared while additional properties are rejected
    AdditionalProperties,
    /// Keys present without the keys they depend on
    Dependencies,
    /// Value is not one of the allowed literals
    Enum,
    /// Value matched a schema it must not match
    Not,
    /// No composition branch matched
    AnyOf,
    /// Not every composition branch matched
    AllOf,
    /// Zero or several composition branches matched
    OneOf,
}

impl FailureKind {
    /// Schema keyword naming this constraint
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Type => "type",
            FailureKind::MinLength => "minLength",
            FailureKind::MaxLength => "maxLength",
            FailureKind::Pattern => "pattern",
            FailureKind::Minimum => "minimum",
            FailureKind::Maximum => "maximum",
            FailureKind::ExclusiveMinimum => "exclusiveMinimum",
            FailureKind::ExclusiveMaximum => "exclusiveMaximum",
            FailureKind::MultipleOf => "multipleOf",
            FailureKind::FormatMinimum => "formatMinimum",
            FailureKind::FormatMaximum => "formatMaximum",
            FailureKind::MinItems => "minItems",
            FailureKind::MaxItems => "maxItems",
            FailureKind::UniqueItems => "uniqueItems",
            FailureKind::Items => "items",
            FailureKind::MinProperties => "minProperties",
            FailureKind::MaxProperties => "maxProperties",
            FailureKind::Required => "required",
            FailureKind::Properties => "properties",
            FailureKind::AdditionalProperties => "additionalProperties",
            FailureKind::Dependencies => "dependencies",
            FailureKind::Enum => "enum",
            FailureKind::Not => "not",
            FailureKind::AnyOf => "anyOf",
            FailureKind::AllOf => "allOf",
            FailureKind::OneOf => "oneOf",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload of a failure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "detail")]
pub enum FailureDetail {
    /// No extra detail
    #[default]
    None,
    /// Keys involved (missing required keys, undeclared keys)
    Keys {
        /// Offending keys in the order they were found
        keys: Vec<String>,
    },
    /// Aggregate outcome of an object's declared properties
    #[serde(rename_all = "camelCase")]
    Properties {
        /// Present keys whose value failed its property schema
        incorrect: Vec<String>,
        /// Required keys absent from the value
        missing: Vec<String>,
        /// Present keys mapped to the dependency keys they lack
        missing_dependencies: IndexMap<String, Vec<String>>,
    },
    /// Sequence positions involved (failing items, duplicates)
    Indices {
        /// Offending positions in ascending order
        indices: Vec<usize>,
    },
}

/// A violated schema constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Which constraint was violated
    pub kind: FailureKind,
    /// JSON Pointer of the rejected value
    pub path: String,
    /// Human readable reason
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Kind-specific detail
    #[serde(flatten)]
    pub detail: FailureDetail,
    /// Child failures (per property, per item, per composition branch)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<Failure>,
}

impl Failure {
    /// Create a new failure
    pub fn new(kind: FailureKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: String::new(),
            detail: FailureDetail::None,
            nested: Vec::new(),
        }
    }

    /// Set the reason
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the detail
    pub fn with_detail(mut self, detail: FailureDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Attach child failures
    pub fn with_nested(mut self, nested: Vec<Failure>) -> Self {
        self.nested = nested;
        self
    }

    /// Keys carried by a `Keys` detail
    pub fn keys(&self) -> &[String] {
        match &self.detail {
            FailureDetail::Keys { keys } => keys,
            _ => &[],
        }
    }

    /// Indices carried by an `Indices` detail
    pub fn indices(&self) -> &[usize] {
        match &self.detail {
            FailureDetail::Indices { indices } => indices,
            _ => &[],
        }
    }

    /// Depth-first search for a failure of the given kind, self included
    pub fn find(&self, kind: FailureKind) -> Option<&Failure> {
        if self.kind == kind {
            return Some(self);
        }
        self.nested.iter().find_map(|child| child.find(kind))
    }

    /// All leaf failures in depth-first order
    pub fn leaves(&self) -> Vec<&Failure> {
        if self.nested.is_empty() {
            return vec![self];
        }
        self.nested.iter().flat_map(|child| child.leaves()).collect()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{} at {}", self.kind, path)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}
