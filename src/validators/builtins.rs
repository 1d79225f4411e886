//! Built-in type names and schema keywords
//!
//! This module names every built-in validator kind and every keyword a
//! schema document may carry, along with the keyword set admitted by each
//! kind.

use std::collections::HashSet;

// =============================================================================
// Type Names
// =============================================================================

/// String type name
pub const TYPE_STRING: &str = "string";
/// Number type name
pub const TYPE_NUMBER: &str = "number";
/// Integer type name
pub const TYPE_INTEGER: &str = "integer";
/// Unsigned integer type name
pub const TYPE_UNSIGNED_INTEGER: &str = "unsignedinteger";
/// Boolean type name
pub const TYPE_BOOLEAN: &str = "boolean";
/// Null type name
pub const TYPE_NULL: &str = "null";
/// Date type name
pub const TYPE_DATE: &str = "date";
/// Datetime type name
pub const TYPE_DATETIME: &str = "datetime";
/// Enum type name
pub const TYPE_ENUM: &str = "enum";
/// URL type name
pub const TYPE_URL: &str = "url";
/// Username type name
pub const TYPE_USERNAME: &str = "username";
/// UUID type name
pub const TYPE_UUID: &str = "uuid";
/// Object type name
pub const TYPE_OBJECT: &str = "object";
/// Array type name
pub const TYPE_ARRAY: &str = "array";

/// Every built-in type name, in registration order
pub const BUILTIN_TYPES: &[&str] = &[
    TYPE_STRING,
    TYPE_NUMBER,
    TYPE_INTEGER,
    TYPE_UNSIGNED_INTEGER,
    TYPE_BOOLEAN,
    TYPE_NULL,
    TYPE_DATE,
    TYPE_DATETIME,
    TYPE_ENUM,
    TYPE_URL,
    TYPE_USERNAME,
    TYPE_UUID,
    TYPE_OBJECT,
    TYPE_ARRAY,
];

// =============================================================================
// Keywords
// =============================================================================

/// type keyword
pub const KW_TYPE: &str = "type";
/// title keyword
pub const KW_TITLE: &str = "title";
/// description keyword
pub const KW_DESCRIPTION: &str = "description";
/// default keyword
pub const KW_DEFAULT: &str = "default";
/// enum keyword
pub const KW_ENUM: &str = "enum";
/// not keyword
pub const KW_NOT: &str = "not";
/// validateType keyword
pub const KW_VALIDATE_TYPE: &str = "validateType";

/// minLength keyword
pub const KW_MIN_LENGTH: &str = "minLength";
/// maxLength keyword
pub const KW_MAX_LENGTH: &str = "maxLength";
/// pattern keyword
pub const KW_PATTERN: &str = "pattern";

/// minimum keyword
pub const KW_MINIMUM: &str = "minimum";
/// maximum keyword
pub const KW_MAXIMUM: &str = "maximum";
/// exclusiveMinimum keyword
pub const KW_EXCLUSIVE_MINIMUM: &str = "exclusiveMinimum";
/// exclusiveMaximum keyword
pub const KW_EXCLUSIVE_MAXIMUM: &str = "exclusiveMaximum";
/// multipleOf keyword
pub const KW_MULTIPLE_OF: &str = "multipleOf";

/// formatMinimum keyword
pub const KW_FORMAT_MINIMUM: &str = "formatMinimum";
/// formatMaximum keyword
pub const KW_FORMAT_MAXIMUM: &str = "formatMaximum";

/// minItems keyword
pub const KW_MIN_ITEMS: &str = "minItems";
/// maxItems keyword
pub const KW_MAX_ITEMS: &str = "maxItems";
/// items keyword
pub const KW_ITEMS: &str = "items";
/// uniqueItems keyword
pub const KW_UNIQUE_ITEMS: &str = "uniqueItems";

/// minProperties keyword
pub const KW_MIN_PROPERTIES: &str = "minProperties";
/// maxProperties keyword
pub const KW_MAX_PROPERTIES: &str = "maxProperties";
/// properties keyword
pub const KW_PROPERTIES: &str = "properties";
/// required keyword
pub const KW_REQUIRED: &str = "required";
/// additionalProperties keyword
pub const KW_ADDITIONAL_PROPERTIES: &str = "additionalProperties";
/// dependencies keyword
pub const KW_DEPENDENCIES: &str = "dependencies";

/// anyOf keyword
pub const KW_ANY_OF: &str = "anyOf";
/// allOf keyword
pub const KW_ALL_OF: &str = "allOf";
/// oneOf keyword
pub const KW_ONE_OF: &str = "oneOf";

/// Composition keywords, checked in this order when `type` is absent
pub const COMPOSITION_KEYWORDS: &[&str] = &[KW_ANY_OF, KW_ALL_OF, KW_ONE_OF];

// =============================================================================
// Admitted Keyword Sets
// =============================================================================

lazy_static::lazy_static! {
    /// Keywords admitted by every kind
    pub static ref COMMON_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_TYPE);
        s.insert(KW_TITLE);
        s.insert(KW_DESCRIPTION);
        s.insert(KW_DEFAULT);
        s.insert(KW_ENUM);
        s.insert(KW_NOT);
        s.insert(KW_VALIDATE_TYPE);
        s
    };

    /// Keywords admitted by string types
    pub static ref STRING_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_MIN_LENGTH);
        s.insert(KW_MAX_LENGTH);
        s.insert(KW_PATTERN);
        s
    };

    /// Keywords admitted by numeric types
    pub static ref NUMERIC_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_MINIMUM);
        s.insert(KW_MAXIMUM);
        s.insert(KW_EXCLUSIVE_MINIMUM);
        s.insert(KW_EXCLUSIVE_MAXIMUM);
        s.insert(KW_MULTIPLE_OF);
        s
    };

    /// Keywords admitted by date and datetime types
    pub static ref FORMAT_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_FORMAT_MINIMUM);
        s.insert(KW_FORMAT_MAXIMUM);
        s
    };

    /// Keywords admitted by the username type
    pub static ref USERNAME_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_PATTERN);
        s
    };

    /// Keywords admitted by array types
    pub static ref ARRAY_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_MIN_ITEMS);
        s.insert(KW_MAX_ITEMS);
        s.insert(KW_ITEMS);
        s.insert(KW_UNIQUE_ITEMS);
        s
    };

    /// Keywords admitted by object types
    pub static ref OBJECT_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert(KW_MIN_PROPERTIES);
        s.insert(KW_MAX_PROPERTIES);
        s.insert(KW_PROPERTIES);
        s.insert(KW_REQUIRED);
        s.insert(KW_ADDITIONAL_PROPERTIES);
        s.insert(KW_DEPENDENCIES);
        s
    };

    /// Keywords admitted by composition validators
    pub static ref COMPOSITION_KEYWORD_SET: HashSet<&'static str> = {
        COMPOSITION_KEYWORDS.iter().copied().collect()
    };

    /// Keywords admitted by kinds with no type-specific keywords
    pub static ref NO_KEYWORDS: HashSet<&'static str> = HashSet::new();
}

/// Type-specific keywords admitted by a built-in type name
pub fn admitted_keywords(type_name: &str) -> Option<&'static HashSet<&'static str>> {
    let set: &'static HashSet<&'static str> = match type_name {
        TYPE_STRING => &*STRING_KEYWORDS,
        TYPE_NUMBER | TYPE_INTEGER | TYPE_UNSIGNED_INTEGER => &*NUMERIC_KEYWORDS,
        TYPE_DATE | TYPE_DATETIME => &*FORMAT_KEYWORDS,
        TYPE_USERNAME => &*USERNAME_KEYWORDS,
        TYPE_ARRAY => &*ARRAY_KEYWORDS,
        TYPE_OBJECT => &*OBJECT_KEYWORDS,
        TYPE_BOOLEAN | TYPE_NULL | TYPE_ENUM | TYPE_URL | TYPE_UUID => &*NO_KEYWORDS,
        _ => return None,
    };
    Some(set)
}

/// Check if a keyword is admitted for a built-in type name
pub fn is_admitted(type_name: &str, keyword: &str) -> bool {
    COMMON_KEYWORDS.contains(keyword)
        || admitted_keywords(type_name).map_or(false, |set| set.contains(keyword))
}

/// Normalize a type name for convention-based lookup:
/// lowercase, without `_`, `-` or a trailing `validator`
pub fn normalize_type_name(name: &str) -> String {
    let lowered: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    match lowered.strip_suffix("validator") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lowered,
    }
}
