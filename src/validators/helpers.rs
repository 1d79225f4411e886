//! Validator helper functions
//!
//! This module provides the value equality policies used by `enum` and
//! `uniqueItems`, and the scalar casting functions used by leaf validators.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// Accepted boolean spellings (matched case-insensitively)
    pub static ref BOOLEAN_MAP: HashMap<&'static str, bool> = {
        let mut m = HashMap::new();
        m.insert("true", true);
        m.insert("1", true);
        m.insert("yes", true);
        m.insert("on", true);
        m.insert("false", false);
        m.insert("0", false);
        m.insert("no", false);
        m.insert("off", false);
        m
    };
}

// =============================================================================
// Kinds
// =============================================================================

/// Name of the primitive kind of a value, as used in failure messages
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if is_integer(n) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64()
}

// =============================================================================
// Equality
// =============================================================================

/// Compare two values under the enum equality policy.
///
/// With `strict`, both values must share the same primitive kind (integer and
/// real numbers are distinct kinds). Without it, numbers compare numerically
/// and a numeric or boolean string equals the number or boolean it spells.
/// Sequences compare as multisets, mappings key by key.
pub fn values_equal(a: &Value, b: &Value, strict: bool) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => sequences_equal(x, y, strict),
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, left)| {
                    y.get(key)
                        .map_or(false, |right| values_equal(left, right, strict))
                })
        }
        (Value::Number(x), Value::Number(y)) => {
            if strict && is_integer(x) != is_integer(y) {
                return false;
            }
            numbers_equal(x, y)
        }
        _ if strict => a == b,
        (Value::Number(n), Value::String(_)) | (Value::String(_), Value::Number(n)) => {
            let text = if a.is_string() { a } else { b };
            cast_number(text).map_or(false, |parsed| numbers_equal(n, &parsed))
        }
        (Value::Bool(flag), Value::String(s)) | (Value::String(s), Value::Bool(flag)) => {
            parse_boolean(s) == Some(*flag)
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    compare_numbers(x, y) == Some(Ordering::Equal)
}

fn integer_of(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact ordering of two numbers; integers beyond 2^53 are not rounded
/// through `f64`
pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (integer_of(a), integer_of(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => compare_integer_float(x, b.as_f64()?),
        (None, Some(y)) => compare_integer_float(y, a.as_f64()?).map(Ordering::reverse),
        (None, None) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn compare_integer_float(integer: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // every i128 built from an i64 or u64 lies well inside +-2^127
    if float >= 2f64.powi(127) {
        return Some(Ordering::Less);
    }
    if float < -(2f64.powi(127)) {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match integer.cmp(&(whole as i128)) {
        Ordering::Equal => 0f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

/// Order-independent multiset comparison of two sequences
pub fn sequences_equal(a: &[Value], b: &[Value], strict: bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|left| {
        let found = b
            .iter()
            .enumerate()
            .position(|(i, right)| !used[i] && values_equal(left, right, strict));
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Positions of items equal to an earlier item of the same sequence
pub fn duplicate_indices(items: &[Value], strict: bool) -> Vec<usize> {
    (1..items.len())
        .filter(|&j| items[..j].iter().any(|earlier| values_equal(earlier, &items[j], strict)))
        .collect()
}

// =============================================================================
// Casting
// =============================================================================

/// Parse a boolean spelling
pub fn parse_boolean(value: &str) -> Option<bool> {
    BOOLEAN_MAP.get(value.trim().to_ascii_lowercase().as_str()).copied()
}

/// Cast a value to a boolean: booleans, boolean spellings, and the numbers 1 and 0
pub fn cast_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => parse_boolean(s),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Cast a value to a number: numbers as they are, numeric strings parsed
pub fn cast_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Number::from(i));
            }
            if let Ok(u) = s.parse::<u64>() {
                return Some(Number::from(u));
            }
            s.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

/// Cast a value to an integer: integers (signed or unsigned), integral
/// reals and integer strings
pub fn cast_integer(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) if is_integer(n) => Some(n.clone()),
        Value::Number(n) => n.as_f64().and_then(integral_number),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Number::from)
                .or_else(|_| s.parse::<u64>().map(Number::from))
                .ok()
        }
        _ => None,
    }
}

fn integral_number(value: f64) -> Option<Number> {
    if value.fract() != 0.0 {
        return None;
    }
    if value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else if value >= 0.0 && value < u64::MAX as f64 {
        Some(Number::from(value as u64))
    } else {
        None
    }
}

/// Convert a float to a JSON number, integral values as integers; `None`
/// for non-finite floats
pub fn number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    integral_number(value).or_else(|| Number::from_f64(value))
}
