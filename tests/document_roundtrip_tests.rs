//! Document round-trip tests
//!
//! Building a validator tree from a document and exporting it back must give
//! an equivalent document.

use pretty_assertions::assert_eq;
use schemacast::{
    ArrayValidator, IntegerValidator, ObjectValidator, SchemaBuilder, StringValidator, Validator,
    WithCommon,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn round_trip(document: Value) {
    let validator = SchemaBuilder::new().build(&document).unwrap();
    assert_eq!(validator.to_document(), document);

    // exporting twice is stable
    let again = SchemaBuilder::new().build(&validator.to_document()).unwrap();
    assert_eq!(again.to_document(), document);
}

// ============================================================================
// Representative documents
// ============================================================================

#[test]
fn test_round_trip_object() {
    round_trip(json!({
        "type": "object",
        "title": "Account",
        "minProperties": 1,
        "maxProperties": 5,
        "properties": {
            "name": {"type": "string", "minLength": 2, "maxLength": 40, "pattern": "^[A-Za-z ]+$"},
            "age": {"type": "unsignedinteger", "maximum": 150},
            "active": {"type": "boolean", "default": true},
            "card": {"type": "string"},
            "billing": {"type": "string"}
        },
        "required": ["name", "age"],
        "additionalProperties": false,
        "dependencies": {"card": ["billing"]}
    }));
}

#[test]
fn test_round_trip_array() {
    round_trip(json!({
        "type": "array",
        "description": "ratios",
        "minItems": 1,
        "maxItems": 10,
        "items": {
            "type": "number",
            "minimum": 0,
            "maximum": 1,
            "exclusiveMaximum": true,
            "multipleOf": 0.25
        },
        "uniqueItems": true
    }));
}

#[test]
fn test_round_trip_any_of() {
    round_trip(json!({
        "anyOf": [
            {"type": "uuid"},
            {"type": "integer", "minimum": -10, "maximum": 10},
            {"allOf": [{"type": "string"}, {"type": "url"}]}
        ],
        "title": "identifier"
    }));
}

#[test]
fn test_round_trip_enum() {
    round_trip(json!({
        "type": "enum",
        "enum": ["one", 2, [1, 2], {"three": 3}],
        "validateType": true
    }));
}

#[test]
fn test_round_trip_common_keywords() {
    round_trip(json!({
        "type": "integer",
        "title": "port",
        "description": "listening port",
        "default": 8080,
        "enum": [80, 443, 8080],
        "not": {"type": "integer", "maximum": 0}
    }));
}

#[test]
fn test_round_trip_dates() {
    round_trip(json!({
        "type": "object",
        "properties": {
            "born": {"type": "date", "formatMinimum": "1900-01-01"},
            "seen": {"type": "datetime", "formatMaximum": "2030-01-01 00:00:00"},
            "login": {"type": "username"},
            "nothing": {"type": "null"}
        }
    }));
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_default_valued_keywords_are_omitted() {
    let validator = SchemaBuilder::new()
        .build(&json!({
            "type": "array",
            "minItems": 0,
            "uniqueItems": false,
            "items": {"type": "unsignedinteger", "minimum": 0}
        }))
        .unwrap();

    assert_eq!(
        validator.to_document(),
        json!({"type": "array", "items": {"type": "unsignedinteger"}})
    );
}

#[test]
fn test_programmatic_tree_exports() {
    let validator = ObjectValidator::new(0, None)
        .unwrap()
        .with_property(
            "tags",
            Arc::new(
                ArrayValidator::new(0, Some(3))
                    .unwrap()
                    .with_items(Arc::new(StringValidator::new(1, None).unwrap())),
            ),
        )
        .with_property(
            "level",
            Arc::new(
                IntegerValidator::new(Some(1), Some(5))
                    .unwrap()
                    .with_title("level"),
            ),
        )
        .with_required(["level"]);

    let document = validator.to_document();
    assert_eq!(
        document,
        json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "maxItems": 3, "items": {"type": "string", "minLength": 1}},
                "level": {"type": "integer", "minimum": 1, "maximum": 5, "title": "level"}
            },
            "required": ["level"]
        })
    );

    let rebuilt = SchemaBuilder::new().build(&document).unwrap();
    assert_eq!(rebuilt.to_document(), document);
}

#[test]
fn test_json_string_export() {
    let validator = SchemaBuilder::new()
        .from_json_str(r#"{"oneOf": [{"type": "string"}, {"type": "null"}]}"#)
        .unwrap();

    let text = validator.to_json_string().unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({"oneOf": [{"type": "string"}, {"type": "null"}]}));

    let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["oneOf"]);
}
