//! Sharing a validator tree across threads
//!
//! A built tree holds no per-call state, so one `Arc` can serve many threads
//! at once while the registry is read and extended concurrently.

use schemacast::{
    register_validator_type, BooleanValidator, FailureKind, SchemaBuilder, Validator,
    ValidatorRef,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn shared_schema() -> ValidatorRef {
    SchemaBuilder::new()
        .build(&json!({
            "type": "object",
            "properties": {
                "id": {"type": "unsignedinteger"},
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
                "mode": {"oneOf": [{"type": "boolean"}, {"type": "null"}]}
            },
            "required": ["id"]
        }))
        .unwrap()
}

#[test]
fn test_shared_tree_across_threads() {
    let schema = shared_schema();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                for i in 0..200u64 {
                    let id = worker * 1000 + i;
                    let value = json!({"id": id.to_string(), "tags": ["a", "b"], "mode": "yes"});
                    let cast = schema.parse(&value).unwrap();
                    assert_eq!(cast, json!({"id": id, "tags": ["a", "b"], "mode": true}));

                    let rejected = schema.validate(&json!({"tags": ["a", "a"]}));
                    assert_eq!(rejected.failure().unwrap().kind, FailureKind::Required);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_registration_while_building() {
    let builders: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..50 {
                    let schema = SchemaBuilder::new()
                        .build(&json!({"type": "integer", "minimum": 0}))
                        .unwrap();
                    assert!(schema.is_valid(&json!("12")));
                }
            })
        })
        .collect();

    let registrar = thread::spawn(|| {
        for i in 0..20 {
            register_validator_type::<BooleanValidator>(format!("flag{}", i)).unwrap();
        }
    });

    for handle in builders {
        handle.join().unwrap();
    }
    registrar.join().unwrap();

    let schema = SchemaBuilder::new().build(&json!({"type": "flag7"})).unwrap();
    assert_eq!(schema.parse(&json!("on")).unwrap(), json!(true));
}
