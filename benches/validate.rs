//! Benchmarks for nested object validation.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schemacast::{SchemaBuilder, Validator};
use serde_json::{json, Value};

fn order_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "uuid"},
            "placed": {"type": "datetime"},
            "customer": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "minLength": 1, "maxLength": 80},
                    "email": {"type": "string", "pattern": "^[^@]+@[^@]+$"},
                    "vip": {"type": "boolean", "default": false}
                },
                "required": ["name", "email"]
            },
            "lines": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "sku": {"type": "string"},
                        "quantity": {"type": "unsignedinteger", "minimum": 1},
                        "price": {"type": "number", "minimum": 0, "multipleOf": 0.01}
                    },
                    "required": ["sku", "quantity"],
                    "additionalProperties": false
                }
            },
            "status": {"type": "enum", "enum": ["open", "paid", "shipped"]}
        },
        "required": ["id", "lines"]
    })
}

fn order(line_count: usize) -> Value {
    let lines: Vec<Value> = (0..line_count)
        .map(|i| json!({"sku": format!("SKU-{}", i), "quantity": "2", "price": "9.99"}))
        .collect();
    json!({
        "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "placed": "2024-05-01T10:30:00",
        "customer": {"name": "Ada", "email": "ada@example.com"},
        "lines": lines,
        "status": "paid"
    })
}

fn bench_validate(c: &mut Criterion) {
    let schema = SchemaBuilder::new().build(&order_schema()).unwrap();
    let mut group = c.benchmark_group("validate_order");

    for line_count in [1, 10, 100, 1_000] {
        let value = order(line_count);
        group.bench_with_input(BenchmarkId::new("lines", line_count), &value, |b, value| {
            b.iter(|| black_box(schema.validate(black_box(value))));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let document = order_schema();
    c.bench_function("build_order_schema", |b| {
        b.iter(|| black_box(SchemaBuilder::new().build(black_box(&document)).unwrap()));
    });
}

criterion_group!(benches, bench_validate, bench_build);
criterion_main!(benches);
