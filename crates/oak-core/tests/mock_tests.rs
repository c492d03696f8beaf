//! Mock synthesis properties. Randomness is seeded everywhere: a fixed seed giving a
//! fixed value is part of the contract, so fixtures can be regenerated reproducibly.

use std::path::Path;

use oak_core::mock::{DEFAULT_MAX_DEPTH, MockContext, MockSynthesizer};
use oak_core::normalize::{self, MemoryLoader};
use oak_core::parse::schema::SchemaOrRef;
use oak_core::{OpenApiDocument, index_operations, resolve};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const RECURSIVE: &str = include_str!("fixtures/recursive.yaml");

fn load(name: &str, content: &str) -> OpenApiDocument {
    let loader = MemoryLoader::new().with_document(name, content);
    normalize::normalize(Path::new(name), &loader).unwrap()
}

fn schema(yaml: &str) -> SchemaOrRef {
    serde_yaml_ng::from_str(yaml).unwrap()
}

fn node_ref() -> SchemaOrRef {
    schema("$ref: '#/components/schemas/Node'")
}

#[test]
fn test_example_takes_precedence() {
    let doc = load("recursive.yaml", RECURSIVE);
    let cases = [
        ("type: string\nexample: hello", json!("hello")),
        ("type: integer\nexample: { not: an-integer }", json!({"not": "an-integer"})),
        ("type: array\nitems: { type: string }\nexample: [1, 2, 3]", json!([1, 2, 3])),
        ("type: string\nnullable: true\nexample: never-null", json!("never-null")),
    ];
    for seed in 0..20 {
        let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(seed));
        for (yaml, expected) in &cases {
            let value = synth.synthesize(&schema(yaml), &mut MockContext::new());
            assert_eq!(value.as_ref(), Some(expected), "schema: {yaml}");
        }
    }
}

#[test]
fn test_arrays_have_one_or_two_items() {
    let doc = load("petstore.yaml", PETSTORE);
    let nodes = [
        schema("type: array\nitems: { type: string }"),
        schema("items: { $ref: '#/components/schemas/Pet' }"),
        schema("type: array\nitems:\n  type: array\n  items: { type: integer }"),
    ];
    for seed in 0..200 {
        let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(seed));
        for node in &nodes {
            let value = synth.synthesize(node, &mut MockContext::new()).unwrap();
            let len = value.as_array().map(Vec::len);
            assert!(matches!(len, Some(1 | 2)), "got {value}");
        }
    }
}

#[test]
fn test_both_array_lengths_occur() {
    let doc = load("petstore.yaml", PETSTORE);
    let node = schema("type: array\nitems: { type: boolean }");
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(11));
    let lengths: Vec<usize> = (0..100)
        .map(|_| {
            let value = synth.synthesize(&node, &mut MockContext::new()).unwrap();
            value.as_array().map_or(0, Vec::len)
        })
        .collect();
    assert!(lengths.contains(&1));
    assert!(lengths.contains(&2));
}

#[test]
fn test_nullable_yields_both_outcomes() {
    let doc = load("recursive.yaml", RECURSIVE);
    for yaml in ["type: string\nnullable: true", "type: [integer, 'null']"] {
        let node = schema(yaml);
        let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(2024));
        let values: Vec<Value> = (0..100)
            .map(|_| synth.synthesize(&node, &mut MockContext::new()).unwrap())
            .collect();
        assert!(values.iter().any(Value::is_null), "{yaml}: never null");
        assert!(values.iter().any(|v| !v.is_null()), "{yaml}: always null");
    }
}

#[test]
fn test_recursive_schema_terminates() {
    let doc = load("recursive.yaml", RECURSIVE);
    for limit in [1, 2, 5] {
        let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(limit as u64));
        let mut ctx = MockContext::with_limit(limit);
        let value = synth.synthesize(&node_ref(), &mut ctx);
        assert!(value.is_some(), "top-level node is within the limit");
        assert!(
            ctx.exceeded().contains("#/components/schemas/Node"),
            "limit {limit} should be hit"
        );
        assert!(ctx.count("#/components/schemas/Node") > limit);
    }
}

#[test]
fn test_recursive_schema_with_default_limit() {
    let doc = load("recursive.yaml", RECURSIVE);
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(99));
    let mut ctx = MockContext::new();
    let value = synth.synthesize(&node_ref(), &mut ctx).unwrap();
    assert!(value.is_object());
    assert!(ctx.exceeded().contains("#/components/schemas/Node"));
}

#[test]
fn test_limit_zero_omits_the_reference() {
    let doc = load("recursive.yaml", RECURSIVE);
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(0));
    let mut ctx = MockContext::with_limit(0);
    assert_eq!(synth.synthesize(&node_ref(), &mut ctx), None);
}

#[test]
fn test_formats() {
    let doc = load("recursive.yaml", RECURSIVE);
    let leaf = schema("$ref: '#/components/schemas/Leaf'");
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(5));
    for _ in 0..20 {
        let value = synth.synthesize(&leaf, &mut MockContext::new()).unwrap();
        let created = value["created"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok(), "{created}");
        assert_eq!(value["example"], "fixed-value");
        assert!(value["label"].is_null() || value["label"].is_string());
    }
}

#[test]
fn test_list_pets_mock_shape() {
    let doc = load("petstore.yaml", PETSTORE);
    let ops = index_operations(&doc);
    let list = ops.iter().find(|op| op.operation_id() == "listPets").unwrap();
    let (status, node) = list.success_response().unwrap();
    assert_eq!(status, "200");

    for seed in 0..50 {
        let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(seed));
        let value = synth.synthesize(node, &mut MockContext::new()).unwrap();
        let pets = value.as_array().unwrap();
        assert!((1..=2).contains(&pets.len()));
        for pet in pets {
            assert!(pet["id"].is_number(), "{pet}");
            assert!(pet["name"].is_string(), "{pet}");
            let status = pet["status"].as_str().unwrap();
            assert!(["available", "pending", "sold"].contains(&status));
        }
    }
}

#[test]
fn test_same_seed_same_value() {
    let doc = load("petstore.yaml", PETSTORE);
    let node = schema("$ref: '#/components/schemas/Pet'");
    let first = MockSynthesizer::new(&doc, StdRng::seed_from_u64(7))
        .synthesize(&node, &mut MockContext::new());
    let second = MockSynthesizer::new(&doc, StdRng::seed_from_u64(7))
        .synthesize(&node, &mut MockContext::new());
    assert_eq!(first, second);
}

#[test]
fn test_resolve_is_idempotent_for_every_component() {
    let doc = load("petstore.yaml", PETSTORE);
    let components = doc.components.as_ref().unwrap();
    for (name, _) in &components.schemas {
        let node = SchemaOrRef::Ref {
            ref_path: format!("#/components/schemas/{name}"),
        };
        let once = resolve(&node, &doc).unwrap();
        let again = SchemaOrRef::Schema(Box::new(once.clone()));
        assert_eq!(resolve(&again, &doc), Some(once), "{name}");
    }
}

/// `S0.next → S1.next → … → S{len-1}.next → S0`.
fn reference_ring(len: usize) -> OpenApiDocument {
    let mut yaml = String::from(
        "openapi: 3.0.0\ninfo: { title: t, version: \"1\" }\npaths: {}\ncomponents:\n  schemas:\n",
    );
    for i in 0..len {
        yaml.push_str(&format!(
            "    S{i}:\n      type: object\n      properties:\n        value: {{ type: integer }}\n        next: {{ $ref: '#/components/schemas/S{}' }}\n",
            (i + 1) % len
        ));
    }
    oak_core::parse::from_yaml(&yaml).unwrap()
}

#[test]
fn test_long_reference_ring_stops_at_max_depth() {
    let doc = reference_ring(200);
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(5));
    let mut ctx = MockContext::new();
    let value = synth
        .synthesize(&schema("$ref: '#/components/schemas/S0'"), &mut ctx)
        .unwrap();

    let mut nested = 0;
    let mut current = &value;
    while let Some(object) = current.as_object() {
        nested += 1;
        assert!(object["value"].is_i64());
        match object.get("next") {
            Some(next) => current = next,
            None => break,
        }
    }
    assert_eq!(nested, DEFAULT_MAX_DEPTH);
    assert_eq!(ctx.depth(), 0);
    assert!(ctx.exceeded().contains(&format!("#/components/schemas/S{DEFAULT_MAX_DEPTH}")));
}

#[test]
fn test_short_ring_with_high_cycle_limit_is_bounded_by_depth() {
    let doc = reference_ring(20);
    let mut synth = MockSynthesizer::new(&doc, StdRng::seed_from_u64(6));
    let mut ctx = MockContext::with_limit(1_000).with_max_depth(8);
    let value = synth
        .synthesize(&schema("$ref: '#/components/schemas/S0'"), &mut ctx)
        .unwrap();
    assert_eq!(value.pointer("/next/next/next/next/next/next/next/value").map(Value::is_i64), Some(true));
    assert!(value.pointer("/next/next/next/next/next/next/next/next").is_none());
    assert!(ctx.exceeded().contains("#/components/schemas/S8"));
}
