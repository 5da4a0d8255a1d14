// crates/provider-testkit-generator/tests/generator.rs
// ============================================================================
// Module: Example Generator Tests
// Description: Determinism, keyword honoring, and identifier-consistency checks.
// Purpose: Validate example synthesis against the schema extension contract.
// ============================================================================

//! ## Overview
//! One representative widget schema exercises the extension keywords: a
//! patterned caller-assigned identifier, a create-only name, a read-only
//! arn, a write-only secret, and bounded scalar properties.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use proptest::proptest;
use provider_testkit_generator::ExampleGenerator;
use provider_testkit_generator::GeneratorError;
use provider_testkit_generator::decode_pointer;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Representative widget schema with every extension keyword populated.
fn widget_schema() -> Value {
    json!({
        "typeName": "Test::Example::Widget",
        "type": "object",
        "properties": {
            "Id": {"type": "string", "pattern": "^wid-[a-f0-9]{8}$"},
            "Name": {"type": "string", "minLength": 3, "maxLength": 24},
            "Tier": {"type": "string", "enum": ["gold", "silver", "bronze"]},
            "Replicas": {"type": "integer", "minimum": 1, "maximum": 9},
            "Arn": {"type": "string"},
            "Secret": {"type": "string"},
        },
        "required": ["Name"],
        "primaryIdentifier": ["/properties/Id"],
        "createOnlyProperties": ["/properties/Id", "/properties/Name"],
        "readOnlyProperties": ["/properties/Arn"],
        "writeOnlyProperties": ["/properties/Secret"],
    })
}

// ============================================================================
// SECTION: Pointer Decoding
// ============================================================================

#[test]
fn pointers_decode_into_segments() {
    assert_eq!(decode_pointer("/properties/Id").unwrap(), vec!["properties", "Id"]);
    assert_eq!(
        decode_pointer("/properties/Outer/properties/Inner").unwrap(),
        vec!["properties", "Outer", "properties", "Inner"]
    );
    assert_eq!(decode_pointer("/properties/a~1b~0c").unwrap(), vec!["properties", "a/b~c"]);
}

#[test]
fn malformed_pointers_are_rejected() {
    assert!(matches!(
        decode_pointer("properties/Id"),
        Err(GeneratorError::InvalidPointer { .. })
    ));
    assert!(matches!(decode_pointer("/"), Err(GeneratorError::InvalidPointer { .. })));
    assert!(matches!(
        decode_pointer("/properties//Id"),
        Err(GeneratorError::InvalidPointer { .. })
    ));
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

#[test]
fn same_schema_and_seed_yield_identical_examples() {
    let first = ExampleGenerator::with_seed(widget_schema(), 7).unwrap();
    let second = ExampleGenerator::with_seed(widget_schema(), 7).unwrap();
    assert_eq!(first.create_example().unwrap(), second.create_example().unwrap());
    assert_eq!(first.invalid_example().unwrap(), second.invalid_example().unwrap());
}

#[test]
fn distinct_seeds_yield_distinct_examples() {
    let first = ExampleGenerator::with_seed(widget_schema(), 1).unwrap();
    let second = ExampleGenerator::with_seed(widget_schema(), 2).unwrap();
    assert_ne!(first.create_example().unwrap(), second.create_example().unwrap());
}

#[test]
fn fresh_generators_draw_fresh_seeds() {
    let first = ExampleGenerator::new(widget_schema()).unwrap();
    let second = ExampleGenerator::new(widget_schema()).unwrap();
    assert_ne!(first.seed(), second.seed());
}

// ============================================================================
// SECTION: Keyword Honoring
// ============================================================================

#[test]
fn create_examples_honor_required_and_read_only_markers() {
    let generator = ExampleGenerator::with_seed(widget_schema(), 11).unwrap();
    let create = generator.create_example().unwrap();
    let create = create.as_object().unwrap();

    assert!(create.contains_key("Name"), "required property missing");
    assert!(create.contains_key("Id"), "identifier missing");
    assert!(!create.contains_key("Arn"), "read-only property generated");

    let id = create["Id"].as_str().unwrap();
    assert!(id.starts_with("wid-"), "identifier ignores pattern: {id}");
    let replicas = create["Replicas"].as_i64().unwrap();
    assert!((1..=9).contains(&replicas));
    let name = create["Name"].as_str().unwrap();
    assert!((3..=24).contains(&name.len()));
}

#[test]
fn update_examples_preserve_identifier_and_create_only_values() {
    let generator = ExampleGenerator::with_seed(widget_schema(), 13).unwrap();
    let create = generator.create_example().unwrap();
    let update = generator.update_example(&create).unwrap();

    assert_eq!(update["Id"], create["Id"]);
    assert_eq!(update["Name"], create["Name"]);
    assert!(!update.as_object().unwrap().contains_key("Arn"));
}

#[test]
fn invalid_examples_carry_a_never_created_identifier() {
    let generator = ExampleGenerator::with_seed(widget_schema(), 17).unwrap();
    let create = generator.create_example().unwrap();
    let invalid = generator.invalid_example().unwrap();

    assert_ne!(invalid["Id"], create["Id"], "invalid identifier collides with create");
    let id = invalid["Id"].as_str().unwrap();
    assert!(id.starts_with("wid-"), "invalid identifier must stay well-formed: {id}");
}

#[test]
fn schema_digest_reports_writable_identifiers() {
    let generator = ExampleGenerator::with_seed(widget_schema(), 19).unwrap();
    assert!(generator.schema().has_only_writable_identifiers());

    let mut handler_assigned = widget_schema();
    handler_assigned["createOnlyProperties"] = json!(["/properties/Name"]);
    let generator = ExampleGenerator::with_seed(handler_assigned, 19).unwrap();
    assert!(!generator.schema().has_only_writable_identifiers());
}

#[test]
fn combined_schemas_generate_through_one_of_branches() {
    let schema = json!({
        "type": "object",
        "properties": {
            "Mode": {
                "oneOf": [
                    {"type": "string", "enum": ["burst"]},
                    {"type": "string", "enum": ["steady"]},
                ],
            },
        },
        "required": ["Mode"],
    });
    let generator = ExampleGenerator::with_seed(schema, 23).unwrap();
    let example = generator.create_example().unwrap();
    let mode = example["Mode"].as_str().unwrap();
    assert!(mode == "burst" || mode == "steady");
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn every_seed_yields_a_valid_create_example(seed in 0_u64..u64::MAX) {
        let generator = ExampleGenerator::with_seed(widget_schema(), seed).unwrap();
        let create = generator.create_example().unwrap();
        let create = create.as_object().unwrap();
        assert!(create.contains_key("Name"));
        assert!(!create.contains_key("Arn"));
    }
}
