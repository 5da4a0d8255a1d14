// crates/provider-testkit-suite/tests/suite_scenarios.rs
// ============================================================================
// Module: Suite Scenario Tests
// Description: Runs the full catalog against an in-memory reference handler.
// Purpose: Prove the catalog passes for a conforming handler and fails for a
// defective one.
// ============================================================================

//! ## Overview
//! The reference handler keeps widgets in a BTreeMap keyed by their primary
//! identifier and implements the protocol faithfully: duplicate creates
//! report AlreadyExists, operations on unknown identifiers report NotFound,
//! and LIST returns every stored model. A defective variant omits failure
//! messages to show the engine's validation tripping.

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

use std::collections::BTreeMap;

use provider_testkit_core::HookClient;
use provider_testkit_core::InvokeContext;
use provider_testkit_core::ResourceClient;
use provider_testkit_core::RetryPolicy;
use provider_testkit_core::TransportFault;
use provider_testkit_generator::ExampleGenerator;
use provider_testkit_suite::Verdict;
use provider_testkit_suite::run_hook_suite;
use provider_testkit_suite::run_resource_suite;
use provider_testkit_transport::TransportBinding;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Widget schema shared by the resource and hook suites.
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
        },
        "required": ["Name"],
        "primaryIdentifier": ["/properties/Id"],
        "createOnlyProperties": ["/properties/Id", "/properties/Name"],
        "readOnlyProperties": ["/properties/Arn"],
    })
}

/// Conforming in-memory widget handler.
fn reference_handler()
-> impl FnMut(&[u8], &InvokeContext) -> Result<Vec<u8>, TransportFault> + Send {
    let mut store: BTreeMap<String, Value> = BTreeMap::new();
    move |payload: &[u8], _ctx: &InvokeContext| {
        let request: Value = serde_json::from_slice(payload)
            .map_err(|err| TransportFault::MalformedResponse(err.to_string()))?;
        let action = request["action"].as_str().unwrap_or_default().to_string();
        let desired = request["desiredResourceState"].clone();
        let id = desired.get("Id").and_then(Value::as_str).unwrap_or_default().to_string();
        let not_found =
            json!({"status": "FAILED", "errorCode": "NotFound", "message": format!("widget '{id}' does not exist")});
        let event = match action.as_str() {
            "CREATE" => {
                if store.contains_key(&id) {
                    json!({
                        "status": "FAILED",
                        "errorCode": "AlreadyExists",
                        "message": format!("widget '{id}' already exists"),
                    })
                } else {
                    let mut model = desired.clone();
                    if let Some(object) = model.as_object_mut() {
                        object.insert("Arn".to_string(), json!(format!("arn:test:widget/{id}")));
                    }
                    store.insert(id.clone(), model.clone());
                    json!({"status": "SUCCESS", "resourceModel": model})
                }
            }
            "READ" => store.get(&id).map_or(not_found, |model| {
                json!({"status": "SUCCESS", "resourceModel": model})
            }),
            "UPDATE" => {
                if store.contains_key(&id) {
                    store.insert(id.clone(), desired.clone());
                    json!({"status": "SUCCESS", "resourceModel": desired})
                } else {
                    not_found
                }
            }
            "DELETE" => {
                if store.remove(&id).is_some() {
                    json!({"status": "SUCCESS"})
                } else {
                    not_found
                }
            }
            "LIST" => json!({
                "status": "SUCCESS",
                "resourceModels": store.values().cloned().collect::<Vec<Value>>(),
            }),
            _ => json!({
                "status": "FAILED",
                "errorCode": "InvalidRequest",
                "message": format!("unknown action '{action}'"),
            }),
        };
        serde_json::to_vec(&event).map_err(|err| TransportFault::MalformedResponse(err.to_string()))
    }
}

/// Hook handler that rejects target models carrying read-only properties.
fn reference_hook_handler()
-> impl FnMut(&[u8], &InvokeContext) -> Result<Vec<u8>, TransportFault> + Send {
    move |payload: &[u8], _ctx: &InvokeContext| {
        let request: Value = serde_json::from_slice(payload)
            .map_err(|err| TransportFault::MalformedResponse(err.to_string()))?;
        let properties = &request["targetModel"]["resourceProperties"];
        let event = if properties.get("Arn").is_some() {
            json!({
                "hookStatus": "FAILED",
                "errorCode": "InvalidRequest",
                "message": "target model supplies read-only properties",
            })
        } else {
            json!({"hookStatus": "SUCCESS"})
        };
        serde_json::to_vec(&event).map_err(|err| TransportFault::MalformedResponse(err.to_string()))
    }
}

// ============================================================================
// SECTION: Resource Suite
// ============================================================================

#[test]
fn resource_suite_passes_for_a_conforming_handler() {
    let generator = ExampleGenerator::new(widget_schema()).unwrap();
    let mut client = ResourceClient::new(
        TransportBinding::local(reference_handler()),
        RetryPolicy::immediate(8),
    );

    let reports = run_resource_suite(&mut client, &generator);
    assert_eq!(reports.len(), 6);
    for report in &reports {
        assert_eq!(report.verdict, Verdict::Pass, "{} failed: {:?}", report.name, report.verdict);
    }
    let names: Vec<&str> = reports.iter().map(|report| report.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "create_delete",
            "create_duplicate",
            "read_without_create",
            "update_without_create",
            "delete_without_create",
            "list_succeeds",
        ]
    );
}

#[test]
fn duplicate_create_is_skipped_for_handler_assigned_identifiers() {
    let mut schema = widget_schema();
    schema["createOnlyProperties"] = json!(["/properties/Name"]);
    let generator = ExampleGenerator::new(schema).unwrap();
    let mut client = ResourceClient::new(
        TransportBinding::local(reference_handler()),
        RetryPolicy::immediate(8),
    );

    let reports = run_resource_suite(&mut client, &generator);
    let duplicate = reports.iter().find(|report| report.name == "create_duplicate").unwrap();
    assert!(matches!(duplicate.verdict, Verdict::Skipped { .. }));
}

#[test]
fn a_handler_that_omits_failure_messages_fails_the_negative_scenarios() {
    let generator = ExampleGenerator::new(widget_schema()).unwrap();
    let defective = |_payload: &[u8], _ctx: &InvokeContext| {
        serde_json::to_vec(&json!({"status": "FAILED", "errorCode": "NotFound"}))
            .map_err(|err| TransportFault::MalformedResponse(err.to_string()))
    };
    let mut client =
        ResourceClient::new(TransportBinding::local(defective), RetryPolicy::immediate(8));

    let reports = run_resource_suite(&mut client, &generator);
    let read = reports.iter().find(|report| report.name == "read_without_create").unwrap();
    match &read.verdict {
        Verdict::Fail {
            reason,
        } => assert!(reason.contains("non-empty message"), "unexpected reason: {reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Hook Suite
// ============================================================================

#[test]
fn hook_suite_passes_for_a_conforming_hook_handler() {
    let generator = ExampleGenerator::new(widget_schema()).unwrap();
    let mut client = HookClient::new(
        TransportBinding::local(reference_hook_handler()),
        RetryPolicy::immediate(8),
    );

    let reports = run_hook_suite(&mut client, &generator);
    assert_eq!(reports.len(), 6);
    for report in &reports {
        assert_eq!(report.verdict, Verdict::Pass, "{} failed: {:?}", report.name, report.verdict);
    }
}
