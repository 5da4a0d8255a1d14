// crates/provider-testkit-suite/src/resource.rs
// ============================================================================
// Module: Resource Scenario Catalog
// Description: Conformance scenarios for resource handler operations.
// Purpose: Exercise create/read/update/delete/list against the protocol contract.
// Dependencies: provider-testkit-core, provider-testkit-generator, serde_json
// ============================================================================

//! ## Overview
//! Each scenario is a thin composition: draw models from the generator, run
//! them through the engine, and wrap the terminal expectation with an
//! assertion helper. The negative scenarios rely on the generator's
//! never-created identifiers, so a handler with a real backing store cannot
//! coincidentally satisfy them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::Action;
use provider_testkit_core::AssertionMismatch;
use provider_testkit_core::AttemptRecord;
use provider_testkit_core::HandlerErrorCode;
use provider_testkit_core::HandlerTransport;
use provider_testkit_core::OperationStatus;
use provider_testkit_core::ResourceClient;
use provider_testkit_generator::ExampleGenerator;
use serde_json::Map;
use serde_json::Value;

use crate::SuiteError;
use crate::asserts::failed_event;
use crate::report::ScenarioReport;

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Creates a resource, checks the echoed model, and deletes it.
///
/// # Errors
///
/// Returns [`SuiteError`] when either operation diverges from the contract.
pub fn contract_create_delete<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Result<(), SuiteError> {
    let create_model = generator.create_example()?;
    let (_status, event, _code) =
        client.call_and_assert(Action::Create, OperationStatus::Success, create_model.clone(), None)?;
    let created = event.resource_model.clone().unwrap_or_else(|| create_model.clone());
    ensure_input_echoed(generator, &create_model, &created)?;
    client.call_and_assert(Action::Delete, OperationStatus::Success, created, None)?;
    Ok(())
}

/// Creates the same caller-assigned identifier twice; the repeat must fail.
///
/// Only meaningful when the primary identifier is writable; the runner skips
/// it otherwise.
///
/// # Errors
///
/// Returns [`SuiteError`] when the repeat create does not fail with
/// `AlreadyExists`, or cleanup fails.
pub fn contract_create_duplicate<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Result<(), SuiteError> {
    let model = generator.create_example()?;
    client.call_and_assert(Action::Create, OperationStatus::Success, model.clone(), None)?;
    let duplicate = failed_event(
        HandlerErrorCode::AlreadyExists,
        "creating the same writable identifier twice must fail with AlreadyExists",
        || client.call_and_assert(Action::Create, OperationStatus::Failed, model.clone(), None),
    )();
    let cleanup =
        client.call_and_assert(Action::Delete, OperationStatus::Success, model, None);
    duplicate?;
    cleanup?;
    Ok(())
}

/// Reads a never-created resource; the handler must report NotFound.
///
/// # Errors
///
/// Returns [`SuiteError`] when the read does not fail with `NotFound`.
pub fn contract_read_without_create<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Result<(), SuiteError> {
    let invalid = generator.invalid_example()?;
    failed_event(
        HandlerErrorCode::NotFound,
        "reading a never-created resource must fail with NotFound",
        || client.call_and_assert(Action::Read, OperationStatus::Failed, invalid, None),
    )()?;
    Ok(())
}

/// Updates a never-created resource; the handler must report NotFound.
///
/// # Errors
///
/// Returns [`SuiteError`] when the update does not fail with `NotFound`.
pub fn contract_update_without_create<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Result<(), SuiteError> {
    let invalid = generator.invalid_example()?;
    let desired = generator.update_example(&invalid)?;
    failed_event(
        HandlerErrorCode::NotFound,
        "updating a never-created resource must fail with NotFound",
        || {
            client.call_and_assert(
                Action::Update,
                OperationStatus::Failed,
                desired,
                Some(invalid),
            )
        },
    )()?;
    Ok(())
}

/// Deletes a never-created resource; the handler must report NotFound.
///
/// # Errors
///
/// Returns [`SuiteError`] when the delete does not fail with `NotFound`.
pub fn contract_delete_without_create<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Result<(), SuiteError> {
    let invalid = generator.invalid_example()?;
    failed_event(
        HandlerErrorCode::NotFound,
        "deleting a never-created resource must fail with NotFound",
        || client.call_and_assert(Action::Delete, OperationStatus::Failed, invalid, None),
    )()?;
    Ok(())
}

/// Lists resources; the response must succeed with a models array.
///
/// # Errors
///
/// Returns [`SuiteError`] when LIST fails or omits `resourceModels`.
pub fn contract_list_succeeds<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
) -> Result<(), SuiteError> {
    let (_status, event, _code) = client.call_and_assert(
        Action::List,
        OperationStatus::Success,
        Value::Object(Map::new()),
        None,
    )?;
    if event.resource_models.is_none() {
        return Err(SuiteError::Scenario(
            AssertionMismatch {
                expected: "a resourceModels array".to_string(),
                actual: "no resourceModels".to_string(),
                explanation: "successful LIST responses must include resourceModels".to_string(),
            }
            .into(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Runs the resource catalog and collects one report per scenario.
pub fn run_resource_suite<T: HandlerTransport>(
    client: &mut ResourceClient<T>,
    generator: &ExampleGenerator,
) -> Vec<ScenarioReport> {
    let mut reports =
        vec![report("create_delete", client, |c| contract_create_delete(c, generator))];
    if generator.schema().has_only_writable_identifiers() {
        reports
            .push(report("create_duplicate", client, |c| contract_create_duplicate(c, generator)));
    } else {
        reports.push(ScenarioReport::skipped(
            "create_duplicate",
            "primary identifier is not caller-assigned",
        ));
    }
    reports.push(report("read_without_create", client, |c| {
        contract_read_without_create(c, generator)
    }));
    reports.push(report("update_without_create", client, |c| {
        contract_update_without_create(c, generator)
    }));
    reports.push(report("delete_without_create", client, |c| {
        contract_delete_without_create(c, generator)
    }));
    reports.push(report("list_succeeds", client, contract_list_succeeds));
    reports
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs one scenario and captures its verdict and attempt trace.
fn report<T, F>(name: &str, client: &mut ResourceClient<T>, scenario: F) -> ScenarioReport
where
    T: HandlerTransport,
    F: FnOnce(&mut ResourceClient<T>) -> Result<(), SuiteError>,
{
    let outcome = scenario(client);
    let trace = attempt_trace(client.last_attempts());
    match outcome {
        Ok(()) => ScenarioReport::passed(name, trace),
        Err(err) => ScenarioReport::failed(name, err.to_string(), trace),
    }
}

/// Serializes the engine's attempt records for a report.
fn attempt_trace(attempts: &[AttemptRecord]) -> Vec<Value> {
    attempts.iter().filter_map(|record| serde_json::to_value(record).ok()).collect()
}

/// Requires every non-write-only input property to be echoed unchanged.
fn ensure_input_echoed(
    generator: &ExampleGenerator,
    input: &Value,
    output: &Value,
) -> Result<(), SuiteError> {
    let Some(input_map) = input.as_object() else {
        return Ok(());
    };
    let write_only: Vec<&String> = generator
        .schema()
        .write_only()
        .iter()
        .filter_map(|path| path.last())
        .collect();
    for (key, value) in input_map {
        if write_only.iter().any(|name| *name == key) {
            continue;
        }
        let echoed = output.get(key);
        if echoed != Some(value) {
            return Err(SuiteError::Scenario(
                AssertionMismatch {
                    expected: format!("property '{key}' echoed unchanged"),
                    actual: echoed.map_or("missing".to_string(), Value::to_string),
                    explanation: "properties specified in the request must be present in the \
                                  returned model and match exactly, except writeOnlyProperties"
                        .to_string(),
                }
                .into(),
            ));
        }
    }
    Ok(())
}
