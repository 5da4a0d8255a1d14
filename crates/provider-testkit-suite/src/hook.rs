// crates/provider-testkit-suite/src/hook.rs
// ============================================================================
// Module: Hook Scenario Catalog
// Description: Conformance scenarios for hook pre-provision invocation points.
// Purpose: Exercise hook handlers with valid and invalid target models.
// Dependencies: provider-testkit-core, provider-testkit-generator, serde_json
// ============================================================================

//! ## Overview
//! Hooks evaluate a proposed target model before the orchestrator provisions
//! it. Each invocation point gets a success/failure pair: a schema-valid
//! target model must pass, and a deliberately invalid one must fail with an
//! error code and a non-empty message. Update points additionally carry the
//! previous target model.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::HandlerTransport;
use provider_testkit_core::HookAttemptRecord;
use provider_testkit_core::HookClient;
use provider_testkit_core::HookInvocationPoint;
use provider_testkit_core::HookStatus;
use provider_testkit_core::HookTargetModel;
use provider_testkit_generator::ExampleGenerator;
use serde_json::Value;

use crate::SuiteError;
use crate::report::ScenarioReport;

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Runs a valid target model through the invocation point; it must succeed.
///
/// # Errors
///
/// Returns [`SuiteError`] when the hook does not report SUCCESS.
pub fn contract_pre_provision_success<T: HandlerTransport>(
    client: &mut HookClient<T>,
    generator: &ExampleGenerator,
    invocation_point: HookInvocationPoint,
) -> Result<(), SuiteError> {
    let target_model = valid_target_model(generator, invocation_point)?;
    client.call_and_assert(invocation_point, HookStatus::Success, target_model)?;
    Ok(())
}

/// Runs an invalid target model through the invocation point; it must fail.
///
/// The engine already enforces that FAILED hook events carry an error code
/// and a non-empty message.
///
/// # Errors
///
/// Returns [`SuiteError`] when the hook does not report FAILED.
pub fn contract_pre_provision_failed<T: HandlerTransport>(
    client: &mut HookClient<T>,
    generator: &ExampleGenerator,
    invocation_point: HookInvocationPoint,
) -> Result<(), SuiteError> {
    let target_model = invalid_target_model(generator, invocation_point)?;
    client.call_and_assert(invocation_point, HookStatus::Failed, target_model)?;
    Ok(())
}

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Runs the hook catalog across every invocation point.
pub fn run_hook_suite<T: HandlerTransport>(
    client: &mut HookClient<T>,
    generator: &ExampleGenerator,
) -> Vec<ScenarioReport> {
    let mut reports = Vec::new();
    for invocation_point in HookInvocationPoint::ALL {
        let label = invocation_point.as_str().to_ascii_lowercase();
        reports.push(report(&format!("{label}_success"), client, |c| {
            contract_pre_provision_success(c, generator, invocation_point)
        }));
        reports.push(report(&format!("{label}_failed"), client, |c| {
            contract_pre_provision_failed(c, generator, invocation_point)
        }));
    }
    reports
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a schema-valid target model for the invocation point.
fn valid_target_model(
    generator: &ExampleGenerator,
    invocation_point: HookInvocationPoint,
) -> Result<HookTargetModel, SuiteError> {
    let create = generator.create_example()?;
    if invocation_point.is_update() {
        return Ok(HookTargetModel {
            resource_properties: generator.update_example(&create)?,
            previous_resource_properties: Some(create),
        });
    }
    Ok(HookTargetModel {
        resource_properties: create,
        previous_resource_properties: None,
    })
}

/// Builds a deliberately invalid target model for the invocation point.
fn invalid_target_model(
    generator: &ExampleGenerator,
    invocation_point: HookInvocationPoint,
) -> Result<HookTargetModel, SuiteError> {
    let invalid = generator.invalid_example()?;
    if invocation_point.is_update() {
        return Ok(HookTargetModel {
            resource_properties: invalid.clone(),
            previous_resource_properties: Some(invalid),
        });
    }
    Ok(HookTargetModel {
        resource_properties: invalid,
        previous_resource_properties: None,
    })
}

/// Runs one hook scenario and captures its verdict and attempt trace.
fn report<T, F>(name: &str, client: &mut HookClient<T>, scenario: F) -> ScenarioReport
where
    T: HandlerTransport,
    F: FnOnce(&mut HookClient<T>) -> Result<(), SuiteError>,
{
    let outcome = scenario(client);
    let trace = attempt_trace(client.last_attempts());
    match outcome {
        Ok(()) => ScenarioReport::passed(name, trace),
        Err(err) => ScenarioReport::failed(name, err.to_string(), trace),
    }
}

/// Serializes the hook engine's attempt records for a report.
fn attempt_trace(attempts: &[HookAttemptRecord]) -> Vec<Value> {
    attempts.iter().filter_map(|record| serde_json::to_value(record).ok()).collect()
}
