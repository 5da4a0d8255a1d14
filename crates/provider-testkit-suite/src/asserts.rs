// crates/provider-testkit-suite/src/asserts.rs
// ============================================================================
// Module: Contract Assertions
// Description: Higher-order assertion wrappers over scenario closures.
// Purpose: Declare terminal-state expectations without annotation machinery.
// Dependencies: provider-testkit-core
// ============================================================================

//! ## Overview
//! Assertion helpers are ordinary higher-order functions: each takes a
//! scenario closure (usually a `call_and_assert` invocation) and returns a
//! wrapped closure that runs it and checks one terminal-state invariant,
//! attaching the caller's explanation on mismatch. They hold no state and
//! perform no I/O; everything operates on the engine's return value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::AssertionMismatch;
use provider_testkit_core::HandlerErrorCode;
use provider_testkit_core::OperationStatus;
use provider_testkit_core::ProgressEvent;
use provider_testkit_core::ScenarioError;
use serde_json::Value;

// ============================================================================
// SECTION: Scenario Result
// ============================================================================

/// Return value of an engine-backed scenario closure.
pub type ScenarioResult =
    Result<(OperationStatus, ProgressEvent, Option<HandlerErrorCode>), ScenarioError>;

// ============================================================================
// SECTION: Wrappers
// ============================================================================

/// Wraps a scenario with a FAILED/error-code expectation.
///
/// The returned closure runs the scenario, requires terminal FAILED with
/// exactly `error_code`, and attaches `msg` as the failure explanation.
pub fn failed_event<F>(
    error_code: HandlerErrorCode,
    msg: impl Into<String>,
    scenario: F,
) -> impl FnOnce() -> Result<ProgressEvent, ScenarioError>
where
    F: FnOnce() -> ScenarioResult,
{
    let explanation = msg.into();
    move || {
        let (status, event, code) = scenario()?;
        if status != OperationStatus::Failed {
            return Err(AssertionMismatch {
                expected: OperationStatus::Failed.as_str().to_string(),
                actual: status.as_str().to_string(),
                explanation,
            }
            .into());
        }
        if code != Some(error_code) {
            return Err(AssertionMismatch {
                expected: error_code.as_str().to_string(),
                actual: code.map_or("no error code", HandlerErrorCode::as_str).to_string(),
                explanation,
            }
            .into());
        }
        Ok(event)
    }
}

/// Wraps a scenario with a SUCCESS expectation.
pub fn success_event<F>(
    msg: impl Into<String>,
    scenario: F,
) -> impl FnOnce() -> Result<ProgressEvent, ScenarioError>
where
    F: FnOnce() -> ScenarioResult,
{
    let explanation = msg.into();
    move || {
        let (status, event, _code) = scenario()?;
        if status != OperationStatus::Success {
            return Err(AssertionMismatch {
                expected: OperationStatus::Success.as_str().to_string(),
                actual: status.as_str().to_string(),
                explanation,
            }
            .into());
        }
        Ok(event)
    }
}

/// Wraps a SUCCESS scenario with a resource-model shape check.
///
/// The returned closure requires a resource model on the success event and
/// applies `check` to it; a check failure surfaces as an assertion mismatch
/// with the check's own reason.
pub fn with_resource_model<F, C>(
    msg: impl Into<String>,
    check: C,
    scenario: F,
) -> impl FnOnce() -> Result<ProgressEvent, ScenarioError>
where
    F: FnOnce() -> ScenarioResult,
    C: FnOnce(&Value) -> Result<(), String>,
{
    let explanation = msg.into();
    let wrapped = success_event(explanation.clone(), scenario);
    move || {
        let event = wrapped()?;
        let Some(model) = event.resource_model.as_ref() else {
            return Err(AssertionMismatch {
                expected: "a resource model".to_string(),
                actual: "no resource model".to_string(),
                explanation,
            }
            .into());
        };
        if let Err(reason) = check(model) {
            return Err(AssertionMismatch {
                expected: "a conforming resource model".to_string(),
                actual: reason,
                explanation,
            }
            .into());
        }
        Ok(event)
    }
}
