// crates/provider-testkit-core/src/runtime/hook.rs
// ============================================================================
// Module: Hook Conformance Engine
// Description: Retry state machine driving hook handlers to terminal states.
// Purpose: Invoke hook invocation points and validate hook progress events.
// Dependencies: crate::core, crate::interfaces, crate::runtime, serde, serde_json
// ============================================================================

//! ## Overview
//! Hooks report through the `hookStatus` field and carry no resource models,
//! but otherwise follow the same state machine as resource handlers:
//! IN_PROGRESS may self-loop with an opaque callback context echoed verbatim,
//! terminal FAILED requires an error code and a non-empty message, and the
//! attempt ceiling and scenario deadline bound the loop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::core::protocol::ContractViolation;
use crate::core::protocol::HandlerErrorCode;
use crate::core::protocol::HookInvocationPoint;
use crate::core::protocol::HookProgressEvent;
use crate::core::protocol::HookStatus;
use crate::core::request::HookInvocationRequest;
use crate::core::request::HookTargetModel;
use crate::core::request::generate_token;
use crate::interfaces::CallbackSource;
use crate::interfaces::HandlerTransport;
use crate::interfaces::InvokeContext;
use crate::interfaces::TransportFault;
use crate::runtime::engine::AttemptSource;
use crate::runtime::error::AssertionMismatch;
use crate::runtime::error::ScenarioError;
use crate::runtime::error::TimeoutDetails;
use crate::runtime::policy::RetryPolicy;

// ============================================================================
// SECTION: Attempt Trace
// ============================================================================

/// One entry in the ordered attempt trace of a hook scenario.
///
/// # Invariants
/// - `attempt` is 1-based and strictly increasing within a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookAttemptRecord {
    /// 1-based invocation number.
    pub attempt: u32,
    /// Where the interpreted event came from.
    pub source: AttemptSource,
    /// Hook progress event as interpreted for this attempt.
    pub event: HookProgressEvent,
    /// True when the callback context did not change since the previous
    /// IN_PROGRESS event.
    pub suspected_stall: bool,
}

/// Terminal result of one hook scenario.
///
/// # Invariants
/// - `status` is the event's hook status; `error_code` mirrors the event.
#[derive(Debug, Clone, PartialEq)]
pub struct HookOutcome {
    /// Terminal (or PENDING) hook status reported by the handler.
    pub status: HookStatus,
    /// Final hook progress event.
    pub event: HookProgressEvent,
    /// Error code from the final event, when present.
    pub error_code: Option<HandlerErrorCode>,
    /// Handler invocations made.
    pub attempts: u32,
}

// ============================================================================
// SECTION: Hook Client
// ============================================================================

/// Protocol engine for hook handler conformance scenarios.
///
/// # Invariants
/// - One client drives one scenario at a time; the attempt trace always
///   describes the most recent `call`.
pub struct HookClient<T> {
    /// Transport binding used to reach the handler.
    transport: T,
    /// Optional callback source for asynchronously pushed events.
    callbacks: Option<Box<dyn CallbackSource>>,
    /// Explicit retry policy for the scenario.
    policy: RetryPolicy,
    /// Ordered attempt trace of the most recent call.
    last_attempts: Vec<HookAttemptRecord>,
}

impl<T: HandlerTransport> HookClient<T> {
    /// Creates a hook engine without asynchronous callback support.
    #[must_use]
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            callbacks: None,
            policy,
            last_attempts: Vec::new(),
        }
    }

    /// Creates a hook engine that also drains a callback source.
    #[must_use]
    pub fn with_callbacks(
        transport: T,
        policy: RetryPolicy,
        callbacks: Box<dyn CallbackSource>,
    ) -> Self {
        Self {
            transport,
            callbacks: Some(callbacks),
            policy,
            last_attempts: Vec::new(),
        }
    }

    /// Returns the ordered attempt trace of the most recent call.
    #[must_use]
    pub fn last_attempts(&self) -> &[HookAttemptRecord] {
        &self.last_attempts
    }

    /// Runs one hook scenario to a non-IN_PROGRESS status.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] on transport faults, contract violations,
    /// or when the attempt ceiling or scenario deadline is exceeded.
    pub fn call(
        &mut self,
        invocation_point: HookInvocationPoint,
        target_model: HookTargetModel,
    ) -> Result<HookOutcome, ScenarioError> {
        self.last_attempts.clear();
        let started = Instant::now();
        let deadline = started + self.policy.scenario_timeout();
        let mut request = HookInvocationRequest {
            action_invocation_point: invocation_point,
            target_model,
            client_request_token: generate_token(),
            callback_context: None,
            callback_url: self.callbacks.as_deref().map(|source| source.callback_url()),
        };
        let mut attempts: u32 = 0;
        let mut previous_context: Option<Option<Value>> = None;

        loop {
            let ctx = InvokeContext {
                callback_url: request.callback_url.clone(),
            };
            let payload = serde_json::to_vec(&request).map_err(|err| {
                TransportFault::MalformedResponse(format!("request serialization failed: {err}"))
            })?;
            let response = self.transport.invoke(&payload, &ctx)?;
            let doc: Value = serde_json::from_slice(&response).map_err(|err| {
                TransportFault::MalformedResponse(format!("response is not valid JSON: {err}"))
            })?;
            let mut event = HookProgressEvent::from_document(&doc)?;
            let mut source = AttemptSource::Sync;
            attempts += 1;

            if event.hook_status == HookStatus::InProgress
                && event.callback_context.is_none()
                && let Some(callbacks) = self.callbacks.as_deref()
                && let Some(record) = callbacks.next_record(self.policy.callback_wait())
            {
                if let Some(reason) = record.error {
                    return Err(ContractViolation::InvalidCallback {
                        reason,
                    }
                    .into());
                }
                event = HookProgressEvent::from_document(&record.event)?;
                source = AttemptSource::Callback;
            }

            let suspected_stall = event.hook_status == HookStatus::InProgress
                && previous_context.as_ref().is_some_and(|prev| *prev == event.callback_context);
            self.last_attempts.push(HookAttemptRecord {
                attempt: attempts,
                source,
                event: event.clone(),
                suspected_stall,
            });

            if event.hook_status != HookStatus::InProgress {
                event.ensure_terminal_invariants()?;
                return Ok(HookOutcome {
                    status: event.hook_status,
                    error_code: event.error_code,
                    event,
                    attempts,
                });
            }

            event.ensure_in_progress_invariants()?;
            if attempts >= self.policy.max_attempts {
                return Err(ScenarioError::Timeout(hook_timeout_details(attempts, started)));
            }
            let delay = self.policy.delay_for(attempts, event.callback_delay_seconds);
            let now = Instant::now();
            if now >= deadline {
                return Err(ScenarioError::Timeout(hook_timeout_details(attempts, started)));
            }
            thread::sleep(delay.min(deadline - now));
            if Instant::now() >= deadline {
                return Err(ScenarioError::Timeout(hook_timeout_details(attempts, started)));
            }

            request.callback_context = event.callback_context.clone();
            previous_context = Some(event.callback_context);
        }
    }

    /// Runs one hook scenario and asserts its terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] when the terminal status
    /// diverges, and every `call` error unchanged.
    pub fn call_and_assert(
        &mut self,
        invocation_point: HookInvocationPoint,
        expected: HookStatus,
        target_model: HookTargetModel,
    ) -> Result<(HookStatus, HookProgressEvent, Option<HandlerErrorCode>), ScenarioError> {
        if !expected.is_terminal() {
            return Err(ScenarioError::InvalidExpectation {
                status: expected.as_str(),
            });
        }
        let outcome = self.call(invocation_point, target_model)?;
        if outcome.status != expected {
            return Err(AssertionMismatch {
                expected: expected.as_str().to_string(),
                actual: outcome.status.as_str().to_string(),
                explanation: format!(
                    "hook terminal status mismatch for {invocation_point}"
                ),
            }
            .into());
        }
        Ok((outcome.status, outcome.event, outcome.error_code))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds timeout detail from the attempt counter and scenario start.
fn hook_timeout_details(attempts: u32, started: Instant) -> TimeoutDetails {
    TimeoutDetails {
        attempts,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
