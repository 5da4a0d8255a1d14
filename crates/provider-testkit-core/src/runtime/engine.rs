// crates/provider-testkit-core/src/runtime/engine.rs
// ============================================================================
// Module: Resource Conformance Engine
// Description: Retry state machine driving resource handlers to terminal states.
// Purpose: Invoke, interpret, and re-invoke handlers under an explicit policy
// while validating every progress event against the protocol contract.
// Dependencies: crate::core, crate::interfaces, crate::runtime, serde, serde_json
// ============================================================================

//! ## Overview
//! One [`ResourceClient`] owns a transport, an optional callback source, and
//! a [`RetryPolicy`]. `call` runs the protocol state machine
//! `{PENDING -> IN_PROGRESS* -> {SUCCESS, FAILED}}` for a single scenario:
//! a fresh client request token, the same token on every re-invocation,
//! callback context echoed verbatim, and an ordered attempt trace retained
//! for diagnosis. Validation here is unconditional and independent of any
//! scenario's own assertions: unknown statuses, FAILED events without an
//! error code or message, and models or delays where the contract forbids
//! them are hard violations, not coerced defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::core::protocol::Action;
use crate::core::protocol::ContractViolation;
use crate::core::protocol::HandlerErrorCode;
use crate::core::protocol::OperationStatus;
use crate::core::protocol::ProgressEvent;
use crate::core::request::InvocationRequest;
use crate::core::request::generate_token;
use crate::core::request::make_request;
use crate::interfaces::CallbackSource;
use crate::interfaces::HandlerTransport;
use crate::interfaces::InvokeContext;
use crate::interfaces::TransportFault;
use crate::runtime::error::AssertionMismatch;
use crate::runtime::error::ScenarioError;
use crate::runtime::error::TimeoutDetails;
use crate::runtime::policy::RetryPolicy;

// ============================================================================
// SECTION: Attempt Trace
// ============================================================================

/// Where an attempt's progress event came from.
///
/// # Invariants
/// - Variants are stable for serialization in scenario reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptSource {
    /// Event returned synchronously by the transport.
    Sync,
    /// Event substituted from the callback listener's log.
    Callback,
}

/// One entry in the ordered attempt trace of a scenario.
///
/// # Invariants
/// - `attempt` is 1-based and strictly increasing within a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// 1-based invocation number.
    pub attempt: u32,
    /// Where the interpreted event came from.
    pub source: AttemptSource,
    /// Progress event as interpreted for this attempt.
    pub event: ProgressEvent,
    /// True when the callback context did not change since the previous
    /// IN_PROGRESS event (suspected non-progressing handler).
    pub suspected_stall: bool,
}

/// Terminal result of one scenario.
///
/// # Invariants
/// - `status` is the event's status; `error_code` mirrors the event's code.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// Terminal (or PENDING) status reported by the handler.
    pub status: OperationStatus,
    /// Final progress event.
    pub event: ProgressEvent,
    /// Error code from the final event, when present.
    pub error_code: Option<HandlerErrorCode>,
    /// Handler invocations made.
    pub attempts: u32,
}

// ============================================================================
// SECTION: Resource Client
// ============================================================================

/// Protocol engine for resource handler conformance scenarios.
///
/// # Invariants
/// - One client drives one scenario at a time; the attempt trace always
///   describes the most recent `call`.
pub struct ResourceClient<T> {
    /// Transport binding used to reach the handler.
    transport: T,
    /// Optional callback source for asynchronously pushed events.
    callbacks: Option<Box<dyn CallbackSource>>,
    /// Explicit retry policy for the scenario.
    policy: RetryPolicy,
    /// Ordered attempt trace of the most recent call.
    last_attempts: Vec<AttemptRecord>,
}

impl<T: HandlerTransport> ResourceClient<T> {
    /// Creates an engine without asynchronous callback support.
    #[must_use]
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            callbacks: None,
            policy,
            last_attempts: Vec::new(),
        }
    }

    /// Creates an engine that also drains a callback source.
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

    /// Returns the retry policy in force.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the ordered attempt trace of the most recent call.
    #[must_use]
    pub fn last_attempts(&self) -> &[AttemptRecord] {
        &self.last_attempts
    }

    /// Runs one scenario to a non-IN_PROGRESS status.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] on transport faults, contract violations,
    /// or when the attempt ceiling or scenario deadline is exceeded.
    pub fn call(
        &mut self,
        action: Action,
        desired: Value,
        previous: Option<Value>,
    ) -> Result<ScenarioOutcome, ScenarioError> {
        self.last_attempts.clear();
        let started = Instant::now();
        let deadline = started + self.policy.scenario_timeout();
        let mut envelope = make_request(desired, previous, generate_token());
        let mut attempts: u32 = 0;
        let mut previous_context: Option<Option<Value>> = None;

        loop {
            let request = InvocationRequest {
                action,
                request: envelope.clone(),
                callback_url: self.callbacks.as_deref().map(|source| source.callback_url()),
            };
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
            let mut event = ProgressEvent::from_document(&doc)?;
            let mut source = AttemptSource::Sync;
            attempts += 1;

            if event.status == OperationStatus::InProgress
                && !action.is_synchronous()
                && event.resource_model.is_none()
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
                event = ProgressEvent::from_document(&record.event)?;
                source = AttemptSource::Callback;
            }

            let suspected_stall = event.status == OperationStatus::InProgress
                && previous_context.as_ref().is_some_and(|prev| *prev == event.callback_context);
            self.last_attempts.push(AttemptRecord {
                attempt: attempts,
                source,
                event: event.clone(),
                suspected_stall,
            });

            if event.status == OperationStatus::InProgress && action.is_synchronous() {
                return Err(ContractViolation::InProgressNotAllowed {
                    action,
                }
                .into());
            }

            if event.status != OperationStatus::InProgress {
                event.ensure_terminal_invariants()?;
                return Ok(ScenarioOutcome {
                    status: event.status,
                    error_code: event.error_code,
                    event,
                    attempts,
                });
            }

            event.ensure_in_progress_invariants()?;
            if attempts >= self.policy.max_attempts {
                return Err(ScenarioError::Timeout(timeout_details(attempts, started)));
            }
            let delay = self.policy.delay_for(attempts, event.callback_delay_seconds);
            let now = Instant::now();
            if now >= deadline {
                return Err(ScenarioError::Timeout(timeout_details(attempts, started)));
            }
            thread::sleep(delay.min(deadline - now));
            if Instant::now() >= deadline {
                return Err(ScenarioError::Timeout(timeout_details(attempts, started)));
            }

            if let Some(model) = event.resource_model.clone() {
                envelope.desired_resource_state = model;
            }
            envelope.callback_context = event.callback_context.clone();
            previous_context = Some(event.callback_context);
        }
    }

    /// Runs one scenario and asserts its terminal status.
    ///
    /// Only SUCCESS and FAILED are legal expectations. On match, returns the
    /// terminal status, the final event, and the error code (always `None`
    /// for SUCCESS).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] when the terminal status
    /// diverges, and every `call` error unchanged.
    pub fn call_and_assert(
        &mut self,
        action: Action,
        expected: OperationStatus,
        desired: Value,
        previous: Option<Value>,
    ) -> Result<(OperationStatus, ProgressEvent, Option<HandlerErrorCode>), ScenarioError> {
        if !expected.is_terminal() {
            return Err(ScenarioError::InvalidExpectation {
                status: expected.as_str(),
            });
        }
        let outcome = self.call(action, desired, previous)?;
        if outcome.status != expected {
            return Err(AssertionMismatch {
                expected: expected.as_str().to_string(),
                actual: outcome.status.as_str().to_string(),
                explanation: format!("handler terminal status mismatch for {action}"),
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
fn timeout_details(attempts: u32, started: Instant) -> TimeoutDetails {
    TimeoutDetails {
        attempts,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
