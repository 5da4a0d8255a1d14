// crates/provider-testkit-core/src/runtime/error.rs
// ============================================================================
// Module: Scenario Errors
// Description: Failure taxonomy for one contract scenario.
// Purpose: Keep transport faults, contract violations, timeouts, and
// assertion mismatches programmatically distinct.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! A scenario can fail four different ways, and callers must be able to tell
//! them apart: the handler was unreachable ([`TransportFault`]), the handler
//! answered outside the protocol ([`ContractViolation`]), the handler never
//! finished ([`TimeoutDetails`]), or the handler finished with the wrong
//! terminal state ([`AssertionMismatch`]). Transport faults and contract
//! violations abort immediately and are never retried as if IN_PROGRESS.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::protocol::ContractViolation;
use crate::interfaces::TransportFault;

// ============================================================================
// SECTION: Timeout Details
// ============================================================================

/// Detail for a scenario that never reached a terminal state.
///
/// # Invariants
/// - `attempts` counts handler invocations actually made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutDetails {
    /// Handler invocations made before giving up.
    pub attempts: u32,
    /// Wall-clock time elapsed in milliseconds.
    pub elapsed_ms: u64,
}

impl fmt::Display for TimeoutDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attempts over {}ms", self.attempts, self.elapsed_ms)
    }
}

// ============================================================================
// SECTION: Assertion Mismatch
// ============================================================================

/// Terminal state reached, but not the expected one.
///
/// # Invariants
/// - `expected` and `actual` are canonical wire strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{explanation}: expected {expected}, got {actual}")]
pub struct AssertionMismatch {
    /// Expected terminal value, as a wire string.
    pub expected: String,
    /// Observed terminal value, as a wire string.
    pub actual: String,
    /// Scenario-supplied explanation for the failure.
    pub explanation: String,
}

// ============================================================================
// SECTION: Scenario Error
// ============================================================================

/// Failure taxonomy for one contract scenario.
///
/// # Invariants
/// - Variants are stable for programmatic handling; callers distinguish
///   "handler failed" from "handler never finished" from "handler
///   unreachable".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// The handler could not be reached or answered unusably.
    #[error(transparent)]
    Transport(#[from] TransportFault),
    /// The handler answered outside the invocation protocol.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// The handler never reached a terminal state.
    #[error("handler never reached a terminal state: {0}")]
    Timeout(TimeoutDetails),
    /// The terminal state did not match the scenario's expectation.
    #[error(transparent)]
    Assertion(#[from] AssertionMismatch),
    /// `call_and_assert` was given a non-terminal expectation.
    #[error("expected terminal status must be SUCCESS or FAILED, got {status}")]
    InvalidExpectation {
        /// Wire string of the rejected expectation.
        status: &'static str,
    },
}
