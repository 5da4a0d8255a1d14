// crates/provider-testkit-core/src/runtime/policy.rs
// ============================================================================
// Module: Retry Policy
// Description: Explicit retry configuration for the protocol engine.
// Purpose: Make delay source, backoff, ceilings, and deadlines injectable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The retry loop has no hidden defaults: the delay between attempts, its
//! growth, the attempt ceiling, the scenario deadline, and the callback wait
//! budget are all carried by [`RetryPolicy`]. Tests inject a zero-delay
//! policy; real runs use the defaults or a deserialized configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;

// ============================================================================
// SECTION: Backoff
// ============================================================================

/// Growth applied to the base delay across attempts.
///
/// # Invariants
/// - Growth applies only when the handler supplies no callback delay; an
///   event's `callbackDelaySeconds` always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// Constant base delay for every attempt.
    Fixed,
    /// Base delay multiplied by the attempt number.
    Linear,
    /// Base delay doubled for each completed attempt.
    Exponential,
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Explicit retry policy for one contract scenario.
///
/// # Invariants
/// - `max_attempts` counts handler invocations, not sleeps; it is >= 1 for
///   any scenario to run.
/// - All delays are capped by `max_delay_ms` and by the remaining scenario
///   deadline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    /// Base delay between attempts in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff growth applied to the base delay.
    pub backoff: BackoffKind,
    /// Upper bound on any single delay in milliseconds.
    pub max_delay_ms: u64,
    /// Ceiling on handler invocations before the scenario times out.
    pub max_attempts: u32,
    /// Wall-clock deadline for the whole scenario in milliseconds.
    pub scenario_timeout_ms: u64,
    /// Budget for one blocking wait on the callback log in milliseconds.
    pub callback_wait_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            backoff: BackoffKind::Linear,
            max_delay_ms: 30_000,
            max_attempts: 24,
            scenario_timeout_ms: 120_000,
            callback_wait_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Returns a zero-delay policy for fast test execution.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            base_delay_ms: 0,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 0,
            max_attempts,
            scenario_timeout_ms: 10_000,
            callback_wait_ms: 1_000,
        }
    }

    /// Returns the delay before the next invocation.
    ///
    /// The handler's `callbackDelaySeconds` wins when present; otherwise the
    /// base delay grows per the backoff kind. Both paths are capped by
    /// `max_delay_ms`.
    #[must_use]
    pub fn delay_for(&self, completed_attempts: u32, event_delay_seconds: Option<u64>) -> Duration {
        let attempt = u64::from(completed_attempts.max(1));
        let millis = match event_delay_seconds {
            Some(seconds) => seconds.saturating_mul(1_000),
            None => match self.backoff {
                BackoffKind::Fixed => self.base_delay_ms,
                BackoffKind::Linear => self.base_delay_ms.saturating_mul(attempt),
                BackoffKind::Exponential => {
                    let shift = u32::try_from(attempt - 1).unwrap_or(u32::MAX).min(32);
                    self.base_delay_ms.saturating_mul(1_u64 << shift)
                }
            },
        };
        Duration::from_millis(millis.min(self.max_delay_ms))
    }

    /// Returns the scenario deadline as a duration.
    #[must_use]
    pub const fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }

    /// Returns the callback wait budget as a duration.
    #[must_use]
    pub const fn callback_wait(&self) -> Duration {
        Duration::from_millis(self.callback_wait_ms)
    }
}
