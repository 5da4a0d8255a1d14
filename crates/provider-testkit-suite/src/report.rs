// crates/provider-testkit-suite/src/report.rs
// ============================================================================
// Module: Scenario Reports
// Description: Per-scenario verdicts with the ordered attempt trace.
// Purpose: Carry pass/fail/skipped outcomes and diagnosis data to callers.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each scenario yields one report: its catalog name, a verdict, and the
//! ordered attempt trace of the engine call that produced the verdict. The
//! trace is serialized attempt records, so resource and hook scenarios share
//! one report shape and callers can persist reports as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Verdicts
// ============================================================================

/// Outcome of one catalog scenario.
///
/// # Invariants
/// - Variants are stable for serialization and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Scenario held.
    Pass,
    /// Scenario failed; `reason` names the violated expectation.
    Fail {
        /// Why the scenario failed.
        reason: String,
    },
    /// Scenario was not applicable to this schema.
    Skipped {
        /// Why the scenario was skipped.
        reason: String,
    },
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Report for one catalog scenario.
///
/// # Invariants
/// - `trace` preserves attempt order as recorded by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    /// Catalog name of the scenario.
    pub name: String,
    /// Verdict for the scenario.
    pub verdict: Verdict,
    /// Ordered attempt trace, serialized per attempt.
    pub trace: Vec<Value>,
}

impl ScenarioReport {
    /// Builds a passing report.
    #[must_use]
    pub fn passed(name: impl Into<String>, trace: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            verdict: Verdict::Pass,
            trace,
        }
    }

    /// Builds a failing report.
    #[must_use]
    pub fn failed(name: impl Into<String>, reason: impl Into<String>, trace: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            verdict: Verdict::Fail {
                reason: reason.into(),
            },
            trace,
        }
    }

    /// Builds a skipped report.
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verdict: Verdict::Skipped {
                reason: reason.into(),
            },
            trace: Vec::new(),
        }
    }

    /// Returns true when the scenario did not fail.
    #[must_use]
    pub const fn holds(&self) -> bool {
        !matches!(self.verdict, Verdict::Fail { .. })
    }
}
