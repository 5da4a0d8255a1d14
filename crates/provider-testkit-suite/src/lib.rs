// crates/provider-testkit-suite/src/lib.rs
// ============================================================================
// Module: Provider Testkit Suite
// Description: Contract assertion helpers and the conformance scenario catalog.
// Purpose: Compose generator, engine, and assertions into runnable scenarios.
// Dependencies: provider-testkit-core, provider-testkit-generator, serde,
// serde_json, thiserror
// ============================================================================

//! ## Overview
//! The suite is the catalog layer: thin scenario functions composing the
//! example generator, the protocol engine, and the assertion helpers, plus a
//! runner that turns each scenario into a [`ScenarioReport`] carrying a
//! pass/fail/skipped verdict and the ordered attempt trace. Scenarios are
//! independent: one scenario's fault never corrupts another's listener or
//! token state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod asserts;
pub mod hook;
pub mod report;
pub mod resource;

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::ScenarioError;
use provider_testkit_generator::GeneratorError;
use thiserror::Error;

// ============================================================================
// SECTION: Suite Errors
// ============================================================================

/// Failure of one catalog scenario.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuiteError {
    /// The engine reported a scenario failure.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// The example generator could not produce a model.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use asserts::failed_event;
pub use asserts::success_event;
pub use asserts::with_resource_model;
pub use hook::run_hook_suite;
pub use report::ScenarioReport;
pub use report::Verdict;
pub use resource::run_resource_suite;
