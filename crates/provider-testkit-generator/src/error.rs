// crates/provider-testkit-generator/src/error.rs
// ============================================================================
// Module: Generator Errors
// Description: Failure taxonomy for schema digestion and example synthesis.
// Purpose: Keep schema defects, synthesis failures, and validation failures distinct.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Generation fails closed: a schema the generator cannot honor, a strategy
//! that cannot be built, or an example that does not validate against its
//! source schema all surface as typed errors instead of degraded examples.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Example generator errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The schema document is malformed or self-contradictory.
    #[error("invalid resource schema: {0}")]
    InvalidSchema(String),
    /// A property pointer could not be decoded.
    #[error("invalid property pointer '{pointer}': {reason}")]
    InvalidPointer {
        /// Pointer text as found in the schema.
        pointer: String,
        /// Why it could not be decoded.
        reason: String,
    },
    /// The schema uses a construct the generator does not support.
    #[error("unsupported schema construct: {0}")]
    Unsupported(String),
    /// Drawing a value from the strategy failed.
    #[error("example synthesis failed: {0}")]
    Synthesis(String),
    /// The generated example did not validate against its source schema.
    #[error("generated example failed schema validation: {0}")]
    Validation(String),
}
