// crates/provider-testkit-core/src/core/callback.rs
// ============================================================================
// Module: Callback Records
// Description: Records for progress events pushed to the callback listener.
// Purpose: Preserve pushed events in receipt order for engine consumption.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Handlers running asynchronously may push progress events to the embedded
//! callback listener instead of returning them inline. The listener appends
//! one [`CallbackRecord`] per received request, in receipt order; the engine
//! drains them oldest-first and interprets `event` as a progress event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Callback Records
// ============================================================================

/// One entry in the callback listener's ordered log.
///
/// # Invariants
/// - `error` is `Some` only for synthetic records describing an unusable
///   callback; `event` is `Null` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRecord {
    /// Progress-event-shaped document as received.
    pub event: Value,
    /// Receipt timestamp.
    pub received_at: Timestamp,
    /// Listener-side error description for unusable callbacks.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl CallbackRecord {
    /// Creates a record for a successfully parsed callback event.
    #[must_use]
    pub fn received(event: Value) -> Self {
        Self {
            event,
            received_at: Timestamp::now(),
            error: None,
        }
    }

    /// Creates a synthetic record for an unusable callback.
    #[must_use]
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            event: Value::Null,
            received_at: Timestamp::now(),
            error: Some(error.into()),
        }
    }
}
