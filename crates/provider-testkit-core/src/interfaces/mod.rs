// crates/provider-testkit-core/src/interfaces/mod.rs
// ============================================================================
// Module: Testkit Interfaces
// Description: Transport and callback interfaces used by the protocol engine.
// Purpose: Define the seams between the engine and binding/listener crates.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engine is generic over how a handler is reached and how pushed
//! callbacks arrive. [`HandlerTransport`] is the single invocation seam: a
//! binding receives the serialized request plus an [`InvokeContext`] and
//! returns the serialized response or a [`TransportFault`].
//! [`CallbackSource`] is the drain side of the listener's ordered log.
//! Implementations must fail closed: a breakdown reaching the handler is a
//! fault, never an empty success.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::core::callback::CallbackRecord;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Per-invocation context handed to transport bindings.
///
/// # Invariants
/// - `callback_url` is stable for the scenario's lifetime when present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvokeContext {
    /// Callback URL advertised to the handler, when a listener is attached.
    pub callback_url: Option<String>,
}

/// Transport breakdown reaching or hearing back from a handler.
///
/// # Invariants
/// - Variants are stable for programmatic handling: connection failures,
///   malformed responses, and remote exceptions are distinct cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFault {
    /// The handler endpoint could not be reached.
    #[error("transport connection failure: {0}")]
    Connection(String),
    /// The handler responded, but not with a well-formed JSON payload.
    #[error("malformed transport response: {0}")]
    MalformedResponse(String),
    /// The remote execution environment reported a handler exception.
    #[error("remote handler exception: {0}")]
    RemoteException(String),
}

/// Uniform invocation interface over heterogeneous handler bindings.
pub trait HandlerTransport {
    /// Invokes the handler with a serialized request payload.
    ///
    /// Bindings must preserve byte-for-byte UTF-8 fidelity of the payload in
    /// both directions.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the handler cannot be reached or its
    /// response cannot be interpreted as a JSON payload.
    fn invoke(&mut self, payload: &[u8], ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault>;
}

// ============================================================================
// SECTION: Callback Source
// ============================================================================

/// Drain side of a callback listener's ordered log.
///
/// Records are observed in receipt order; implementations must not reorder
/// or drop entries.
pub trait CallbackSource {
    /// Returns the callback URL handlers should push progress events to.
    fn callback_url(&self) -> String;

    /// Pops the oldest callback record, waiting up to `wait` for one.
    ///
    /// Returns `None` when no record arrived within the wait budget. The
    /// wait must be cooperative (no busy-spinning).
    fn next_record(&self, wait: Duration) -> Option<CallbackRecord>;
}
