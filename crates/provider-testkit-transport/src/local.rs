// crates/provider-testkit-transport/src/local.rs
// ============================================================================
// Module: Local Binding
// Description: In-process handler invocation for fast iteration.
// Purpose: Invoke a handler entry point directly, without any network hop.
// Dependencies: provider-testkit-core
// ============================================================================

//! ## Overview
//! The local binding calls a [`LocalHandler`] in process. Closures implement
//! the trait through a blanket impl, which is also how scripted handlers are
//! injected in tests and how reference handlers back the contract suite.
//! Payload bytes pass through untouched in both directions, so UTF-8
//! fidelity is trivially preserved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::HandlerTransport;
use provider_testkit_core::InvokeContext;
use provider_testkit_core::TransportFault;

// ============================================================================
// SECTION: Local Handler
// ============================================================================

/// In-process handler entry point.
pub trait LocalHandler: Send {
    /// Handles one serialized invocation request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the handler cannot produce a
    /// serialized response.
    fn handle(&mut self, payload: &[u8], ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault>;
}

impl<F> LocalHandler for F
where
    F: FnMut(&[u8], &InvokeContext) -> Result<Vec<u8>, TransportFault> + Send,
{
    fn handle(&mut self, payload: &[u8], ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault> {
        self(payload, ctx)
    }
}

// ============================================================================
// SECTION: Local Binding
// ============================================================================

/// Transport binding that invokes a handler in process.
///
/// # Invariants
/// - Payload bytes are handed to the handler unmodified.
pub struct LocalBinding {
    /// Handler entry point under test.
    handler: Box<dyn LocalHandler>,
}

impl LocalBinding {
    /// Creates a local binding around a handler entry point.
    #[must_use]
    pub fn new(handler: impl LocalHandler + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }
}

impl HandlerTransport for LocalBinding {
    fn invoke(&mut self, payload: &[u8], ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault> {
        self.handler.handle(payload, ctx)
    }
}
