// crates/provider-testkit-transport/src/binding.rs
// ============================================================================
// Module: Transport Binding
// Description: Closed set of invocation mechanisms behind one interface.
// Purpose: Route invocations to the selected binding with a match arm per variant.
// Dependencies: provider-testkit-core, crate bindings
// ============================================================================

//! ## Overview
//! [`TransportBinding`] is the runtime selection point between the local,
//! function, and container bindings. The set is closed on purpose: a new
//! invocation mechanism is a new variant plus a match arm, never a subclass,
//! so every binding in existence is visible in one place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::HandlerTransport;
use provider_testkit_core::InvokeContext;
use provider_testkit_core::TransportFault;

use crate::container::ContainerBinding;
use crate::container::ContainerEndpoint;
use crate::function::FunctionBinding;
use crate::function::FunctionEndpoint;
use crate::local::LocalBinding;
use crate::local::LocalHandler;

// ============================================================================
// SECTION: Binding Variants
// ============================================================================

/// Closed set of handler invocation mechanisms.
///
/// # Invariants
/// - The selected variant is fixed for the scenario's lifetime.
pub enum TransportBinding {
    /// In-process invocation of a handler entry point.
    Local(LocalBinding),
    /// Invocation through a managed-function runtime endpoint.
    Function(FunctionBinding),
    /// Invocation through a running container's invoke URL.
    Container(ContainerBinding),
}

impl TransportBinding {
    /// Creates a local binding around an in-process handler.
    #[must_use]
    pub fn local(handler: impl LocalHandler + 'static) -> Self {
        Self::Local(LocalBinding::new(handler))
    }

    /// Creates a function binding for the given endpoint descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the HTTP client cannot be created.
    pub fn function(endpoint: FunctionEndpoint) -> Result<Self, TransportFault> {
        FunctionBinding::new(endpoint).map(Self::Function)
    }

    /// Creates a container binding for the given endpoint descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the HTTP client cannot be created.
    pub fn container(endpoint: ContainerEndpoint) -> Result<Self, TransportFault> {
        ContainerBinding::new(endpoint).map(Self::Container)
    }
}

impl HandlerTransport for TransportBinding {
    fn invoke(&mut self, payload: &[u8], ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault> {
        match self {
            Self::Local(binding) => binding.invoke(payload, ctx),
            Self::Function(binding) => binding.invoke(payload, ctx),
            Self::Container(binding) => binding.invoke(payload, ctx),
        }
    }
}
