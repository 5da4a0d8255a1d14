// crates/provider-testkit-transport/src/lib.rs
// ============================================================================
// Module: Provider Testkit Transport
// Description: Transport bindings for invoking handlers under test.
// Purpose: Provide a closed set of invocation mechanisms behind the core
// transport interface.
// Dependencies: provider-testkit-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! A handler can be reached three ways: in process through a
//! [`LocalHandler`], through a managed-function runtime's invocation
//! endpoint, or through a running container's exposed invoke URL.
//! [`TransportBinding`] is the closed set of those mechanisms; adding a
//! binding means adding a variant and a match arm. Every binding preserves
//! byte-for-byte UTF-8 fidelity of request and response payloads and maps
//! breakdowns to the core [`provider_testkit_core::TransportFault`] taxonomy.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod binding;
pub mod container;
pub mod function;
pub mod local;
mod wire;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use binding::TransportBinding;
pub use container::ContainerBinding;
pub use container::ContainerEndpoint;
pub use function::FunctionBinding;
pub use function::FunctionEndpoint;
pub use local::LocalBinding;
pub use local::LocalHandler;
