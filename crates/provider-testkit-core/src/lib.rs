// crates/provider-testkit-core/src/lib.rs
// ============================================================================
// Module: Provider Testkit Core
// Description: Protocol data model, transport interfaces, and conformance engine.
// Purpose: Drive handlers through the orchestrator's invocation protocol and
// validate their progress events against the published contract.
// Dependencies: serde, serde_json, thiserror, rand, time
// ============================================================================

//! ## Overview
//! This crate holds everything a conformance run needs that is independent of
//! a concrete transport or listener implementation: the canonical protocol
//! enumerations and event shapes, the request envelope and token lifecycle,
//! the transport and callback interfaces with their fault taxonomy, and the
//! retry state machine that drives a handler to a terminal status.
//!
//! Invariants:
//! - Enumerations mirror the orchestrator's published wire strings exactly;
//!   unknown values are contract violations, never coerced.
//! - The engine is deterministic with respect to its [`RetryPolicy`] and the
//!   handler's responses; all suspensions are bounded by the scenario
//!   deadline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::callback::CallbackRecord;
pub use crate::core::protocol::Action;
pub use crate::core::protocol::ContractViolation;
pub use crate::core::protocol::HandlerErrorCode;
pub use crate::core::protocol::HookInvocationPoint;
pub use crate::core::protocol::HookProgressEvent;
pub use crate::core::protocol::HookStatus;
pub use crate::core::protocol::OperationStatus;
pub use crate::core::protocol::ProgressEvent;
pub use crate::core::request::CLIENT_REQUEST_TOKEN_LENGTH;
pub use crate::core::request::HookInvocationRequest;
pub use crate::core::request::HookTargetModel;
pub use crate::core::request::InvocationRequest;
pub use crate::core::request::RequestEnvelope;
pub use crate::core::request::generate_token;
pub use crate::core::request::make_request;
pub use crate::core::time::Timestamp;
pub use crate::interfaces::CallbackSource;
pub use crate::interfaces::HandlerTransport;
pub use crate::interfaces::InvokeContext;
pub use crate::interfaces::TransportFault;
pub use crate::runtime::engine::AttemptRecord;
pub use crate::runtime::engine::AttemptSource;
pub use crate::runtime::engine::ResourceClient;
pub use crate::runtime::engine::ScenarioOutcome;
pub use crate::runtime::error::AssertionMismatch;
pub use crate::runtime::error::ScenarioError;
pub use crate::runtime::error::TimeoutDetails;
pub use crate::runtime::hook::HookAttemptRecord;
pub use crate::runtime::hook::HookClient;
pub use crate::runtime::hook::HookOutcome;
pub use crate::runtime::policy::BackoffKind;
pub use crate::runtime::policy::RetryPolicy;
