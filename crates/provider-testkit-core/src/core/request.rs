// crates/provider-testkit-core/src/core/request.rs
// ============================================================================
// Module: Request Envelopes
// Description: Request envelopes, invocation payloads, and token generation.
// Purpose: Build canonical handler requests with a stable per-scenario token.
// Dependencies: rand, serde, serde_json
// ============================================================================

//! ## Overview
//! A scenario drives a handler with one [`RequestEnvelope`] whose
//! `clientRequestToken` stays stable across every re-invocation; each new
//! scenario draws a fresh token. The wire payload wraps the envelope with the
//! targeted action and, when a callback listener is attached, the callback
//! URL the handler may push progress events to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::protocol::Action;
use crate::core::protocol::HookInvocationPoint;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Length of a client request token in characters.
pub const CLIENT_REQUEST_TOKEN_LENGTH: usize = 36;

/// Generates a fresh 36-character client request token.
///
/// Tokens use the hyphenated 8-4-4-4-12 hex form with version and variant
/// nibbles fixed, drawn from the operating-system RNG so tokens are unique
/// per call and per run.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
}

// ============================================================================
// SECTION: Resource Envelopes
// ============================================================================

/// Canonical request envelope for one invocation attempt.
///
/// # Invariants
/// - `client_request_token` is stable across all re-invocations of one
///   scenario; a fresh scenario gets a fresh token.
/// - `callback_context` is only populated on re-invocations and is echoed
///   verbatim from the handler's previous IN_PROGRESS event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Desired resource state for the operation.
    pub desired_resource_state: Value,
    /// Previous resource state, null for operations without prior state.
    pub previous_resource_state: Option<Value>,
    /// Logical identifier assigned by the orchestrator, null in contract runs.
    pub logical_resource_identifier: Option<String>,
    /// Stable per-scenario client request token.
    pub client_request_token: String,
    /// Opaque resumption state carried forward from the previous event.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_context: Option<Value>,
}

/// Builds the initial request envelope for a scenario.
#[must_use]
pub fn make_request(
    desired: Value,
    previous: Option<Value>,
    token: impl Into<String>,
) -> RequestEnvelope {
    RequestEnvelope {
        desired_resource_state: desired,
        previous_resource_state: previous,
        logical_resource_identifier: None,
        client_request_token: token.into(),
        callback_context: None,
    }
}

/// Wire payload for one resource handler invocation.
///
/// # Invariants
/// - `request` follows the envelope invariants; `action` is fixed for the
///   scenario's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    /// Action targeted by the invocation.
    pub action: Action,
    /// Request envelope, flattened into the payload body.
    #[serde(flatten)]
    pub request: RequestEnvelope,
    /// Callback URL the handler may push progress events to.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_url: Option<String>,
}

// ============================================================================
// SECTION: Hook Envelopes
// ============================================================================

/// Target model a hook invocation evaluates.
///
/// # Invariants
/// - `previous_resource_properties` is only present for update invocation
///   points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookTargetModel {
    /// Proposed resource properties under evaluation.
    pub resource_properties: Value,
    /// Prior resource properties for update invocation points.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_resource_properties: Option<Value>,
}

/// Wire payload for one hook handler invocation.
///
/// # Invariants
/// - `client_request_token` follows the same stability rule as resource
///   envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInvocationRequest {
    /// Invocation point targeted by this request.
    pub action_invocation_point: HookInvocationPoint,
    /// Target model under evaluation.
    pub target_model: HookTargetModel,
    /// Stable per-scenario client request token.
    pub client_request_token: String,
    /// Opaque resumption state carried forward from the previous event.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_context: Option<Value>,
    /// Callback URL the handler may push progress events to.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_url: Option<String>,
}
