// crates/provider-testkit-transport/src/function.rs
// ============================================================================
// Module: Function Binding
// Description: Invocation through a managed-function runtime endpoint.
// Purpose: Post requests to the runtime's invoke API and surface remote
// handler exceptions distinctly from transport breakdowns.
// Dependencies: provider-testkit-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! Managed-function runtimes (and their local emulators) expose an invoke
//! API at `/2015-03-31/functions/{name}/invocations`: the request body is
//! the function payload, the response body is the function's return value,
//! and a marker header flags handler exceptions. The binding posts the
//! serialized invocation request there, requires a JSON response, and maps
//! the marker header to [`TransportFault::RemoteException`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use provider_testkit_core::HandlerTransport;
use provider_testkit_core::InvokeContext;
use provider_testkit_core::TransportFault;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::wire::build_client;
use crate::wire::post_json;
use crate::wire::require_json_body;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Marker header a runtime sets when the function raised an exception.
pub const FUNCTION_ERROR_HEADER: &str = "x-amz-function-error";

/// Endpoint descriptor for the function binding.
///
/// # Invariants
/// - `endpoint` is the runtime's base URL; the invoke path is appended.
/// - `timeout_ms` covers the full request lifecycle and must absorb slow
///   container-backed emulators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionEndpoint {
    /// Base URL of the function runtime.
    pub endpoint: Url,
    /// Name of the function to invoke.
    pub function_name: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl FunctionEndpoint {
    /// Creates an endpoint descriptor with default limits.
    #[must_use]
    pub fn new(endpoint: Url, function_name: impl Into<String>) -> Self {
        Self {
            endpoint,
            function_name: function_name.into(),
            timeout_ms: 900_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "provider-testkit/0.1".to_string(),
        }
    }

    /// Returns the full invoke URL for this endpoint.
    #[must_use]
    pub fn invoke_url(&self) -> String {
        format!(
            "{}/2015-03-31/functions/{}/invocations",
            self.endpoint.as_str().trim_end_matches('/'),
            self.function_name
        )
    }
}

// ============================================================================
// SECTION: Binding
// ============================================================================

/// Transport binding for managed-function invocation.
///
/// # Invariants
/// - The endpoint descriptor is immutable for the binding's lifetime.
pub struct FunctionBinding {
    /// Endpoint descriptor.
    config: FunctionEndpoint,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl FunctionBinding {
    /// Creates a function binding for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the HTTP client cannot be created.
    pub fn new(config: FunctionEndpoint) -> Result<Self, TransportFault> {
        let client = build_client(config.timeout_ms, &config.user_agent)?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl HandlerTransport for FunctionBinding {
    fn invoke(&mut self, payload: &[u8], _ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault> {
        let response = post_json(&self.client, &self.config.invoke_url(), payload)?;
        if let Some(marker) = response.headers().get(FUNCTION_ERROR_HEADER) {
            let kind = marker.to_str().unwrap_or("unknown").to_string();
            return Err(TransportFault::RemoteException(format!(
                "function runtime reported a handler exception: {kind}"
            )));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(TransportFault::RemoteException(format!(
                "invoke endpoint returned status {status}"
            )));
        }
        require_json_body(response, self.config.max_response_bytes)
    }
}
