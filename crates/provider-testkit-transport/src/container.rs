// crates/provider-testkit-transport/src/container.rs
// ============================================================================
// Module: Container Binding
// Description: Invocation through a running container's exposed invoke URL.
// Purpose: Post requests over the container's invocation protocol and map
// HTTP-level failures to transport faults.
// Dependencies: provider-testkit-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! A containerized handler exposes one HTTP invocation endpoint. The binding
//! posts the serialized invocation request to that URL as-is and requires a
//! JSON response. Connection breakdowns, non-success statuses, and non-JSON
//! bodies map to the three [`TransportFault`] cases; the container's
//! lifecycle (start, stop, port publishing) is owned by the caller.

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

/// Endpoint descriptor for the container binding.
///
/// # Invariants
/// - `invoke_url` is the container's published invocation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerEndpoint {
    /// Full invoke URL published by the container.
    pub invoke_url: Url,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl ContainerEndpoint {
    /// Creates an endpoint descriptor with default limits.
    #[must_use]
    pub fn new(invoke_url: Url) -> Self {
        Self {
            invoke_url,
            timeout_ms: 900_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "provider-testkit/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Binding
// ============================================================================

/// Transport binding for containerized handler invocation.
///
/// # Invariants
/// - The endpoint descriptor is immutable for the binding's lifetime.
pub struct ContainerBinding {
    /// Endpoint descriptor.
    config: ContainerEndpoint,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl ContainerBinding {
    /// Creates a container binding for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFault`] when the HTTP client cannot be created.
    pub fn new(config: ContainerEndpoint) -> Result<Self, TransportFault> {
        let client = build_client(config.timeout_ms, &config.user_agent)?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl HandlerTransport for ContainerBinding {
    fn invoke(&mut self, payload: &[u8], _ctx: &InvokeContext) -> Result<Vec<u8>, TransportFault> {
        let response = post_json(&self.client, self.config.invoke_url.as_str(), payload)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportFault::RemoteException(format!(
                "container invoke endpoint returned status {status}"
            )));
        }
        require_json_body(response, self.config.max_response_bytes)
    }
}
