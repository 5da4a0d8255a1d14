// crates/provider-testkit-transport/src/wire.rs
// ============================================================================
// Module: HTTP Wire Helpers
// Description: Shared client construction and response handling for HTTP bindings.
// Purpose: Enforce timeouts, size limits, and JSON response checks uniformly.
// Dependencies: provider-testkit-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The function and container bindings share one HTTP posture: explicit
//! timeout, redirects disabled, bounded response reads, and a strict JSON
//! content check. Responses that lie about their length or exceed the size
//! limit fail closed as malformed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use provider_testkit_core::TransportFault;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds a blocking HTTP client with the binding's timeout and agent.
///
/// # Errors
///
/// Returns [`TransportFault::Connection`] when the client cannot be built.
pub(crate) fn build_client(timeout_ms: u64, user_agent: &str) -> Result<Client, TransportFault> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(user_agent.to_string())
        .redirect(Policy::none())
        .build()
        .map_err(|err| TransportFault::Connection(format!("http client build failed: {err}")))
}

/// Posts a JSON payload and maps request breakdowns to connection faults.
///
/// # Errors
///
/// Returns [`TransportFault::Connection`] when the endpoint is unreachable
/// or the request times out.
pub(crate) fn post_json(
    client: &Client,
    url: &str,
    payload: &[u8],
) -> Result<Response, TransportFault> {
    client
        .post(url)
        .header("content-type", "application/json")
        .body(payload.to_vec())
        .send()
        .map_err(|err| TransportFault::Connection(err.to_string()))
}

// ============================================================================
// SECTION: Response Handling
// ============================================================================

/// Requires a JSON response body and returns it under a size limit.
///
/// The content type must be `application/json` (or a `+json` suffix) and the
/// body must parse as JSON; the bytes are returned untouched so payload
/// fidelity is preserved for the engine.
///
/// # Errors
///
/// Returns [`TransportFault::MalformedResponse`] for wrong content types,
/// oversized or truncated bodies, and unparseable JSON.
pub(crate) fn require_json_body(
    response: Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportFault> {
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !is_json_media_type(&content_type) {
        return Err(TransportFault::MalformedResponse(format!(
            "unexpected response content type '{content_type}'"
        )));
    }
    let body = read_response_limited(response, max_bytes)?;
    serde_json::from_slice::<serde_json::Value>(&body).map_err(|err| {
        TransportFault::MalformedResponse(format!("response is not valid JSON: {err}"))
    })?;
    Ok(body)
}

/// Returns true for `application/json` and `+json` media types.
fn is_json_media_type(value: &str) -> bool {
    let media_type = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: Response, max_bytes: usize) -> Result<Vec<u8>, TransportFault> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| {
        TransportFault::MalformedResponse("response size limit exceeds u64".to_string())
    })?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(TransportFault::MalformedResponse(
            "response exceeds size limit".to_string(),
        ));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle.read_to_end(&mut buf).map_err(|_| {
        TransportFault::MalformedResponse("failed to read response body".to_string())
    })?;
    if buf.len() > max_bytes {
        return Err(TransportFault::MalformedResponse(
            "response exceeds size limit".to_string(),
        ));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected).map_err(|_| {
            TransportFault::MalformedResponse("invalid response length".to_string())
        })?;
        if buf.len() < expected {
            return Err(TransportFault::MalformedResponse(
                "response truncated".to_string(),
            ));
        }
    }
    Ok(buf)
}
