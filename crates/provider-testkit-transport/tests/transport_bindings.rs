// crates/provider-testkit-transport/tests/transport_bindings.rs
// ============================================================================
// Module: Transport Binding Tests
// Description: Exercises local, function, and container bindings over real sockets.
// Purpose: Pin payload fidelity, invoke-path shape, and fault mapping.
// ============================================================================

//! ## Overview
//! Fake invocation endpoints built on tiny_http capture exactly what each
//! binding sends and replay scripted responses, covering the happy path,
//! non-JSON responses, remote-exception markers, and connection failures.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use provider_testkit_core::HandlerTransport;
use provider_testkit_core::InvokeContext;
use provider_testkit_core::TransportFault;
use provider_testkit_transport::ContainerBinding;
use provider_testkit_transport::ContainerEndpoint;
use provider_testkit_transport::FunctionBinding;
use provider_testkit_transport::FunctionEndpoint;
use provider_testkit_transport::TransportBinding;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Request capture from the one-shot fake endpoint.
struct ReceivedRequest {
    /// Request path as received.
    url: String,
    /// Request body bytes as received.
    body: Vec<u8>,
}

/// Serves exactly one request with a scripted response.
fn one_shot_server(
    status: u16,
    content_type: &str,
    body: &'static str,
    extra_header: Option<(&'static str, &'static str)>,
) -> (String, Arc<Mutex<Option<ReceivedRequest>>>, JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr().to_ip().unwrap());
    let captured: Arc<Mutex<Option<ReceivedRequest>>> = Arc::new(Mutex::new(None));
    let capture = Arc::clone(&captured);
    let content_type = content_type.to_string();
    let worker = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received_body = Vec::new();
        request.as_reader().read_to_end(&mut received_body).unwrap();
        *capture.lock().unwrap() = Some(ReceivedRequest {
            url: request.url().to_string(),
            body: received_body,
        });
        let mut response = Response::from_string(body).with_status_code(status);
        response = response
            .with_header(Header::from_bytes("Content-Type", content_type.as_bytes()).unwrap());
        if let Some((name, value)) = extra_header {
            response = response.with_header(Header::from_bytes(name, value).unwrap());
        }
        request.respond(response).unwrap();
    });
    (base, captured, worker)
}

/// Payload with non-ASCII content for fidelity checks.
fn unicode_payload() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "action": "CREATE",
        "desiredResourceState": {"Name": "schöne Grüße — 日本語 ✓"},
    }))
    .unwrap()
}

// ============================================================================
// SECTION: Local Binding
// ============================================================================

#[test]
fn local_binding_round_trips_unicode_payloads_byte_for_byte() {
    let mut binding = TransportBinding::local(
        |payload: &[u8], _ctx: &InvokeContext| Ok(payload.to_vec()),
    );
    let payload = unicode_payload();
    let response = binding.invoke(&payload, &InvokeContext::default()).unwrap();
    assert_eq!(response, payload);
}

#[test]
fn local_binding_passes_the_callback_url_through_context() {
    let mut binding = TransportBinding::local(|_payload: &[u8], ctx: &InvokeContext| {
        let url = ctx.callback_url.clone().unwrap_or_default();
        Ok(serde_json::to_vec(&json!({"status": "SUCCESS", "message": url})).unwrap())
    });
    let ctx = InvokeContext {
        callback_url: Some("http://127.0.0.1:7777/".to_string()),
    };
    let response = binding.invoke(b"{}", &ctx).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(doc["message"], json!("http://127.0.0.1:7777/"));
}

// ============================================================================
// SECTION: Function Binding
// ============================================================================

#[test]
fn function_binding_posts_to_the_invoke_path_and_returns_the_payload() {
    let (base, captured, worker) =
        one_shot_server(200, "application/json", "{\"status\":\"SUCCESS\"}", None);
    let endpoint = FunctionEndpoint::new(Url::parse(&base).unwrap(), "Handler");
    let mut binding = FunctionBinding::new(endpoint).unwrap();

    let payload = unicode_payload();
    let response = binding.invoke(&payload, &InvokeContext::default()).unwrap();
    worker.join().unwrap();

    assert_eq!(response, b"{\"status\":\"SUCCESS\"}");
    let received = captured.lock().unwrap().take().unwrap();
    assert_eq!(received.url, "/2015-03-31/functions/Handler/invocations");
    assert_eq!(received.body, payload);
}

#[test]
fn function_binding_rejects_non_json_responses_as_malformed() {
    let (base, _captured, worker) = one_shot_server(200, "text/html", "<html></html>", None);
    let endpoint = FunctionEndpoint::new(Url::parse(&base).unwrap(), "Handler");
    let mut binding = FunctionBinding::new(endpoint).unwrap();

    let error = binding.invoke(b"{}", &InvokeContext::default()).unwrap_err();
    worker.join().unwrap();
    assert!(matches!(error, TransportFault::MalformedResponse(_)), "got {error:?}");
}

#[test]
fn function_binding_maps_the_error_marker_to_a_remote_exception() {
    let (base, _captured, worker) = one_shot_server(
        200,
        "application/json",
        "{\"errorMessage\":\"boom\"}",
        Some(("x-amz-function-error", "Unhandled")),
    );
    let endpoint = FunctionEndpoint::new(Url::parse(&base).unwrap(), "Handler");
    let mut binding = FunctionBinding::new(endpoint).unwrap();

    let error = binding.invoke(b"{}", &InvokeContext::default()).unwrap_err();
    worker.join().unwrap();
    assert!(matches!(error, TransportFault::RemoteException(_)), "got {error:?}");
}

#[test]
fn function_binding_maps_unreachable_endpoints_to_connection_faults() {
    let free_port = {
        let probe = TcpListener::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap().port()
    };
    let endpoint = FunctionEndpoint::new(
        Url::parse(&format!("http://127.0.0.1:{free_port}")).unwrap(),
        "Handler",
    );
    let mut binding = FunctionBinding::new(endpoint).unwrap();

    let error = binding.invoke(b"{}", &InvokeContext::default()).unwrap_err();
    assert!(matches!(error, TransportFault::Connection(_)), "got {error:?}");
}

// ============================================================================
// SECTION: Container Binding
// ============================================================================

#[test]
fn container_binding_posts_the_payload_to_the_invoke_url() {
    let (base, captured, worker) = one_shot_server(
        200,
        "application/json",
        "{\"status\":\"IN_PROGRESS\",\"callbackDelaySeconds\":0}",
        None,
    );
    let endpoint = ContainerEndpoint::new(Url::parse(&format!("{base}/invoke")).unwrap());
    let mut binding = ContainerBinding::new(endpoint).unwrap();

    let payload = unicode_payload();
    let response = binding.invoke(&payload, &InvokeContext::default()).unwrap();
    worker.join().unwrap();

    let doc: serde_json::Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(doc["status"], json!("IN_PROGRESS"));
    let received = captured.lock().unwrap().take().unwrap();
    assert_eq!(received.url, "/invoke");
    assert_eq!(received.body, payload);
}

#[test]
fn container_binding_maps_http_failures_to_remote_exceptions() {
    let (base, _captured, worker) =
        one_shot_server(500, "application/json", "{\"error\":\"crashed\"}", None);
    let endpoint = ContainerEndpoint::new(Url::parse(&format!("{base}/invoke")).unwrap());
    let mut binding = ContainerBinding::new(endpoint).unwrap();

    let error = binding.invoke(b"{}", &InvokeContext::default()).unwrap_err();
    worker.join().unwrap();
    assert!(matches!(error, TransportFault::RemoteException(_)), "got {error:?}");
}
