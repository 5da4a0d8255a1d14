// crates/provider-testkit-listener/tests/listener.rs
// ============================================================================
// Module: Callback Listener Tests
// Description: Round-trip, content-type gate, ordering, and port-release checks.
// Purpose: Validate listener behavior against the callback endpoint contract.
// ============================================================================

//! ## Overview
//! Tests drive the listener over real local sockets with raw HTTP requests so
//! the content-type gate and record ordering are observed end to end.

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

use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::net::TcpListener;
use std::net::TcpStream;
use std::time::Duration;

use provider_testkit_core::CallbackSource;
use provider_testkit_listener::CallbackListener;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Posts a raw HTTP request body to the listener and waits for the response.
fn post(address: SocketAddr, content_type: &str, body: &str) {
    let mut stream = TcpStream::connect(address).unwrap();
    let request = format!(
        "POST / HTTP/1.1\r\nHost: {address}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(request.as_bytes()).unwrap();
    stream.flush().unwrap();
    let mut response = String::new();
    let _read = stream.read_to_string(&mut response);
    assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");
}

// ============================================================================
// SECTION: Round-Trip
// ============================================================================

#[test]
fn json_callback_round_trips_as_one_record() {
    let listener = CallbackListener::bind().unwrap();
    post(listener.server_address(), "application/json", "{\"event\":\"test\"}");

    let record = listener.log().wait_pop(Duration::from_secs(5)).unwrap();
    assert_eq!(record.event, json!({"event": "test"}));
    assert_eq!(record.error, None);
    assert!(listener.log().is_empty());
}

#[test]
fn json_suffix_media_types_are_accepted() {
    let listener = CallbackListener::bind().unwrap();
    post(listener.server_address(), "application/cloud-events+json; charset=utf-8", "{\"n\":1}");

    let record = listener.log().wait_pop(Duration::from_secs(5)).unwrap();
    assert_eq!(record.event, json!({"n": 1}));
    assert_eq!(record.error, None);
}

#[test]
fn non_json_content_type_yields_an_error_record() {
    let listener = CallbackListener::bind().unwrap();
    post(listener.server_address(), "text/plain", "Just Text");

    let record = listener.log().wait_pop(Duration::from_secs(5)).unwrap();
    let error = record.error.unwrap();
    assert!(
        error.contains("callback with invalid content type"),
        "unexpected error text: {error}"
    );
    assert!(listener.log().is_empty());
}

#[test]
fn unparseable_json_body_yields_an_error_record_without_crashing() {
    let listener = CallbackListener::bind().unwrap();
    post(listener.server_address(), "application/json", "{not json");
    let record = listener.log().wait_pop(Duration::from_secs(5)).unwrap();
    assert!(record.error.unwrap().contains("not valid JSON"));

    // The listener keeps serving after the malformed callback.
    post(listener.server_address(), "application/json", "{\"ok\":true}");
    let record = listener.log().wait_pop(Duration::from_secs(5)).unwrap();
    assert_eq!(record.event, json!({"ok": true}));
}

// ============================================================================
// SECTION: Ordering
// ============================================================================

#[test]
fn records_pop_in_receipt_order() {
    let listener = CallbackListener::bind().unwrap();
    for index in 0..3 {
        post(
            listener.server_address(),
            "application/json",
            &format!("{{\"seq\":{index}}}"),
        );
    }

    let log = listener.log();
    for index in 0..3 {
        let record = log.wait_pop(Duration::from_secs(5)).unwrap();
        assert_eq!(record.event, json!({"seq": index}));
    }
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

#[test]
fn next_record_times_out_without_a_callback() {
    let listener = CallbackListener::bind().unwrap();
    assert!(listener.next_record(Duration::from_millis(50)).is_none());
}

#[test]
fn callback_url_names_the_bound_address() {
    let listener = CallbackListener::bind().unwrap();
    assert_eq!(listener.callback_url(), format!("http://{}/", listener.server_address()));
}

#[test]
fn dropping_the_listener_releases_the_port() {
    let listener = CallbackListener::bind().unwrap();
    let address = listener.server_address();
    drop(listener);

    // The port must be rebindable once the listener is gone.
    let rebound = TcpListener::bind(address).unwrap();
    drop(rebound);
}
