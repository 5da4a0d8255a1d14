// crates/provider-testkit-core/tests/request_shape.rs
// ============================================================================
// Module: Request Shape Tests
// Description: Token format and request envelope wire-shape checks.
// Purpose: Pin the exact serialized form of envelopes and invocation payloads.
// ============================================================================

//! ## Overview
//! The envelope's wire shape is part of the external contract: nullable
//! fields serialize as explicit nulls, the callback context is absent until a
//! re-invocation, and tokens are 36-character hyphenated hex values.

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

use std::collections::HashSet;

use proptest::proptest;
use provider_testkit_core::Action;
use provider_testkit_core::CLIENT_REQUEST_TOKEN_LENGTH;
use provider_testkit_core::InvocationRequest;
use provider_testkit_core::generate_token;
use provider_testkit_core::make_request;
use serde_json::json;

#[test]
fn token_is_36_characters_in_hyphenated_hex_form() {
    let token = generate_token();
    assert_eq!(token.len(), CLIENT_REQUEST_TOKEN_LENGTH);
    let segments: Vec<&str> = token.split('-').collect();
    let lengths: Vec<usize> = segments.iter().map(|segment| segment.len()).collect();
    assert_eq!(lengths, vec![8, 4, 4, 4, 12]);
    for segment in segments {
        assert!(segment.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}

#[test]
fn tokens_are_unique_per_call() {
    let tokens: HashSet<String> = (0..1_000).map(|_| generate_token()).collect();
    assert_eq!(tokens.len(), 1_000);
}

#[test]
fn make_request_yields_exact_envelope_shape() {
    let token = generate_token();
    let envelope = make_request(json!({"Name": "alpha"}), None, token.clone());
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "desiredResourceState": {"Name": "alpha"},
            "previousResourceState": null,
            "logicalResourceIdentifier": null,
            "clientRequestToken": token,
        })
    );
}

#[test]
fn make_request_keeps_previous_state_when_present() {
    let envelope = make_request(json!({"Name": "beta"}), Some(json!({"Name": "alpha"})), "t");
    assert_eq!(envelope.previous_resource_state, Some(json!({"Name": "alpha"})));
    assert_eq!(envelope.logical_resource_identifier, None);
    assert_eq!(envelope.callback_context, None);
}

#[test]
fn invocation_request_flattens_envelope_with_action() {
    let token = generate_token();
    let request = InvocationRequest {
        action: Action::Create,
        request: make_request(json!({"Name": "alpha"}), None, token.clone()),
        callback_url: Some("http://127.0.0.1:9999/".to_string()),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "action": "CREATE",
            "desiredResourceState": {"Name": "alpha"},
            "previousResourceState": null,
            "logicalResourceIdentifier": null,
            "clientRequestToken": token,
            "callbackUrl": "http://127.0.0.1:9999/",
        })
    );
}

proptest! {
    #[test]
    fn envelope_round_trips_for_arbitrary_desired_state(name in ".*", count in 0_i64..1_000_000) {
        let desired = json!({"Name": name, "Count": count});
        let envelope = make_request(desired.clone(), None, generate_token());
        let encoded = serde_json::to_vec(&envelope).unwrap();
        let decoded: provider_testkit_core::RequestEnvelope =
            serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.desired_resource_state, desired);
    }
}
