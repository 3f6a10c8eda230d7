//! Assertions over the `{"error": ..}` / `{"errors": [..]}` response bodies.
//!
//! These work on raw parts so the crate does not depend on backend types.

use actix_web::http::StatusCode;
use serde_json::Value;

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON ({e}): {}",
            String::from_utf8_lossy(body)
        )
    })
}

/// Assert a single-message failure with the given status and exact message.
pub fn assert_error(status: StatusCode, body: &[u8], expected_status: StatusCode, expected: &str) {
    assert_eq!(
        status,
        expected_status,
        "unexpected status, body: {}",
        String::from_utf8_lossy(body)
    );
    let json = parse(body);
    let message = json
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing \"error\" field in {json}"));
    assert_eq!(message, expected);
}

/// Assert a 400 field-validation failure and return its messages.
pub fn assert_validation_errors(status: StatusCode, body: &[u8]) -> Vec<String> {
    assert_eq!(
        status,
        StatusCode::BAD_REQUEST,
        "unexpected status, body: {}",
        String::from_utf8_lossy(body)
    );
    let json = parse(body);
    let errors = json
        .get("errors")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("missing \"errors\" array in {json}"));
    assert!(!errors.is_empty(), "validation failure without messages");
    errors
        .iter()
        .map(|e| e.as_str().unwrap_or_default().to_string())
        .collect()
}
