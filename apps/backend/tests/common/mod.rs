#![allow(dead_code)]

pub mod proptest_prelude;

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Split a response into status and raw body for the envelope assertions.
pub async fn status_and_body(resp: ServiceResponse<BoxBody>) -> (StatusCode, Vec<u8>) {
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, body.to_vec())
}
