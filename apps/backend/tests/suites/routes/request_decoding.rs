use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::assert_error;
use serde_json::json;

use crate::common::status_and_body;
use crate::support::{build_test_state, create_test_app, Session};

#[actix_web::test]
async fn wrong_content_type_is_unsupported() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let me = Session::new(&state, "typist").await;
    let app = create_test_app(state).build().await?;

    let req = me
        .with_auth(test::TestRequest::post().uri("/api/blog/"))
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"title": "abc", "description": "abc"}"#)
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(
        status,
        &body,
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        "Content-Type header is not application/json",
    );
    Ok(())
}

#[actix_web::test]
async fn unknown_fields_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({"name": "henry", "password": "pw", "admin": true}))
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "Request body contains unknown field \"admin\"",
    );
    Ok(())
}

#[actix_web::test]
async fn multiple_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"name": "a", "password": "b"} {"name": "c", "password": "d"}"#)
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "Request body must only contain a single JSON object",
    );
    Ok(())
}

#[actix_web::test]
async fn oversized_body_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let padding = "a".repeat(70 * 1024);
    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({"name": padding, "password": "pw"}))
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    assert_error(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "Request body must not be larger than 65536 bytes",
    );
    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"name": "a", "password": }"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Request body contains badly-formed JSON"));
    Ok(())
}
