use std::time::SystemTime;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::{assert_error, assert_validation_errors};
use blog_backend::auth::token;
use serde_json::{json, Value};

use crate::common::status_and_body;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn signup_then_login_issues_usable_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let key = state.security.token_key.clone();
    let app = create_test_app(state).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({"name": "dave", "password": "hunter2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User created");
    let user_id = body["user_id"].as_i64().expect("user_id should be numeric");

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({"name": "dave", "password": "hunter2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let raw = body["token"].as_str().expect("token should be a string");

    let claims = token::decode(&key, raw)?;
    assert_eq!(claims.user_id()?, user_id);
    assert!(!claims.is_expired_at(SystemTime::now()));
    assert_eq!(claims.exp - claims.iat, token::TOKEN_TTL_SECS);

    // The token opens the protected scope
    let req = test::TestRequest::get()
        .uri(&format!("/api/user/{user_id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {raw}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "dave");
    assert_eq!(body["age"], 1);
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[actix_web::test]
async fn duplicate_signup_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/auth/signup/")
            .set_json(json!({"name": "erin", "password": "pw"}))
            .to_request();
        let (status, body) = status_and_body(test::call_service(&app, req).await).await;
        if expected == StatusCode::CONFLICT {
            assert_error(status, &body, expected, "User name already taken");
        } else {
            assert_eq!(status, expected);
        }
    }
    Ok(())
}

#[actix_web::test]
async fn signup_reports_every_field_problem() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({"name": "x", "password": "", "age": -1}))
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    let errors = assert_validation_errors(status, &body);
    assert_eq!(errors.len(), 3, "{errors:?}");
    Ok(())
}

#[actix_web::test]
async fn login_failures_share_one_message() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({"name": "frank", "password": "right"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for body in [
        json!({"name": "frank", "password": "wrong"}),
        json!({"name": "nobody", "password": "right"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(body)
            .to_request();
        let (status, body) = status_and_body(test::call_service(&app, req).await).await;
        assert_error(status, &body, StatusCode::UNAUTHORIZED, "Invalid name or password");
    }
    Ok(())
}

#[actix_web::test]
async fn signout_expires_cookie() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post().uri("/auth/signout/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "Authorization")
        .expect("signout should clear the Authorization cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Signed out");
    Ok(())
}

#[actix_web::test]
async fn auth_routes_need_no_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await?;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({"name": "ghost", "password": "pw"}))
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await).await;
    // A 401 here comes from the credentials check, not the authenticator
    assert_error(status, &body, StatusCode::UNAUTHORIZED, "Invalid name or password");
    Ok(())
}
