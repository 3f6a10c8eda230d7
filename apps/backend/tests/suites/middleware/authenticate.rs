use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, HttpResponse};
use backend_test_support::assert_error;
use blog_backend::middleware::{compose, Authenticator};
use blog_backend::state::security_config::SecurityConfig;
use blog_backend::{AppState, CurrentUser};
use serde_json::json;

use crate::common::status_and_body;
use crate::support::auth::{bearer_header, mint_expired_token};
use crate::support::factory::create_test_user;
use crate::support::{build_test_state, create_test_app};

/// `/api/whoami` behind the authenticator, counting handler invocations.
fn protected_routes(counter: Arc<AtomicUsize>) -> impl Fn(&mut web::ServiceConfig) + Send + Sync {
    move |cfg| {
        let counter = Arc::clone(&counter);
        cfg.service(
            web::scope("/api")
                .wrap(compose(vec![Arc::new(Authenticator)]))
                .route(
                    "/whoami",
                    web::get().to(move |current: CurrentUser| {
                        let counter = Arc::clone(&counter);
                        async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            HttpResponse::Ok().json(json!({
                                "id": current.id(),
                                "name": current.0.name,
                            }))
                        }
                    }),
                ),
        );
    }
}

async fn rejected_with(
    state: AppState,
    authorization: Option<String>,
    expected_status: StatusCode,
    expected: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let counter = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(state)
        .with_routes(protected_routes(Arc::clone(&counter)))
        .build()
        .await?;

    let mut req = test::TestRequest::get().uri("/api/whoami");
    if let Some(value) = authorization {
        req = req.insert_header((header::AUTHORIZATION, value));
    }
    let resp = test::call_service(&app, req.to_request()).await;
    if expected_status == StatusCode::UNAUTHORIZED {
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
    let (status, body) = status_and_body(resp).await;

    assert_error(status, &body, expected_status, expected);
    assert_eq!(counter.load(Ordering::SeqCst), 0, "handler must not run");
    Ok(())
}

#[actix_web::test]
async fn missing_header_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    rejected_with(state, None, StatusCode::UNAUTHORIZED, "Authorization header missing").await
}

#[actix_web::test]
async fn non_bearer_scheme_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    rejected_with(
        state,
        Some("Token abc".to_string()),
        StatusCode::UNAUTHORIZED,
        "Invalid token",
    )
    .await
}

#[actix_web::test]
async fn bare_bearer_prefix_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    rejected_with(
        state,
        Some("Bearer ".to_string()),
        StatusCode::UNAUTHORIZED,
        "Invalid token",
    )
    .await
}

#[actix_web::test]
async fn token_from_another_key_is_invalid() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = create_test_user(&state, "mallory").await;
    let other = SecurityConfig::new(blog_backend::TokenKey::new([7u8; 32]));
    rejected_with(
        state,
        Some(bearer_header(user.id, &other)),
        StatusCode::UNAUTHORIZED,
        "Invalid token",
    )
    .await
}

#[actix_web::test]
async fn expired_token_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = create_test_user(&state, "late").await;
    let token = mint_expired_token(user.id, &state.security);
    rejected_with(
        state,
        Some(format!("Bearer {token}")),
        StatusCode::UNAUTHORIZED,
        "Token expired",
    )
    .await
}

#[actix_web::test]
async fn unknown_user_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let auth_value = bearer_header(987_654, &state.security);
    rejected_with(state, Some(auth_value), StatusCode::UNAUTHORIZED, "User not found").await
}

#[actix_web::test]
async fn missing_database_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new_without_db(SecurityConfig::for_tests())
        .with_db_timeout(Duration::from_millis(50));
    let auth_value = bearer_header(1, &state.security);
    rejected_with(
        state,
        Some(auth_value),
        StatusCode::SERVICE_UNAVAILABLE,
        "Service temporarily unavailable",
    )
    .await
}

#[actix_web::test]
async fn valid_token_reaches_handler_with_user() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = create_test_user(&state, "alice").await;
    let auth_value = bearer_header(user.id, &state.security);

    let counter = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(state)
        .with_routes(protected_routes(Arc::clone(&counter)))
        .build()
        .await?;

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header((header::AUTHORIZATION, auth_value))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["name"], user.name);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    Ok(())
}
