//! Account endpoints under `/auth`. These run without the authenticator.

use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime as CookieTime};
use actix_web::cookie::Cookie;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth as auth_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

async fn signup(
    body: ValidatedJson<SignupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let SignupRequest {
        name,
        password,
        age,
    } = body.into_inner();

    let user = auth_service::signup(db, name, password, age).await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created",
        user_id: user.id,
    }))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let LoginRequest { name, password } = body.into_inner();

    let token = auth_service::login(db, &app_state.security, &name, password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// Tokens are stateless, so signing out only clears any cookie copy on the client.
async fn signout() -> HttpResponse {
    let cleared = Cookie::build("Authorization", "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .expires(CookieTime::UNIX_EPOCH)
        .finish();

    HttpResponse::Ok()
        .cookie(cleared)
        .json(Message::new("Signed out"))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/", web::post().to(signup))
        .route("/login/", web::post().to(login))
        .route("/signout/", web::post().to(signout));
}
