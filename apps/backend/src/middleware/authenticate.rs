//! Bearer-token authentication for the `/api` scope.
//!
//! On success the resolved user is stored in request extensions as
//! [`AuthenticatedUser`]; handlers read it through the `CurrentUser`
//! extractor. Every failure answers 401 (or 503 when the user lookup cannot
//! reach the database in time) without touching the downstream handler.

use std::time::SystemTime;

use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::{web, HttpMessage};
use tracing::{debug, warn};

use super::chain::{Middleware, MiddlewareFuture, Next};
use crate::auth::token;
use crate::entities::users;
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

pub const MISSING_HEADER: &str = "Authorization header missing";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const TOKEN_EXPIRED: &str = "Token expired";
pub const USER_NOT_FOUND: &str = "User not found";

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub users::Model);

#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticator;

/// Pull the token out of an `Authorization` value.
fn bearer_token(value: &str) -> Result<&str, AppError> {
    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized(INVALID_TOKEN)),
    }
}

/// Everything that can be checked without the database.
fn verify(state: &AppState, header_value: Option<&str>, now: SystemTime) -> Result<i64, AppError> {
    let value = header_value.ok_or_else(|| AppError::unauthorized(MISSING_HEADER))?;
    let raw = bearer_token(value)?;

    let claims = token::decode(&state.security.token_key, raw).map_err(|e| {
        debug!(error = %e, "token rejected");
        AppError::unauthorized(INVALID_TOKEN)
    })?;

    if claims.is_expired_at(now) {
        return Err(AppError::unauthorized(TOKEN_EXPIRED));
    }

    claims
        .user_id()
        .map_err(|e| AppError::unauthorized(e.to_string()))
}

async fn resolve_user(state: &AppState, user_id: i64) -> Result<users::Model, AppError> {
    let db = state.require_db()?;
    let lookup = users_repo::find_user_by_id(db, user_id);
    match tokio::time::timeout(state.db_timeout, lookup).await {
        Ok(found) => found?.ok_or_else(|| AppError::unauthorized(USER_NOT_FOUND)),
        Err(_) => {
            warn!(user_id, timeout_ms = state.db_timeout.as_millis() as u64, "user lookup timed out");
            Err(AppError::db_unavailable("user lookup timed out"))
        }
    }
}

impl Middleware for Authenticator {
    fn handle(&self, req: ServiceRequest, next: Next) -> MiddlewareFuture {
        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                return Ok(req.error_response(AppError::internal("AppState not available")));
            };

            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .map(|v| v.to_str().unwrap_or_default().to_owned());

            let user_id = match verify(&state, header_value.as_deref(), SystemTime::now()) {
                Ok(id) => id,
                Err(err) => {
                    debug!(url.path = %req.path(), reason = %err, "authentication failed");
                    return Ok(req.error_response(err));
                }
            };

            let user = match resolve_user(&state, user_id).await {
                Ok(user) => user,
                Err(err) => return Ok(req.error_response(err)),
            };

            req.extensions_mut().insert(AuthenticatedUser(user));
            next.run(req).await
        })
    }
}
