//! Sign-up and login.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token;
use crate::entities::users;
use crate::error::AppError;
use crate::repos::users::{self as users_repo, UserCreate};
use crate::state::security_config::SecurityConfig;
use crate::validation::Violations;

/// Reason returned for both unknown names and wrong passwords.
pub const BAD_CREDENTIALS: &str = "Invalid name or password";

/// New accounts start with age 1 unless one is supplied.
const DEFAULT_AGE: i32 = 1;

pub async fn signup<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    password: String,
    age: Option<i32>,
) -> Result<users::Model, AppError> {
    let mut v = Violations::new();
    v.user_name(&name).password(&password);
    if let Some(age) = age {
        v.age(age);
    }
    v.into_result()?;

    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))??;

    let user = users_repo::create_user(
        conn,
        UserCreate::new(name, hash).with_age(age.unwrap_or(DEFAULT_AGE)),
    )
    .await?;

    info!(user_id = user.id, "user signed up");
    Ok(user)
}

/// Verify credentials and mint a bearer token.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    name: &str,
    password: String,
) -> Result<String, AppError> {
    let Some(user) = users_repo::find_user_by_name(conn, name).await? else {
        warn!("login for unknown user");
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("verify task failed: {e}")))?;
    if !ok {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    }

    let token = token::issue(&security.token_key, user.id, SystemTime::now())?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}
