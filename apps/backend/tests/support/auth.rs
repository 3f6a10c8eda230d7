//! Token helpers for tests.

use std::time::{Duration, SystemTime};

use blog_backend::auth::token::{self, TOKEN_TTL_SECS};
use blog_backend::state::security_config::SecurityConfig;

pub fn mint_test_token(user_id: i64, sec: &SecurityConfig) -> String {
    token::issue(&sec.token_key, user_id, SystemTime::now()).expect("should mint token")
}

/// Full `Authorization` value, `Bearer` prefix included.
pub fn bearer_header(user_id: i64, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(user_id, sec))
}

/// Token issued long enough ago that it has already expired.
pub fn mint_expired_token(user_id: i64, sec: &SecurityConfig) -> String {
    let issued = SystemTime::now()
        .checked_sub(Duration::from_secs(TOKEN_TTL_SECS as u64 + 3600))
        .expect("clock should allow subtraction");
    token::issue(&sec.token_key, user_id, issued).expect("should mint expired token")
}
