//! Process configuration, read once at startup.

use std::env;
use std::time::Duration;

use crate::auth::TokenKey;
use crate::config::db::database_url_from;
use crate::error::AppError;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://127.0.0.1",
    "https://localhost",
    "https://127.0.0.1",
];

/// How the CORS policy treats the `Origin` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsMode {
    /// Only origins starting with one of these prefixes are admitted.
    AllowList(Vec<String>),
    /// Any origin is admitted and answered with `*`.
    AllowAll,
}

impl CorsMode {
    pub fn default_allow_list() -> Self {
        Self::AllowList(
            DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub token_key: TokenKey,
    pub cors: CorsMode,
    pub database_url: String,
    pub db_timeout: Duration,
    pub shutdown_grace_secs: u64,
}

impl AppConfig {
    /// Load `.env` when present, then read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        // A missing .env file is normal outside local development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BLOG_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("BLOG_PORT", lookup("BLOG_PORT"), 8080u16)?;

        let key_hex = lookup("TOKEN_KEY_HEX").ok_or_else(|| {
            AppError::config("Required environment variable 'TOKEN_KEY_HEX' is not set")
        })?;
        let token_key = TokenKey::from_hex(&key_hex)
            .map_err(|e| AppError::config(format!("TOKEN_KEY_HEX: {e}")))?;

        let cors = cors_mode(lookup("CORS_MODE"), lookup("CORS_ALLOWED_ORIGINS"))?;
        let database_url = database_url_from(&lookup)?;
        let db_timeout_ms = parse_or("DB_TIMEOUT_MS", lookup("DB_TIMEOUT_MS"), 5000u64)?;
        let shutdown_grace_secs =
            parse_or("SHUTDOWN_GRACE_SECS", lookup("SHUTDOWN_GRACE_SECS"), 5u64)?;

        Ok(Self {
            host,
            port,
            token_key,
            cors,
            database_url,
            db_timeout: Duration::from_millis(db_timeout_ms),
            shutdown_grace_secs,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: '{v}'"))),
    }
}

fn cors_mode(mode: Option<String>, origins: Option<String>) -> Result<CorsMode, AppError> {
    match mode.as_deref().map(str::trim) {
        Some("allow_all") => Ok(CorsMode::AllowAll),
        None | Some("") | Some("allow_list") => {
            let prefixes: Vec<String> = origins
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != "null")
                .map(str::to_string)
                .collect();
            if prefixes.is_empty() {
                Ok(CorsMode::default_allow_list())
            } else {
                Ok(CorsMode::AllowList(prefixes))
            }
        }
        Some(other) => Err(AppError::config(format!(
            "CORS_MODE must be 'allow_list' or 'allow_all', got '{other}'"
        ))),
    }
}
