use std::time::Duration;

use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::{AppState, DEFAULT_DB_TIMEOUT};
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_url: Option<String>,
    db_timeout: Duration,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            db_url: None,
            db_timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    pub fn with_db(mut self, url: impl Into<String>) -> Self {
        self.db_url = Some(url.into());
        self
    }

    /// Shorthand for a migrated, single-connection in-memory SQLite database.
    pub fn with_memory_db(self) -> Self {
        self.with_db("sqlite::memory:")
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_db_timeout(mut self, timeout: Duration) -> Self {
        self.db_timeout = timeout;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = match self.db_url {
            // single entrypoint: connect + migrate
            Some(url) => {
                let conn = bootstrap_db(&url, self.db_timeout).await?;
                AppState::new(conn, self.security_config)
            }
            None => AppState::new_without_db(self.security_config),
        };
        Ok(state.with_db_timeout(self.db_timeout))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
