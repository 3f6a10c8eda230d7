use std::time::Duration;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::error::AppError;

pub const DEFAULT_DB_TIMEOUT: Duration = Duration::from_millis(5000);

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Token key
    pub security: SecurityConfig,
    /// Upper bound for database calls made on the authentication path
    pub db_timeout: Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            db_timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            db_timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    pub fn with_db_timeout(mut self, timeout: Duration) -> Self {
        self.db_timeout = timeout;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// Database handle, or `DbUnavailable` when the state was built without one.
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::db_unavailable("Database not configured"))
    }
}
