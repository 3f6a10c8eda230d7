use std::future::Future;
use std::time::Duration;

use migration::{count_applied_migrations, migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::redacted_url;
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all attempts are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn is_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:")
}

/// Open a pooled connection. Does NOT run any migrations.
///
/// In-memory SQLite is pinned to a single connection: every new connection
/// would otherwise see its own empty database.
pub async fn connect_db(url: &str, acquire_timeout: Duration) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(url.to_owned());
    opt.acquire_timeout(acquire_timeout).sqlx_logging(false);
    if url.contains(":memory:") {
        opt.min_connections(1).max_connections(1);
    } else if is_sqlite(url) {
        opt.max_connections(1);
    } else {
        opt.max_connections(16);
    }

    let safe_url = redacted_url(url);
    let attempts = if is_sqlite(url) { 1 } else { CONNECT_ATTEMPTS };

    let conn = retry_connection(
        || {
            let opt = opt.clone();
            async move {
                Database::connect(opt)
                    .await
                    .map_err(|e| AppError::db_unavailable(format!("connect failed: {e}")))
            }
        },
        attempts,
        CONNECT_INTERVAL_MS,
    )
    .await?;

    info!(database = %safe_url, "database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(url: &str, acquire_timeout: Duration) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(url, acquire_timeout).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migrations failed: {e}")))?;
    let applied = count_applied_migrations(&conn).await.unwrap_or(0);
    info!(applied, "schema ready");
    Ok(conn)
}
