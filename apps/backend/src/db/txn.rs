use std::future::Future;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::warn;

use crate::errors::domain::DomainError;

/// Commit on `Ok`, roll back on `Err`, preserving the original error.
pub async fn finish<R>(
    txn: DatabaseTransaction,
    out: Result<R, DomainError>,
) -> Result<R, DomainError> {
    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; the caller sees the original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Run `f` inside a fresh transaction on `db`.
pub async fn with_txn<R, F, Fut>(db: &DatabaseConnection, f: F) -> Result<R, DomainError>
where
    F: FnOnce(DatabaseTransaction) -> Fut,
    Fut: Future<Output = (DatabaseTransaction, Result<R, DomainError>)>,
{
    let txn = db.begin().await?;
    let (txn, out) = f(txn).await;
    finish(txn, out).await
}
