//! Database pool aliases and the transaction executor seam.
//!
//! The executor is the only place the core crate touches the connection type:
//! services compose their multi-entity mutations into one closure, and the
//! executor runs that closure inside a single SQLite transaction.

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::errors::{DatabaseError, Error, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Trait for executing database transactions.
///
/// Every composite mutation in this crate (ledger mutation + recompute +
/// milestone flags + shield awards, end-of-day streak processing, lock/unlock
/// pairs) goes through `execute` so that all derived state commits together
/// or not at all.
pub trait DbTransactionExecutor {
    /// Execute operations within a transaction and return the result.
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, E>,
        E: Into<Error>;
}

/// Implementation of DbTransactionExecutor for DbPool.
///
/// Uses an immediate transaction, which takes SQLite's write lock at BEGIN:
/// concurrent read-modify-write sequences on the same goal or shield counter
/// serialize instead of losing updates. Writer contention is absorbed by the
/// connection's busy timeout.
impl DbTransactionExecutor for DbPool {
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, E>,
        E: Into<Error>,
    {
        let mut conn = self
            .get()
            .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;

        conn.immediate_transaction::<_, Error, _>(|tx_conn| f(tx_conn).map_err(Into::into))
    }
}

/// Implementation of DbTransactionExecutor for Arc<DbPool>.
impl DbTransactionExecutor for Arc<DbPool> {
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, E>,
        E: Into<Error>,
    {
        self.as_ref().execute(f)
    }
}
