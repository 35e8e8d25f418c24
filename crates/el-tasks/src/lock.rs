//! Distributed Lock Service
//!
//! Cross-process mutual exclusion over Postgres session-level advisory
//! locks. `try_lock` is non-blocking: it returns `None` immediately when the
//! lock is held elsewhere. The returned guard owns a dedicated database
//! connection; the lock is released by `release()`, or by the session
//! closing when the guard is dropped on any exit path.
//!
//! A blocking acquire is deliberately not offered; callers that need to wait
//! retry on their own interval.

use sha2::{Digest, Sha256};
use sqlx::{Connection, PgConnection, PgPool};
use tracing::{debug, warn};

use crate::TaskError;

/// Map a lock name onto the advisory-lock key space: first 8 bytes of the
/// SHA-256 digest, big-endian.
pub(crate) fn advisory_key(name: &str) -> i64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

pub struct PgLockService {
    pool: PgPool,
}

impl PgLockService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Try to acquire the named lock without waiting.
    ///
    /// Returns `None` when another session holds it. The guard must be kept
    /// alive for the duration of the critical section.
    pub async fn try_lock(&self, name: &str) -> Result<Option<LockGuard>, TaskError> {
        let key = advisory_key(name);

        // The lock is scoped to a session, so the guard needs a connection
        // of its own rather than one the pool may hand to other callers.
        let mut conn = self.pool.acquire().await?.detach();

        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(key)
            .fetch_one(&mut conn)
            .await?;

        if acquired {
            debug!(lock = name, key, "advisory lock acquired");
            Ok(Some(LockGuard {
                conn: Some(conn),
                key,
                name: name.to_string(),
            }))
        } else {
            debug!(lock = name, key, "advisory lock held elsewhere");
            let _ = conn.close().await;
            Ok(None)
        }
    }
}

/// Holder of an acquired advisory lock.
pub struct LockGuard {
    conn: Option<PgConnection>,
    key: i64,
    name: String,
}

impl LockGuard {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unlock and close the session gracefully.
    pub async fn release(mut self) -> Result<(), TaskError> {
        if let Some(mut conn) = self.conn.take() {
            sqlx::query("SELECT pg_advisory_unlock($1)")
                .bind(self.key)
                .execute(&mut conn)
                .await?;
            let _ = conn.close().await;
            debug!(lock = %self.name, "advisory lock released");
        }
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Dropping the connection terminates the session, which releases the
        // advisory lock server-side even on exceptional exit.
        if let Some(conn) = self.conn.take() {
            warn!(lock = %self.name, "lock guard dropped without release; closing session");
            drop(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(advisory_key("el:task-runner"), advisory_key("el:task-runner"));
    }

    #[test]
    fn test_distinct_names_get_distinct_keys() {
        assert_ne!(advisory_key("el:task-runner"), advisory_key("el:other"));
        assert_ne!(advisory_key("a"), advisory_key("b"));
    }
}
