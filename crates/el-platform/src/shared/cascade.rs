//! Cascade Soft-Delete & Tombstone Sweep
//!
//! Soft-deleting a root entity must take its dependent rows down with it.
//! Each root declares its dependents as static table/foreign-key rules; the
//! cascade runs in a single transaction so a mid-cascade failure leaves no
//! half-deleted state.
//!
//! The companion sweep hard-deletes rows whose retention window has elapsed,
//! completing the two-phase delete.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::resource::Resource;
use crate::shared::error::Result;

/// One dependent-table rule of a cascade root.
#[derive(Debug, Clone, Copy)]
pub struct CascadeRule {
    pub table: &'static str,
    pub fk_column: &'static str,
}

/// A resource whose deletion cascades to dependent rows.
pub trait CascadeRoot: Resource {
    const TABLE: &'static str;
    const CASCADE_RULES: &'static [CascadeRule];
}

/// Tables holding tombstoned rows, ordered children before roots so the
/// sweep never violates foreign keys.
pub const TOMBSTONE_TABLES: &[&str] = &["refresh_tokens", "subscriptions", "users"];

pub struct CascadeDeleteService {
    pool: PgPool,
    retention: Duration,
}

impl CascadeDeleteService {
    pub fn new(pool: PgPool, retention_days: i64) -> Self {
        Self {
            pool,
            retention: Duration::days(retention_days),
        }
    }

    /// Tombstone a root entity and all of its dependents in one transaction.
    ///
    /// Returns `false` without touching anything when the root is missing or
    /// already tombstoned (idempotent); persistence errors propagate.
    pub async fn soft_delete_cascade<R: CascadeRoot>(&self, id: i64) -> Result<bool> {
        let deleted_at = Utc::now();
        let purge_after = deleted_at + self.retention;

        let mut tx = self.pool.begin().await?;

        let root_update = format!(
            "UPDATE {} SET deleted_at = $1, purge_after = $2, updated_at = $1 \
             WHERE id = $3 AND deleted_at IS NULL",
            R::TABLE
        );
        let updated = sqlx::query(&root_update)
            .bind(deleted_at)
            .bind(purge_after)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            debug!(resource = R::NAME, id, "cascade skipped, root not active");
            return Ok(false);
        }

        for rule in R::CASCADE_RULES {
            let dependent_update = format!(
                "UPDATE {} SET deleted_at = $1, purge_after = $2, updated_at = $1 \
                 WHERE {} = $3 AND deleted_at IS NULL",
                rule.table, rule.fk_column
            );
            let dependents = sqlx::query(&dependent_update)
                .bind(deleted_at)
                .bind(purge_after)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            debug!(
                resource = R::NAME,
                id,
                table = rule.table,
                count = dependents,
                "cascade tombstoned dependents"
            );
        }

        tx.commit().await?;
        info!(resource = R::NAME, id, "cascade soft-delete committed");
        Ok(true)
    }

    /// Physically remove every tombstoned row whose retention window has
    /// elapsed. Returns the total number of purged rows.
    pub async fn purge_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let mut purged = 0u64;

        for table in TOMBSTONE_TABLES {
            let delete = format!(
                "DELETE FROM {} WHERE purge_after IS NOT NULL AND purge_after < $1",
                table
            );
            let removed = sqlx::query(&delete)
                .bind(now)
                .execute(&self.pool)
                .await?
                .rows_affected();
            if removed > 0 {
                info!(table, count = removed, "purged expired tombstones");
            }
            purged += removed;
        }

        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::entity::User;

    #[test]
    fn test_user_cascade_rules_cover_dependents() {
        let tables: Vec<&str> = User::CASCADE_RULES.iter().map(|r| r.table).collect();
        assert!(tables.contains(&"subscriptions"));
        assert!(tables.contains(&"refresh_tokens"));
    }

    #[test]
    fn test_sweep_order_children_first() {
        let users_pos = TOMBSTONE_TABLES.iter().position(|t| *t == "users").unwrap();
        for rule in User::CASCADE_RULES {
            let child_pos = TOMBSTONE_TABLES
                .iter()
                .position(|t| *t == rule.table)
                .unwrap();
            assert!(child_pos < users_pos, "{} must purge before users", rule.table);
        }
    }
}
