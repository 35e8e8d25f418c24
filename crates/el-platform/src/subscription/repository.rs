//! Subscription Repository

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use el_common::Lifecycle;
use sqlx::{PgPool, Row};

use crate::resource::ResourceStore;
use crate::shared::error::{PlatformError, Result};
use crate::subscription::entity::{Subscription, SubscriptionStatus};

pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &sqlx::postgres::PgRow) -> Result<Subscription> {
        let deleted_at: Option<DateTime<Utc>> = row.get("deleted_at");
        let purge_after: Option<DateTime<Utc>> = row.get("purge_after");
        let status: String = row.get("status");
        let status = SubscriptionStatus::parse(&status).ok_or_else(|| {
            PlatformError::internal(format!("unknown subscription status: {}", status))
        })?;

        Ok(Subscription {
            id: row.get("id"),
            user_id: row.get("user_id"),
            plan_code: row.get("plan_code"),
            status,
            expires_at: row.get("expires_at"),
            lifecycle: Lifecycle::from_columns(deleted_at, purge_after),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Flip lapsed Active subscriptions to Expired and tombstone them with
    /// the given retention window. Returns the number of affected rows.
    pub async fn expire_lapsed(&self, now: DateTime<Utc>, retention: Duration) -> Result<u64> {
        let purge_after = now + retention;
        let affected = sqlx::query(
            "UPDATE subscriptions SET status = 'EXPIRED', deleted_at = $1, purge_after = $2, updated_at = $1 \
             WHERE status = 'ACTIVE' AND expires_at IS NOT NULL AND expires_at < $1 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(purge_after)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected)
    }
}

#[async_trait]
impl ResourceStore<Subscription> for PgSubscriptionStore {
    async fn insert(&self, entity: &mut Subscription) -> Result<()> {
        let (deleted_at, purge_after) = entity.lifecycle.columns();
        let row = sqlx::query(
            "INSERT INTO subscriptions (user_id, plan_code, status, expires_at, deleted_at, purge_after, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(entity.user_id)
        .bind(&entity.plan_code)
        .bind(entity.status.as_str())
        .bind(entity.expires_at)
        .bind(deleted_at)
        .bind(purge_after)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await?;

        entity.id = row.get("id");
        Ok(())
    }

    async fn find_active(&self, id: i64) -> Result<Option<Subscription>> {
        let row = sqlx::query(
            "SELECT id, user_id, plan_code, status, expires_at, deleted_at, purge_after, created_at, updated_at \
             FROM subscriptions WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::parse_row(&r)).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Subscription>> {
        let rows = sqlx::query(
            "SELECT id, user_id, plan_code, status, expires_at, deleted_at, purge_after, created_at, updated_at \
             FROM subscriptions WHERE deleted_at IS NULL ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::parse_row).collect()
    }

    async fn save(&self, entity: &Subscription) -> Result<()> {
        let (deleted_at, purge_after) = entity.lifecycle.columns();
        sqlx::query(
            "UPDATE subscriptions SET plan_code = $1, status = $2, expires_at = $3, \
             deleted_at = $4, purge_after = $5, updated_at = $6 WHERE id = $7",
        )
        .bind(&entity.plan_code)
        .bind(entity.status.as_str())
        .bind(entity.expires_at)
        .bind(deleted_at)
        .bind(purge_after)
        .bind(entity.updated_at)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
