//! Refresh Token Repository

use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use sqlx::{PgPool, Row};

use crate::refresh_token::entity::RefreshToken;
use crate::shared::error::Result;

pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token: &mut RefreshToken) -> Result<()> {
        let (deleted_at, purge_after) = token.lifecycle.columns();
        let row = sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at, deleted_at, purge_after, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(deleted_at)
        .bind(purge_after)
        .bind(token.created_at)
        .fetch_one(&self.pool)
        .await?;

        token.id = row.get("id");
        Ok(())
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let row = sqlx::query(
            "SELECT id, user_id, token_hash, expires_at, deleted_at, purge_after, created_at \
             FROM refresh_tokens WHERE token_hash = $1 AND deleted_at IS NULL",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| {
            let deleted_at: Option<DateTime<Utc>> = r.get("deleted_at");
            let purge_after: Option<DateTime<Utc>> = r.get("purge_after");
            RefreshToken {
                id: r.get("id"),
                user_id: r.get("user_id"),
                token_hash: r.get("token_hash"),
                expires_at: r.get("expires_at"),
                lifecycle: Lifecycle::from_columns(deleted_at, purge_after),
                created_at: r.get("created_at"),
            }
        }))
    }

    /// Remove tokens past their expiry. Returns the number of rows removed.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed)
    }
}
