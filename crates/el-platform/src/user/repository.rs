//! User Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use sqlx::{PgPool, Row};

use crate::resource::ResourceStore;
use crate::shared::error::Result;
use crate::user::entity::User;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &sqlx::postgres::PgRow) -> User {
        let deleted_at: Option<DateTime<Utc>> = row.get("deleted_at");
        let purge_after: Option<DateTime<Utc>> = row.get("purge_after");

        User {
            id: row.get("id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            active: row.get("active"),
            lifecycle: Lifecycle::from_columns(deleted_at, purge_after),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, display_name, active, deleted_at, purge_after, created_at, updated_at \
             FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Self::parse_row(&r)))
    }
}

#[async_trait]
impl ResourceStore<User> for PgUserStore {
    async fn insert(&self, entity: &mut User) -> Result<()> {
        let (deleted_at, purge_after) = entity.lifecycle.columns();
        let row = sqlx::query(
            "INSERT INTO users (email, display_name, active, deleted_at, purge_after, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&entity.email)
        .bind(&entity.display_name)
        .bind(entity.active)
        .bind(deleted_at)
        .bind(purge_after)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .fetch_one(&self.pool)
        .await?;

        entity.id = row.get("id");
        Ok(())
    }

    async fn find_active(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, display_name, active, deleted_at, purge_after, created_at, updated_at \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Self::parse_row(&r)))
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, email, display_name, active, deleted_at, purge_after, created_at, updated_at \
             FROM users WHERE deleted_at IS NULL ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn save(&self, entity: &User) -> Result<()> {
        let (deleted_at, purge_after) = entity.lifecycle.columns();
        sqlx::query(
            "UPDATE users SET email = $1, display_name = $2, active = $3, \
             deleted_at = $4, purge_after = $5, updated_at = $6 WHERE id = $7",
        )
        .bind(&entity.email)
        .bind(&entity.display_name)
        .bind(entity.active)
        .bind(deleted_at)
        .bind(purge_after)
        .bind(entity.updated_at)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
