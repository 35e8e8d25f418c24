//! Role Repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashSet;

use crate::auth::permission_service::PermissionSource;
use crate::role::entity::AuthRole;
use crate::shared::error::Result;

pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &sqlx::postgres::PgRow) -> AuthRole {
        AuthRole {
            id: row.get("id"),
            code: row.get("code"),
            display_name: row.get("display_name"),
            permissions: row.get("permissions"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Insert a role, returning its id. An existing code is left untouched
    /// and its id returned instead.
    pub async fn upsert(&self, role: &AuthRole) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO roles (code, display_name, permissions, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (code) DO UPDATE SET code = EXCLUDED.code \
             RETURNING id",
        )
        .bind(&role.code)
        .bind(&role.display_name)
        .bind(&role.permissions)
        .bind(role.created_at)
        .bind(role.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<AuthRole>> {
        let row = sqlx::query(
            "SELECT id, code, display_name, permissions, created_at, updated_at \
             FROM roles WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Self::parse_row(&r)))
    }

    pub async fn assign_to_user(&self, user_id: i64, role_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PermissionSource for PgRoleStore {
    /// All permissions granted to a user through its role assignments.
    async fn permissions_for_user(&self, user_id: i64) -> Result<HashSet<String>> {
        let rows = sqlx::query(
            "SELECT r.permissions FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut permissions = HashSet::new();
        for row in rows {
            let granted: Vec<String> = row.get("permissions");
            permissions.extend(granted);
        }
        Ok(permissions)
    }
}
