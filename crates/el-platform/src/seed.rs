//! Development Data Seeder
//!
//! Seeds an admin role and principal so a fresh database is usable
//! immediately in dev mode. The issued bearer token is logged once at
//! startup.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::auth::AuthService;
use crate::resource::{Resource, ResourceStore};
use crate::role::entity::{permissions, AuthRole};
use crate::role::repository::PgRoleStore;
use crate::shared::error::Result;
use crate::user::entity::{CreateUser, User};
use crate::user::repository::PgUserStore;

const ADMIN_EMAIL: &str = "admin@entrelaunch.local";

pub struct DevSeeder {
    pool: PgPool,
}

impl DevSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the admin role and principal exist; returns a bearer token for
    /// the admin.
    pub async fn seed(&self, auth_service: &AuthService) -> Result<String> {
        let roles = PgRoleStore::new(self.pool.clone());
        let users = PgUserStore::new(self.pool.clone());

        let role = AuthRole::new("platform:admin", "Platform Administrator")
            .with_permission(permissions::ADMIN_ALL);
        let role_id = roles.upsert(&role).await?;

        let admin = match users.find_by_email(ADMIN_EMAIL).await? {
            Some(user) => user,
            None => {
                let mut user = User::from_create(
                    CreateUser {
                        email: ADMIN_EMAIL.to_string(),
                        display_name: "Administrator".to_string(),
                    },
                    Utc::now(),
                );
                users.insert(&mut user).await?;
                user
            }
        };

        roles.assign_to_user(admin.id, role_id).await?;

        let token = auth_service.issue_token(admin.id, Some(&admin.email))?;
        info!(user_id = admin.id, email = ADMIN_EMAIL, "dev admin seeded");
        Ok(token)
    }
}
