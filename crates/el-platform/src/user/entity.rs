//! User Entity
//!
//! Root aggregate of the platform: subscriptions and refresh tokens hang off
//! a user, and deleting one cascades to them.

use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use serde::{Deserialize, Serialize};

use crate::resource::{Exportable, FieldSpec, Resource};
use crate::shared::cascade::{CascadeRoot, CascadeRule};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub active: bool,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
}

/// Partial update request; unset fields leave the entity untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub active: Option<bool>,
}

/// User response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for User {
    const NAME: &'static str = "users";

    type Create = CreateUser;
    type Update = UpdateUser;
    type Details = UserDetails;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    fn from_create(dto: CreateUser, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            email: dto.email,
            display_name: dto.display_name,
            active: true,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, dto: UpdateUser, now: DateTime<Utc>) {
        if let Some(email) = dto.email {
            self.email = email;
        }
        if let Some(display_name) = dto.display_name {
            self.display_name = display_name;
        }
        if let Some(active) = dto.active {
            self.active = active;
        }
        self.updated_at = now;
    }

    fn details(&self) -> UserDetails {
        UserDetails {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl CascadeRoot for User {
    const TABLE: &'static str = "users";
    const CASCADE_RULES: &'static [CascadeRule] = &[
        CascadeRule {
            table: "subscriptions",
            fk_column: "user_id",
        },
        CascadeRule {
            table: "refresh_tokens",
            fk_column: "user_id",
        },
    ];
}

impl Exportable for UserDetails {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            name: "id",
            get: |u| u.id.to_string(),
        },
        FieldSpec {
            name: "email",
            get: |u| u.email.clone(),
        },
        FieldSpec {
            name: "displayName",
            get: |u| u.display_name.clone(),
        },
        FieldSpec {
            name: "active",
            get: |u| u.active.to_string(),
        },
        FieldSpec {
            name: "createdAt",
            get: |u| u.created_at.to_rfc3339(),
        },
        FieldSpec {
            name: "updatedAt",
            get: |u| u.updated_at.to_rfc3339(),
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_create_starts_active() {
        let user = User::from_create(
            CreateUser {
                email: "a@example.com".to_string(),
                display_name: "A".to_string(),
            },
            Utc::now(),
        );
        assert!(user.active);
        assert!(user.lifecycle.is_active());
    }

    #[test]
    fn test_apply_update_patches_only_set_fields() {
        let mut user = User::from_create(
            CreateUser {
                email: "a@example.com".to_string(),
                display_name: "A".to_string(),
            },
            Utc::now(),
        );

        user.apply_update(
            UpdateUser {
                email: None,
                display_name: Some("B".to_string()),
                active: Some(false),
            },
            Utc::now(),
        );

        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.display_name, "B");
        assert!(!user.active);
    }
}
