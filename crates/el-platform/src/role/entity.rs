//! Role Entity & Permission Catalog
//!
//! Authorization model: a role is a named bundle of `resource:action`
//! permission strings assigned to users. Permission checks honour the
//! `resource:*` and superuser `*:*` wildcards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known permission strings.
pub mod permissions {
    /// Superuser wildcard
    pub const ADMIN_ALL: &str = "*:*";

    pub mod users {
        pub const VIEW: &str = "users:view";
        pub const CREATE: &str = "users:create";
        pub const UPDATE: &str = "users:update";
        pub const DELETE: &str = "users:delete";
        pub const EXPORT: &str = "users:export";
    }

    pub mod subscriptions {
        pub const VIEW: &str = "subscriptions:view";
        pub const CREATE: &str = "subscriptions:create";
        pub const UPDATE: &str = "subscriptions:update";
        pub const DELETE: &str = "subscriptions:delete";
        pub const EXPORT: &str = "subscriptions:export";
    }

    pub mod payments {
        pub const CREATE: &str = "payments:create";
    }
}

/// Role definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRole {
    pub id: i64,

    /// Role code, unique ("platform:admin")
    pub code: String,

    /// Human-readable display name
    pub display_name: String,

    /// Permissions granted by this role
    pub permissions: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthRole {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            code: code.into(),
            display_name: display_name.into(),
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn with_permissions(
        mut self,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        for p in permissions {
            self.permissions.push(p.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_builder() {
        let role = AuthRole::new("platform:operator", "Operator")
            .with_permission(permissions::users::VIEW)
            .with_permissions([
                permissions::subscriptions::VIEW,
                permissions::subscriptions::UPDATE,
            ]);

        assert_eq!(role.code, "platform:operator");
        assert_eq!(role.permissions.len(), 3);
    }
}
