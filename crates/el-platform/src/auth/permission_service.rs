//! Permission Resolution
//!
//! Permission-based access control with role resolution. Permissions are
//! `resource:action` strings granted through roles; `resource:*` and the
//! superuser `*:*` wildcards are honoured at check time.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::role::entity::permissions;
use crate::shared::error::Result;

/// Source of a user's granted permission set. Backed by the role store in
/// production; tests substitute a stub.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn permissions_for_user(&self, user_id: i64) -> Result<HashSet<String>>;
}

/// Check a required permission against a granted set.
pub fn has_permission(granted: &HashSet<String>, required: &str) -> bool {
    if granted.contains(required) {
        return true;
    }

    if let Some((resource, _)) = required.split_once(':') {
        if granted.contains(&format!("{}:*", resource)) {
            return true;
        }
        if granted.contains(permissions::ADMIN_ALL) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(perms: &[&str]) -> HashSet<String> {
        perms.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_direct_permission() {
        let set = granted(&["users:view"]);
        assert!(has_permission(&set, "users:view"));
        assert!(!has_permission(&set, "users:delete"));
    }

    #[test]
    fn test_resource_wildcard() {
        let set = granted(&["users:*"]);
        assert!(has_permission(&set, "users:view"));
        assert!(has_permission(&set, "users:delete"));
        assert!(!has_permission(&set, "subscriptions:view"));
    }

    #[test]
    fn test_superuser_wildcard() {
        let set = granted(&["*:*"]);
        assert!(has_permission(&set, "users:view"));
        assert!(has_permission(&set, "subscriptions:delete"));
        assert!(has_permission(&set, "anything:everything"));
    }

    #[test]
    fn test_empty_set() {
        let set = granted(&[]);
        assert!(!has_permission(&set, "users:view"));
    }
}
