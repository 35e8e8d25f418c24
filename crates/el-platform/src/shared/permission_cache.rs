//! Per-User Permission Cache
//!
//! Read-through cache of `user id → granted permission set` with a fixed TTL
//! and no active invalidation: a permission revoked at the source keeps
//! passing here until the entry expires. Concurrent misses for the same user
//! may each hit the backing source; the last write wins.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::permission_service::PermissionSource;
use crate::shared::error::Result;

/// How long a cached permission set is served before a reload.
pub const PERMISSION_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

struct CacheEntry {
    permissions: Arc<HashSet<String>>,
    expires_at: Instant,
}

pub struct PermissionCache {
    entries: DashMap<i64, CacheEntry>,
    source: Arc<dyn PermissionSource>,
    ttl: Duration,
}

impl PermissionCache {
    pub fn new(source: Arc<dyn PermissionSource>) -> Self {
        Self::with_ttl(source, PERMISSION_CACHE_TTL)
    }

    pub fn with_ttl(source: Arc<dyn PermissionSource>, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            source,
            ttl,
        }
    }

    /// Granted permissions for a user, served from cache while fresh.
    pub async fn permissions_for(&self, user_id: i64) -> Result<Arc<HashSet<String>>> {
        if let Some(entry) = self.entries.get(&user_id) {
            if entry.expires_at > Instant::now() {
                return Ok(entry.permissions.clone());
            }
        }

        let permissions = Arc::new(self.source.permissions_for_user(user_id).await?);
        self.entries.insert(
            user_id,
            CacheEntry {
                permissions: permissions.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub source whose grant set can be swapped out mid-test.
    struct StubSource {
        grants: Mutex<HashSet<String>>,
        loads: Mutex<u32>,
    }

    impl StubSource {
        fn new(perms: &[&str]) -> Self {
            Self {
                grants: Mutex::new(perms.iter().map(|p| p.to_string()).collect()),
                loads: Mutex::new(0),
            }
        }

        fn revoke_all(&self) {
            self.grants.lock().unwrap().clear();
        }

        fn load_count(&self) -> u32 {
            *self.loads.lock().unwrap()
        }
    }

    #[async_trait]
    impl PermissionSource for StubSource {
        async fn permissions_for_user(&self, _user_id: i64) -> Result<HashSet<String>> {
            *self.loads.lock().unwrap() += 1;
            Ok(self.grants.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_cached_set_served_without_reload() {
        let source = Arc::new(StubSource::new(&["users:view"]));
        let cache = PermissionCache::new(source.clone());

        cache.permissions_for(1).await.unwrap();
        cache.permissions_for(1).await.unwrap();
        assert_eq!(source.load_count(), 1);
    }

    #[tokio::test]
    async fn test_revocation_visible_only_after_ttl() {
        let source = Arc::new(StubSource::new(&["users:view"]));
        let cache = PermissionCache::with_ttl(source.clone(), Duration::from_millis(40));

        let first = cache.permissions_for(1).await.unwrap();
        assert!(first.contains("users:view"));

        // Revoked at the source, but the stale entry keeps serving
        source.revoke_all();
        let stale = cache.permissions_for(1).await.unwrap();
        assert!(stale.contains("users:view"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        let refreshed = cache.permissions_for(1).await.unwrap();
        assert!(refreshed.is_empty());
    }

    #[tokio::test]
    async fn test_entries_are_per_user() {
        let source = Arc::new(StubSource::new(&["users:view"]));
        let cache = PermissionCache::new(source.clone());

        cache.permissions_for(1).await.unwrap();
        cache.permissions_for(2).await.unwrap();
        assert_eq!(source.load_count(), 2);
    }
}
