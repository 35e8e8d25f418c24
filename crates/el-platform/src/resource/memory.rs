//! In-memory resource store for tests and local development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::shared::error::Result;

use super::entity::Resource;
use super::store::ResourceStore;

/// Map-backed [`ResourceStore`]. Tombstoned rows stay in the map, matching
/// the physical-row behaviour of the Postgres stores.
pub struct MemoryStore<R> {
    rows: Mutex<BTreeMap<i64, R>>,
    next_id: AtomicI64,
}

impl<R: Resource + Clone> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Fetch a row regardless of lifecycle state. Lets tests observe that a
    /// tombstoned row still physically exists.
    pub fn raw_get(&self, id: i64) -> Option<R> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

impl<R: Resource + Clone> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource + Clone> ResourceStore<R> for MemoryStore<R> {
    async fn insert(&self, entity: &mut R) -> Result<()> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        entity.set_id(id);
        self.rows.lock().unwrap().insert(id, entity.clone());
        Ok(())
    }

    async fn find_active(&self, id: i64) -> Result<Option<R>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.lifecycle().is_active())
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<R>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.lifecycle().is_active())
            .cloned()
            .collect())
    }

    async fn save(&self, entity: &R) -> Result<()> {
        self.rows.lock().unwrap().insert(entity.id(), entity.clone());
        Ok(())
    }
}
