//! Resource Store Seam
//!
//! Persistence boundary for the generic CRUD service. Aggregates provide a
//! Postgres implementation in their `repository` module; tests and local
//! development use the in-memory store from [`crate::resource::memory`].

use async_trait::async_trait;

use crate::shared::error::Result;

use super::entity::Resource;

#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Persist a new entity and assign its id.
    async fn insert(&self, entity: &mut R) -> Result<()>;

    /// Fetch one non-tombstoned entity by id.
    async fn find_active(&self, id: i64) -> Result<Option<R>>;

    /// Fetch all non-tombstoned entities.
    async fn list_active(&self) -> Result<Vec<R>>;

    /// Persist the current state of an existing entity.
    async fn save(&self, entity: &R) -> Result<()>;
}
