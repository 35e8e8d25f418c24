//! Generic CRUD Service
//!
//! One service implementation covers every resource. Expected failures
//! (not-found, already deleted) come back as envelope failures; only
//! infrastructure problems surface as errors, which the controller boundary
//! converts to HTTP 500.

use chrono::{Duration, Utc};
use el_common::{Lifecycle, ServiceResult};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use crate::shared::error::Result;

use super::entity::Resource;
use super::store::ResourceStore;

pub struct CrudService<R: Resource, S: ResourceStore<R>> {
    store: Arc<S>,
    retention: Duration,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: ResourceStore<R>> CrudService<R, S> {
    pub fn new(store: Arc<S>, retention_days: i64) -> Self {
        Self {
            store,
            retention: Duration::days(retention_days),
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create a new entity from its DTO. Always inserts; repeated calls with
    /// identical payloads produce distinct rows.
    pub async fn create(&self, dto: R::Create) -> Result<ServiceResult<R::Details>> {
        let mut entity = R::from_create(dto, Utc::now());
        self.store.insert(&mut entity).await?;
        debug!(resource = R::NAME, id = entity.id(), "created");
        Ok(ServiceResult::ok(entity.details()))
    }

    pub async fn get_one(&self, id: i64) -> Result<ServiceResult<R::Details>> {
        match self.store.find_active(id).await? {
            Some(entity) => Ok(ServiceResult::ok(entity.details())),
            None => Ok(Self::not_found(id)),
        }
    }

    /// All non-tombstoned rows. An empty list is a success, not a failure.
    pub async fn get_all(&self) -> Result<ServiceResult<Vec<R::Details>>> {
        let entities = self.store.list_active().await?;
        Ok(ServiceResult::ok(
            entities.iter().map(|e| e.details()).collect(),
        ))
    }

    /// Partial update: fields left unset in the DTO never overwrite.
    pub async fn update(&self, id: i64, dto: R::Update) -> Result<ServiceResult<R::Details>> {
        let Some(mut entity) = self.store.find_active(id).await? else {
            return Ok(Self::not_found(id));
        };

        entity.apply_update(dto, Utc::now());
        self.store.save(&entity).await?;
        Ok(ServiceResult::ok(entity.details()))
    }

    /// Tombstone the entity with the configured retention window. The row is
    /// not physically removed; the sweep task purges it after the window.
    /// Fails if the entity is missing or already tombstoned.
    pub async fn delete(&self, id: i64) -> Result<ServiceResult<bool>> {
        let Some(mut entity) = self.store.find_active(id).await? else {
            return Ok(ServiceResult::fail(format!(
                "{} with id {} was not found or is already deleted",
                R::NAME,
                id
            )));
        };

        entity.set_lifecycle(Lifecycle::tombstoned(Utc::now(), self.retention));
        self.store.save(&entity).await?;
        debug!(resource = R::NAME, id, "tombstoned");
        Ok(ServiceResult::ok(true))
    }

    fn not_found<T>(id: i64) -> ServiceResult<T> {
        ServiceResult::fail(format!("{} with id {} was not found", R::NAME, id))
    }
}
