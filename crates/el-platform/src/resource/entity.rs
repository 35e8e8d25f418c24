//! Resource Capability Traits
//!
//! Every CRUD-managed entity implements [`Resource`]: a numeric identity, a
//! tombstone lifecycle, and the three DTO shapes the generic service works
//! with. The service and controller never see concrete entity types, only
//! this capability set.

use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::export::Exportable;

/// Capability set for a CRUD-managed entity.
///
/// `Create` maps a request body to a new entity; `Update` carries optional
/// fields with patch semantics (a `None` field never overwrites); `Details`
/// is the read model returned to callers and driven through export.
pub trait Resource: Send + Sync + Sized + 'static {
    /// Resource name used in URLs, messages and export filenames ("users").
    const NAME: &'static str;

    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;
    type Details: Serialize + Exportable + Send + 'static;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    fn lifecycle(&self) -> Lifecycle;
    fn set_lifecycle(&mut self, lifecycle: Lifecycle);

    /// Build a new entity from its creation DTO. The id is assigned by the
    /// store on insert.
    fn from_create(dto: Self::Create, now: DateTime<Utc>) -> Self;

    /// Apply a partial update. Only populated fields overwrite; `updated_at`
    /// is stamped regardless.
    fn apply_update(&mut self, dto: Self::Update, now: DateTime<Utc>);

    fn details(&self) -> Self::Details;
}
