//! Subscriptions API

use axum::Router;
use std::sync::Arc;

use crate::resource::{crud_router, CrudPermissions, CrudService};
use crate::role::entity::permissions;
use crate::subscription::entity::Subscription;
use crate::subscription::repository::PgSubscriptionStore;

/// Create the subscriptions router
pub fn subscriptions_router(
    service: Arc<CrudService<Subscription, PgSubscriptionStore>>,
) -> Router {
    crud_router(
        service,
        CrudPermissions {
            view: permissions::subscriptions::VIEW,
            create: permissions::subscriptions::CREATE,
            update: permissions::subscriptions::UPDATE,
            delete: permissions::subscriptions::DELETE,
            export: permissions::subscriptions::EXPORT,
        },
    )
}
