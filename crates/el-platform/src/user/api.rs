//! Users API
//!
//! Standard CRUD routes plus a cascading delete: removing a user tombstones
//! its subscriptions and refresh tokens in the same transaction.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use el_common::ServiceResult;
use std::sync::Arc;

use crate::resource::api::{create_one, export_all, get_all, get_one, update_one};
use crate::resource::CrudService;
use crate::role::entity::permissions;
use crate::shared::cascade::CascadeDeleteService;
use crate::shared::error::PlatformError;
use crate::shared::middleware::PermissionLayer;
use crate::user::entity::User;
use crate::user::repository::PgUserStore;

#[derive(Clone)]
pub struct UsersState {
    pub service: Arc<CrudService<User, PgUserStore>>,
    pub cascade: Arc<CascadeDeleteService>,
}

impl FromRef<UsersState> for Arc<CrudService<User, PgUserStore>> {
    fn from_ref(state: &UsersState) -> Self {
        state.service.clone()
    }
}

/// Create the users router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .merge(
            Router::new()
                .route("/create", post(create_one::<User, PgUserStore>))
                .route_layer(PermissionLayer::new(permissions::users::CREATE)),
        )
        .merge(
            Router::new()
                .route("/edit/{id}", patch(update_one::<User, PgUserStore>))
                .route_layer(PermissionLayer::new(permissions::users::UPDATE)),
        )
        .merge(
            Router::new()
                .route("/all", get(get_all::<User, PgUserStore>))
                .route("/get-one/{id}", get(get_one::<User, PgUserStore>))
                .route_layer(PermissionLayer::new(permissions::users::VIEW)),
        )
        .merge(
            Router::new()
                .route("/delete/{id}", delete(delete_user))
                .route_layer(PermissionLayer::new(permissions::users::DELETE)),
        )
        .merge(
            Router::new()
                .route("/export/{format}", get(export_all::<User, PgUserStore>))
                .route_layer(PermissionLayer::new(permissions::users::EXPORT)),
        )
        .with_state(state)
}

/// Soft-delete a user together with its dependent rows.
async fn delete_user(
    State(state): State<UsersState>,
    Path(id): Path<i64>,
) -> Result<Response, PlatformError> {
    if state.cascade.soft_delete_cascade::<User>(id).await? {
        Ok(Json(ServiceResult::ok(true)).into_response())
    } else {
        let body: ServiceResult<bool> = ServiceResult::fail(format!(
            "users with id {} was not found or is already deleted",
            id
        ));
        Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
    }
}
