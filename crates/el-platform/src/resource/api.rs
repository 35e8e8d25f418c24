//! Generic CRUD Controller
//!
//! HTTP surface over [`CrudService`]. Every resource mounts the same route
//! set under `/api/<resource>`:
//!
//! - `POST /create`
//! - `PATCH /edit/{id}`
//! - `GET /all`
//! - `GET /get-one/{id}`
//! - `DELETE /delete/{id}`
//! - `GET /export/{csv|excel|json}`
//!
//! Responses are always the JSON envelope `{ isSuccess, message, data }`;
//! export endpoints return file attachments. Each route is gated by its own
//! declared permission.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use el_common::ServiceResult;
use std::sync::Arc;

use crate::shared::error::PlatformError;
use crate::shared::middleware::PermissionLayer;

use super::entity::Resource;
use super::export::{self, ExportFormat};
use super::service::CrudService;
use super::store::ResourceStore;

/// Permissions required by each CRUD route.
#[derive(Debug, Clone, Copy)]
pub struct CrudPermissions {
    pub view: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub export: &'static str,
}

/// Assemble the CRUD router for a resource, one permission gate per route.
pub fn crud_router<R, S>(service: Arc<CrudService<R, S>>, perms: CrudPermissions) -> Router
where
    R: Resource,
    S: ResourceStore<R> + 'static,
{
    Router::new()
        .merge(
            Router::new()
                .route("/create", post(create_one::<R, S>))
                .route_layer(PermissionLayer::new(perms.create)),
        )
        .merge(
            Router::new()
                .route("/edit/{id}", patch(update_one::<R, S>))
                .route_layer(PermissionLayer::new(perms.update)),
        )
        .merge(
            Router::new()
                .route("/all", get(get_all::<R, S>))
                .route("/get-one/{id}", get(get_one::<R, S>))
                .route_layer(PermissionLayer::new(perms.view)),
        )
        .merge(
            Router::new()
                .route("/delete/{id}", delete(delete_one::<R, S>))
                .route_layer(PermissionLayer::new(perms.delete)),
        )
        .merge(
            Router::new()
                .route("/export/{format}", get(export_all::<R, S>))
                .route_layer(PermissionLayer::new(perms.export)),
        )
        .with_state(service)
}

pub async fn create_one<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
    Json(dto): Json<R::Create>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let result = service.create(dto).await?;
    let status = if result.is_success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(result)).into_response())
}

pub async fn get_one<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
    Path(id): Path<i64>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let result = service.get_one(id).await?;
    Ok(envelope_response(result, StatusCode::NOT_FOUND))
}

pub async fn get_all<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let result = service.get_all().await?;
    Ok(Json(result).into_response())
}

pub async fn update_one<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
    Path(id): Path<i64>,
    Json(dto): Json<R::Update>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let result = service.update(id, dto).await?;
    Ok(envelope_response(result, StatusCode::NOT_FOUND))
}

pub async fn delete_one<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
    Path(id): Path<i64>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let result = service.delete(id).await?;
    Ok(envelope_response(result, StatusCode::NOT_FOUND))
}

pub async fn export_all<R, S>(
    State(service): State<Arc<CrudService<R, S>>>,
    Path(format): Path<String>,
) -> Result<Response, PlatformError>
where
    R: Resource,
    S: ResourceStore<R>,
{
    let format: ExportFormat = format
        .parse()
        .map_err(|e: String| PlatformError::validation(e))?;

    let rows = service.get_all().await?.data.unwrap_or_default();
    if rows.is_empty() {
        let body: ServiceResult<bool> =
            ServiceResult::fail(format!("No {} rows to export", R::NAME));
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let body = match format {
        ExportFormat::Json => export::to_json(&rows)?,
        ExportFormat::Csv | ExportFormat::Excel => export::to_csv(&rows),
    };

    let filename = format!("{}.{}", R::NAME, format.file_extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// Success → 200 envelope; expected failure → the given status with the
/// failure envelope in the body.
fn envelope_response<T: serde::Serialize>(
    result: ServiceResult<T>,
    failure_status: StatusCode,
) -> Response {
    if result.is_success {
        Json(result).into_response()
    } else {
        (failure_status, Json(result)).into_response()
    }
}
