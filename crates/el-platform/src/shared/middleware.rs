//! API Middleware
//!
//! Two tower layers make up the HTTP pipeline gate:
//!
//! - [`AuthLayer`] runs on the whole API: it injects [`AppState`] into
//!   request extensions and, when a valid bearer token is present, resolves
//!   the caller into a [`CurrentUser`] extension. It never rejects by itself.
//! - [`PermissionLayer`] is applied per route and declares that route's
//!   required permission. Routes without the layer pass through unchecked.
//!   With the layer: no caller → 401, missing permission → 403 with a JSON
//!   body naming the missing permission.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::auth::auth_service::extract_bearer_token;
use crate::auth::permission_service::has_permission;
use crate::auth::AuthService;
use crate::shared::error::PlatformError;
use crate::shared::permission_cache::PermissionCache;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub permission_cache: Arc<PermissionCache>,
}

/// The resolved caller of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: Option<String>,
}

/// Authenticated caller extractor for handlers that need an identity.
pub struct Authenticated(pub CurrentUser);

impl std::ops::Deref for Authenticated {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| PlatformError::unauthorized("Missing or invalid authentication token"))
    }
}

// ============================================================================
// AuthLayer: state injection + identity resolution
// ============================================================================

#[derive(Clone)]
pub struct AuthLayer {
    state: AppState,
}

impl AuthLayer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AppState,
}

impl<S, B> Service<Request<B>> for AuthMiddleware<S>
where
    S: Service<Request<B>, Response = Response>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let user = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .and_then(|token| self.state.auth_service.validate_token(token).ok())
            .and_then(|claims| {
                claims.sub.parse::<i64>().ok().map(|id| CurrentUser {
                    id,
                    email: claims.email,
                })
            });

        req.extensions_mut().insert(self.state.clone());
        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }

        self.inner.call(req)
    }
}

// ============================================================================
// PermissionLayer: per-route required permission
// ============================================================================

#[derive(Clone)]
pub struct PermissionLayer {
    permission: &'static str,
}

impl PermissionLayer {
    pub fn new(permission: &'static str) -> Self {
        Self { permission }
    }
}

impl<S> Layer<S> for PermissionLayer {
    type Service = PermissionGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PermissionGuard {
            inner,
            permission: self.permission,
        }
    }
}

#[derive(Clone)]
pub struct PermissionGuard<S> {
    inner: S,
    permission: &'static str,
}

impl<S, B> Service<Request<B>> for PermissionGuard<S>
where
    S: Service<Request<B>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Swap the freshly-cloned service in so the one we move into the
        // future is the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let permission = self.permission;

        Box::pin(async move {
            let Some(user) = req.extensions().get::<CurrentUser>().cloned() else {
                return Ok(PlatformError::unauthorized(
                    "Missing or invalid authentication token",
                )
                .into_response());
            };

            let Some(state) = req.extensions().get::<AppState>().cloned() else {
                return Ok(
                    PlatformError::internal("Authorization state not configured").into_response(),
                );
            };

            let granted = match state.permission_cache.permissions_for(user.id).await {
                Ok(granted) => granted,
                Err(err) => return Ok(err.into_response()),
            };

            if !has_permission(&granted, permission) {
                return Ok(PlatformError::missing_permission(permission).into_response());
            }

            inner.call(req).await
        })
    }
}
