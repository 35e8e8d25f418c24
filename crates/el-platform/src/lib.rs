//! EntreLaunch Platform
//!
//! Core platform providing:
//! - Generic CRUD services and controllers over soft-deletable entities
//! - Two-phase delete (tombstone + retention sweep) with cascade rules
//! - Permission-gated HTTP pipeline with a TTL permission cache
//! - Hosted-payment checkout surface
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities and DTOs
//! - `repository` - Data access
//! - `api` - REST endpoints (where public)

// Core aggregates
pub mod refresh_token;
pub mod role;
pub mod subscription;
pub mod user;

// Payments surface
pub mod payment;

// Authentication & authorization
pub mod auth;

// Generic CRUD framework
pub mod resource;

// Shared infrastructure
pub mod schema;
pub mod seed;
pub mod shared;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};

// Re-export framework types
pub use resource::{
    crud_router, CrudPermissions, CrudService, ExportFormat, Exportable, FieldSpec, MemoryStore,
    Resource, ResourceStore,
};
pub use shared::cascade::{CascadeDeleteService, CascadeRoot, CascadeRule, TOMBSTONE_TABLES};
pub use shared::middleware::{AppState, AuthLayer, Authenticated, CurrentUser, PermissionLayer};
pub use shared::permission_cache::{PermissionCache, PERMISSION_CACHE_TTL};

// Re-export main entity types for convenience
pub use refresh_token::entity::RefreshToken;
pub use role::entity::{permissions, AuthRole};
pub use subscription::entity::{
    CreateSubscription, Subscription, SubscriptionDetails, SubscriptionStatus, UpdateSubscription,
};
pub use user::entity::{CreateUser, UpdateUser, User, UserDetails};

// Re-export repositories
pub use refresh_token::repository::PgRefreshTokenStore;
pub use role::repository::PgRoleStore;
pub use subscription::repository::PgSubscriptionStore;
pub use user::repository::PgUserStore;

// Re-export services
pub use auth::{extract_bearer_token, has_permission, AccessTokenClaims, AuthService, PermissionSource};

/// API state and router exports from each aggregate
pub mod api {
    pub use crate::payment::api::{payments_router, PaymentsState};
    pub use crate::subscription::api::subscriptions_router;
    pub use crate::user::api::{users_router, UsersState};
}
