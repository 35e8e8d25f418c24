//! Authentication & authorization services.

pub mod auth_service;
pub mod permission_service;

pub use auth_service::{extract_bearer_token, AccessTokenClaims, AuthService};
pub use permission_service::{has_permission, PermissionSource};
