//! Role aggregate: authorization roles and the permission catalog.

pub mod entity;
pub mod repository;

pub use entity::{permissions, AuthRole};
pub use repository::PgRoleStore;
