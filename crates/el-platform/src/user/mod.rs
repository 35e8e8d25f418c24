//! User aggregate: root entity, repository and REST API.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::{users_router, UsersState};
pub use entity::{CreateUser, UpdateUser, User, UserDetails};
pub use repository::PgUserStore;
