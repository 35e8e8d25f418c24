//! Subscription aggregate.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::subscriptions_router;
pub use entity::{
    CreateSubscription, Subscription, SubscriptionDetails, SubscriptionStatus, UpdateSubscription,
};
pub use repository::PgSubscriptionStore;
