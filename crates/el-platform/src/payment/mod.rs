//! Payments surface over the hosted-payment gateway client.

pub mod api;

pub use api::{payments_router, PaymentsState};
