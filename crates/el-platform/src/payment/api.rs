//! Payments API
//!
//! Thin surface over the hosted-payment gateway: a checkout request creates
//! a hosted payment page and hands the redirect URL back to the caller.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use el_common::ServiceResult;
use el_gateway::{CustomerDetails, GatewayClient, GatewayError, HostedPaymentRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::role::entity::permissions;
use crate::shared::error::PlatformError;
use crate::shared::middleware::{Authenticated, PermissionLayer};

#[derive(Clone)]
pub struct PaymentsState {
    pub gateway: Arc<GatewayClient>,
    pub currency: String,
}

/// Checkout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_id: String,
    pub description: String,
    pub amount: f64,
    pub return_url: Option<String>,
}

/// Checkout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub tran_ref: String,
    pub redirect_url: String,
}

/// Create a hosted payment page for the caller's cart.
pub async fn checkout(
    State(state): State<PaymentsState>,
    auth: Authenticated,
    Json(req): Json<CheckoutRequest>,
) -> Result<Response, PlatformError> {
    if req.amount <= 0.0 {
        let body: ServiceResult<CheckoutResponse> =
            ServiceResult::fail("Cart amount must be greater than zero");
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let mut payment = HostedPaymentRequest::sale(
        state.gateway.profile_id(),
        &req.cart_id,
        &req.description,
        &state.currency,
        req.amount,
    );
    if let Some(email) = &auth.email {
        payment = payment.with_customer(CustomerDetails::new().with_email(email));
    }
    if let Some(return_url) = req.return_url {
        payment = payment.with_return_url(return_url);
    }

    match state.gateway.create_hosted_payment(&payment).await {
        Ok(created) => Ok(Json(ServiceResult::ok(CheckoutResponse {
            tran_ref: created.tran_ref,
            redirect_url: created.redirect_url,
        }))
        .into_response()),
        Err(GatewayError::Validation(message)) => {
            let body: ServiceResult<CheckoutResponse> = ServiceResult::fail(message);
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        Err(err) => Err(PlatformError::internal(format!(
            "payment gateway error: {}",
            err
        ))),
    }
}

/// Create the payments router
pub fn payments_router(state: PaymentsState) -> Router {
    Router::new()
        .route("/checkout", post(checkout))
        .route_layer(PermissionLayer::new(permissions::payments::CREATE))
        .with_state(state)
}
