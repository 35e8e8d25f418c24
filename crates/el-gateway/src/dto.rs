//! Gateway Request/Response Shapes
//!
//! These structs mirror the hosted-payment JSON contract: snake_case fields,
//! amounts echoed back as strings, and an embedded `payment_result` object on
//! queried transactions.

use serde::{Deserialize, Serialize};

/// Request to create a hosted payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedPaymentRequest {
    pub profile_id: u64,
    pub tran_type: String,
    pub tran_class: String,
    pub cart_id: String,
    pub cart_description: String,
    pub cart_currency: String,
    pub cart_amount: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,

    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_shipping: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
}

impl HostedPaymentRequest {
    /// An ecommerce sale transaction, the default hosted-page flow.
    pub fn sale(
        profile_id: u64,
        cart_id: impl Into<String>,
        description: impl Into<String>,
        currency: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            profile_id,
            tran_type: "sale".to_string(),
            tran_class: "ecom".to_string(),
            cart_id: cart_id.into(),
            cart_description: description.into(),
            cart_currency: currency.into(),
            cart_amount: amount,
            callback: None,
            return_url: None,
            hide_shipping: None,
            customer_details: None,
        }
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = Some(return_url.into());
        self
    }

    pub fn with_customer(mut self, customer: CustomerDetails) -> Self {
        self.hide_shipping = Some(true);
        self.customer_details = Some(customer);
        self
    }
}

/// Customer fields attached to a payment request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl CustomerDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Response to a hosted payment page creation.
///
/// The gateway echoes cart fields back as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedPaymentResponse {
    pub tran_ref: String,
    pub cart_id: String,
    #[serde(default)]
    pub cart_description: String,
    pub cart_currency: String,
    pub cart_amount: String,
    pub redirect_url: String,
}

/// Request to query a transaction by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionQueryRequest {
    pub profile_id: u64,
    pub tran_ref: String,
}

/// Payment outcome of a processed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub response_status: String,
    pub response_code: String,
    pub response_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_time: Option<String>,
}

impl PaymentResult {
    /// "A" is the gateway's authorised status code.
    pub fn is_authorised(&self) -> bool {
        self.response_status == "A"
    }
}

/// Response to a transaction query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionQueryResponse {
    pub tran_ref: String,
    pub cart_id: String,
    #[serde(default)]
    pub cart_currency: String,
    #[serde(default)]
    pub cart_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
}
