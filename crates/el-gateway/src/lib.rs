//! EntreLaunch Gateway Client
//!
//! Client for the hosted-payment gateway API: create a payment page, send
//! the customer to its redirect URL, then query the transaction outcome by
//! reference.

mod client;
mod config;
mod dto;
mod error;

pub use client::GatewayClient;
pub use config::{GatewayConfig, Region};
pub use dto::{
    CustomerDetails, HostedPaymentRequest, HostedPaymentResponse, PaymentResult,
    TransactionQueryRequest, TransactionQueryResponse,
};
pub use error::{GatewayError, Result};
