//! Hosted-Payment Gateway Client
//!
//! Thin client over the gateway's REST API with server-key authentication
//! and bounded retries for retryable failures.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::dto::{
    HostedPaymentRequest, HostedPaymentResponse, TransactionQueryRequest,
    TransactionQueryResponse,
};
use crate::error::{GatewayError, Result};

#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: Arc<GatewayConfig>,
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Create a new gateway client with the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.server_key.trim().is_empty() {
            return Err(GatewayError::Config(
                "gateway server key is not set".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    pub fn profile_id(&self) -> u64 {
        self.config.profile_id
    }

    /// Create a hosted payment page; the caller is redirected to the
    /// returned `redirect_url` to complete payment.
    pub async fn create_hosted_payment(
        &self,
        request: &HostedPaymentRequest,
    ) -> Result<HostedPaymentResponse> {
        self.execute("/payment/request", request).await
    }

    /// Query a transaction's state by its reference.
    pub async fn query_transaction(&self, tran_ref: &str) -> Result<TransactionQueryResponse> {
        let request = TransactionQueryRequest {
            profile_id: self.config.profile_id,
            tran_ref: tran_ref.to_string(),
        };
        self.execute("/payment/query", &request).await
    }

    /// POST a JSON payload with retries and error handling.
    async fn execute<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url(), path);
        let mut last_error = None;

        for attempt in 0..self.config.retry_attempts {
            if attempt > 0 {
                let delay = self.config.retry_delay * (1 << (attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let response = self
                .http_client
                .post(&url)
                .header("authorization", &self.config.server_key)
                .json(body)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let parsed: T = response.json().await?;
                        debug!(%url, "gateway request succeeded");
                        return Ok(parsed);
                    }

                    let body = response.text().await.unwrap_or_default();
                    let error = GatewayError::from_status(status, body);

                    if !error.is_retryable() {
                        return Err(error);
                    }

                    warn!(%url, attempt, error = %error, "retryable gateway failure");
                    last_error = Some(error);
                }
                Err(e) => {
                    warn!(%url, attempt, error = %e, "gateway request failed");
                    last_error = Some(GatewayError::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::Other("Request failed".into())))
    }
}
