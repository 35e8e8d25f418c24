//! Gateway Client Integration Tests
//!
//! Exercises the client against a mocked gateway endpoint:
//! - server-key authorization header
//! - hosted payment request/response shapes
//! - retry behaviour on server failures
//! - non-retryable validation failures

use std::time::Duration;

use el_gateway::{GatewayClient, GatewayConfig, GatewayError, HostedPaymentRequest};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> GatewayClient {
    let config = GatewayConfig::new(123456, "SJJ9LURL-TEST-KEY")
        .with_base_url(server.uri())
        .with_retry(3, Duration::from_millis(1));
    GatewayClient::new(config).unwrap()
}

fn payment_response() -> serde_json::Value {
    serde_json::json!({
        "tran_ref": "TST2518801893463",
        "cart_id": "cart-1",
        "cart_description": "Starter plan",
        "cart_currency": "USD",
        "cart_amount": "49.00",
        "redirect_url": "https://secure-global.paytabs.com/payment/page/TST2518801893463"
    })
}

#[tokio::test]
async fn test_create_hosted_payment_sends_server_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/request"))
        .and(header("authorization", "SJJ9LURL-TEST-KEY"))
        .and(body_partial_json(serde_json::json!({
            "profile_id": 123456,
            "tran_type": "sale",
            "tran_class": "ecom",
            "cart_id": "cart-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let request = HostedPaymentRequest::sale(123456, "cart-1", "Starter plan", "USD", 49.0);
    let response = client.create_hosted_payment(&request).await.unwrap();

    assert_eq!(response.tran_ref, "TST2518801893463");
    assert!(response.redirect_url.contains("/payment/page/"));
    assert_eq!(response.cart_amount, "49.00");
}

#[tokio::test]
async fn test_retries_on_server_error_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/request"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/payment/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_response()))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let request = HostedPaymentRequest::sale(123456, "cart-1", "Starter plan", "USD", 49.0);
    let response = client.create_hosted_payment(&request).await.unwrap();
    assert_eq!(response.tran_ref, "TST2518801893463");
}

#[tokio::test]
async fn test_validation_failure_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/request"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid cart_amount"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let request = HostedPaymentRequest::sale(123456, "cart-1", "Starter plan", "USD", -1.0);
    let error = client.create_hosted_payment(&request).await.unwrap_err();
    assert!(matches!(error, GatewayError::Validation(_)));
}

#[tokio::test]
async fn test_query_transaction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/query"))
        .and(body_partial_json(serde_json::json!({
            "profile_id": 123456,
            "tran_ref": "TST2518801893463"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tran_ref": "TST2518801893463",
            "cart_id": "cart-1",
            "cart_currency": "USD",
            "cart_amount": "49.00",
            "payment_result": {
                "response_status": "A",
                "response_code": "G74108",
                "response_message": "Authorised"
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client.query_transaction("TST2518801893463").await.unwrap();
    assert!(response.payment_result.unwrap().is_authorised());
}

#[tokio::test]
async fn test_exhausted_retries_surface_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/request"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let request = HostedPaymentRequest::sale(123456, "cart-1", "Starter plan", "USD", 49.0);
    let error = client.create_hosted_payment(&request).await.unwrap_err();
    assert!(error.is_retryable());
}
