// HTTP backend tests against a mock server
//
// Paths, auth header, query parameters and request bodies as the billing
// API expects them, and the mapping of envelope and status failures.

#[path = "../helpers/mod.rs"]
mod helpers;

use billing_console::config::BackendConfig;
use billing_console::core::{MinorUnits, TransportError};
use billing_console::modules::backend::models::RefundRequestDto;
use billing_console::modules::backend::{BillingBackend, HttpBillingBackend};
use billing_console::modules::invoices::InvoiceService;
use helpers::*;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBillingBackend {
    HttpBillingBackend::new(&BackendConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "message": "ok", "data": data }))
}

#[tokio::test]
async fn test_get_invoice_unwraps_envelope() {
    let server = MockServer::start().await;
    let dto = invoice_dto("inv_1", 2, 12_345, false);

    Mock::given(method("GET"))
        .and(path("/merchant/invoice/detail"))
        .and(query_param("invoiceId", "inv_1"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ok(serde_json::to_value(&dto).unwrap()))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = backend(&server).get_invoice("inv_1").await.unwrap();
    assert_eq!(fetched, dto);
}

#[tokio::test]
async fn test_fetch_through_service_converts_minor_units() {
    let server = MockServer::start().await;
    let dto = invoice_dto("inv_1", 3, 12_345, false);

    Mock::given(method("GET"))
        .and(path("/merchant/invoice/detail"))
        .respond_with(ok(serde_json::to_value(&dto).unwrap()))
        .mount(&server)
        .await;

    let service = InvoiceService::new(Arc::new(backend(&server)), registry());
    let invoice = service.fetch("inv_1").await.unwrap();

    assert_eq!(invoice.total_amount().to_string(), "123.45");
    assert!(invoice.permissions().refundable);
}

#[tokio::test]
async fn test_envelope_error_code_becomes_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/merchant/invoice/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 40012,
            "message": "invoice already paid",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = backend(&server).revoke_invoice("inv_1").await.unwrap_err();
    match err {
        TransportError::Backend { code, message } => {
            assert_eq!(code, 40012);
            assert_eq!(message, "invoice already paid");
        }
        other => panic!("expected a backend rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_becomes_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/merchant/invoice/send_email"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = backend(&server).send_invoice_email("inv_1").await.unwrap_err();
    match err {
        TransportError::Backend { code, message } => {
            assert_eq!(code, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected a backend rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refund_posts_camel_case_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/merchant/invoice/refund"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "invoiceId": "inv_1",
            "paymentId": "pay_60",
            "refundAmount": 6000,
            "reason": "duplicate charge"
        })))
        .respond_with(ok(json!({
            "refundId": "rf_1",
            "refundAmount": 6000,
            "currency": "EUR",
            "refundComment": "duplicate charge",
            "status": 2,
            "paymentId": "pay_60",
            "gatewayId": 1,
            "refundTime": 1700100000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refund = backend(&server)
        .refund(&RefundRequestDto {
            invoice_id: "inv_1".to_string(),
            payment_id: Some("pay_60".to_string()),
            refund_amount: MinorUnits::new(6_000),
            reason: "duplicate charge".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(refund.refund_id.as_deref(), Some("rf_1"));
    assert_eq!(refund.refund_amount, MinorUnits::new(6_000));
    assert_eq!(refund.refund_time.timestamp(), 1_700_100_000);
}

#[tokio::test]
async fn test_split_payments_default_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/merchant/invoice/split_payments"))
        .and(query_param("invoiceId", "inv_1"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    let payments = backend(&server).get_split_payments("inv_1").await.unwrap();
    assert!(payments.is_empty());
}

#[tokio::test]
async fn test_missing_data_on_detail_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/merchant/invoice/detail"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    assert!(backend(&server).get_invoice("inv_1").await.is_err());
}
