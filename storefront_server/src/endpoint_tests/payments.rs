use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use chrono::Utc;
use storefront_engine::{db_types::PaymentConfirmation, events::EventProducers, OrderFlowApi};
use ts_common::{Rupees, Secret};

use crate::{
    endpoint_tests::{helpers::send_request, mocks::MockBackend},
    helpers::webhook_signature,
    middleware::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    routes::webhook_route,
};

const WEBHOOK_SECRET: &str = "cf_test_webhook_secret";
const TIMESTAMP: &str = "1717245000";

fn success_event() -> String {
    serde_json::json!({
        "type": "PAYMENT_SUCCESS_WEBHOOK",
        "data": {
            "order": { "order_id": "order_1717245000000_ab12cd34e", "order_amount": 1399.0 },
            "payment": { "cf_payment_id": 5114910, "payment_status": "SUCCESS", "payment_group": "upi" }
        }
    })
    .to_string()
}

fn webhook_request(body: String, signature: &str) -> TestRequest {
    TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(ContentType::json())
        .insert_header((TIMESTAMP_HEADER, TIMESTAMP))
        .insert_header((SIGNATURE_HEADER, signature))
        .set_payload(body)
}

#[actix_web::test]
async fn a_signed_payment_success_event_records_a_confirmation() {
    let _ = env_logger::try_init();
    let body = success_event();
    let signature = webhook_signature(WEBHOOK_SECRET, TIMESTAMP, body.as_bytes());
    let (status, response) = send_request(webhook_request(body, &signature), "", configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains(r#""success":true"#), "{response}");
}

#[actix_web::test]
async fn a_forged_signature_is_rejected_without_side_effects() {
    let _ = env_logger::try_init();
    let body = success_event();
    let signature = webhook_signature("wrong_secret", TIMESTAMP, body.as_bytes());
    // The mock has no expectations set, so reaching the handler would panic the test.
    let (status, _) = send_request(webhook_request(body, &signature), "", configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn a_tampered_body_is_rejected() {
    let _ = env_logger::try_init();
    let signature = webhook_signature(WEBHOOK_SECRET, TIMESTAMP, success_event().as_bytes());
    let tampered = success_event().replace("1399.0", "1.0");
    let (status, _) = send_request(webhook_request(tampered, &signature), "", configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_signature_headers_are_rejected() {
    let _ = env_logger::try_init();
    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(ContentType::json())
        .set_payload(success_event());
    let (status, _) = send_request(req, "", configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn other_event_types_are_acknowledged_and_ignored() {
    let _ = env_logger::try_init();
    let body = serde_json::json!({ "type": "PAYMENT_FAILED_WEBHOOK", "data": {} }).to_string();
    let signature = webhook_signature(WEBHOOK_SECRET, TIMESTAMP, body.as_bytes());
    let (status, response) = send_request(webhook_request(body, &signature), "", configure_untouched).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.contains(r#""success":true"#), "{response}");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_record_payment_confirmation().returning(|confirmation| {
        assert_eq!(confirmation.gateway_order_id, "order_1717245000000_ab12cd34e");
        assert_eq!(confirmation.amount, Some(Rupees::from_paise(139_900)));
        assert_eq!(confirmation.payment_id.as_deref(), Some("5114910"));
        let record = PaymentConfirmation {
            gateway_order_id: confirmation.gateway_order_id,
            payment_id: confirmation.payment_id,
            amount: confirmation.amount,
            payment_method: confirmation.payment_method,
            confirmed_at: Utc::now(),
        };
        Ok((record, true))
    });
    register(cfg, backend);
}

fn configure_untouched(cfg: &mut ServiceConfig) {
    register(cfg, MockBackend::new());
}

fn register(cfg: &mut ServiceConfig, backend: MockBackend) {
    let flow = OrderFlowApi::new(backend, EventProducers::default());
    cfg.service(webhook_route::<MockBackend>(Secret::new(WEBHOOK_SECRET.to_string()), true))
        .app_data(web::Data::new(flow));
}
