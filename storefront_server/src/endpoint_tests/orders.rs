use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use log::debug;
use storefront_engine::{
    db_types::OrderStatus,
    events::EventProducers,
    order_objects::StatusChange,
    traits::OrderFlowError,
    OrderFlowApi,
    OrderQueryApi,
};

use crate::endpoint_tests::{
    helpers::{admin_token, customer_token, get_request, sample_items, sample_order, send_request},
    mocks::MockBackend,
};

#[actix_web::test]
async fn my_orders_requires_a_token() {
    let _ = env_logger::try_init();
    let (status, body) = get_request("/orders/my-orders", "", configure_queries).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"), "{body}");
}

#[actix_web::test]
async fn my_orders_rejects_tampered_tokens() {
    let _ = env_logger::try_init();
    let mut token = customer_token("cust-1");
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    debug!("Calling /orders/my-orders with invalid token {token}");
    let (status, body) = get_request("/orders/my-orders", &token, configure_queries).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Access token signature is invalid"), "{body}");
}

#[actix_web::test]
async fn my_orders_returns_the_callers_orders() {
    let _ = env_logger::try_init();
    let token = customer_token("cust-1");
    let (status, body) = get_request("/orders/my-orders", &token, configure_queries).await;
    assert_eq!(status, StatusCode::OK);
    let orders: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["order"]["customerId"], "cust-1");
    assert_eq!(orders[0]["items"][0]["name"], "Midnight Oversized Tee");
}

#[actix_web::test]
async fn customers_may_fetch_their_own_order() {
    let _ = env_logger::try_init();
    let token = customer_token("cust-1");
    let (status, body) = get_request("/orders/42", &token, configure_queries).await;
    assert_eq!(status, StatusCode::OK);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["order"]["id"], 42);
    assert_eq!(order["order"]["payment"]["paymentStatus"], "Success");
}

#[actix_web::test]
async fn customers_may_not_fetch_anothers_order() {
    let _ = env_logger::try_init();
    let token = customer_token("cust-2");
    let (status, body) = get_request("/orders/42", &token, configure_queries).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("your own orders"), "{body}");
}

#[actix_web::test]
async fn admins_may_fetch_any_order() {
    let _ = env_logger::try_init();
    let token = admin_token();
    let (status, _) = get_request("/orders/42", &token, configure_queries).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn the_order_search_is_admin_only() {
    let _ = env_logger::try_init();
    let token = customer_token("cust-1");
    let (status, body) = get_request("/orders?status=Pending", &token, configure_queries).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("admin"), "{body}");

    let token = admin_token();
    let (status, body) = get_request("/orders?status=Pending", &token, configure_queries).await;
    assert_eq!(status, StatusCode::OK);
    let orders: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn status_updates_are_admin_only() {
    let _ = env_logger::try_init();
    let req = TestRequest::put().uri("/orders/42/status").set_json(serde_json::json!({"status": "Shipped"}));
    let (status, _) = send_request(req, &customer_token("cust-1"), configure_flow).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::put().uri("/orders/42/status").set_json(serde_json::json!({"status": "Shipped"}));
    let (status, body) = send_request(req, &admin_token(), configure_flow).await;
    assert_eq!(status, StatusCode::OK);
    let change: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(change["oldStatus"], "Pending");
    assert_eq!(change["order"]["status"], "Shipped");
}

#[actix_web::test]
async fn disallowed_transitions_are_rejected() {
    let _ = env_logger::try_init();
    let req = TestRequest::put().uri("/orders/43/status").set_json(serde_json::json!({"status": "Pending"}));
    let (status, body) = send_request(req, &admin_token(), configure_flow).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("cannot move from Delivered to Pending"), "{body}");
}

#[actix_web::test]
async fn only_the_owner_may_cancel() {
    let _ = env_logger::try_init();
    let req = TestRequest::put().uri("/orders/42/cancel");
    let (status, body) = send_request(req, &customer_token("cust-2"), configure_flow).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("do not own"), "{body}");

    let req = TestRequest::put().uri("/orders/42/cancel");
    let (status, body) = send_request(req, &customer_token("cust-1"), configure_flow).await;
    assert_eq!(status, StatusCode::OK);
    let change: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(change["order"]["status"], "Cancelled");
}

#[actix_web::test]
async fn duplicate_submissions_return_the_existing_order() {
    let _ = env_logger::try_init();
    let body = serde_json::json!({
        "customerId": "ignored",
        "customerInfo": {
            "name": "Priya Sharma", "phone": "9876543210",
            "address": { "street": "12 MG Road", "city": "Bengaluru", "state": "Karnataka", "pincode": "560001" }
        },
        "items": [{
            "productId": 11, "name": "Midnight Oversized Tee", "price": 99900, "quantity": 2, "size": "L"
        }],
        "totalPrice": 199800,
        "payment": {
            "gatewayOrderId": "order_1700000000000_fixture42",
            "paymentId": "pay_42", "paymentStatus": "Success", "paymentMethod": "upi",
            "paidAt": "2026-01-15T10:00:00Z"
        }
    });
    let req = TestRequest::post().uri("/orders").set_json(body);
    let (status, body) = send_request(req, &customer_token("cust-1"), configure_create).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Order already exists");
    assert_eq!(response["order"]["order"]["id"], 42);
}

// Insert reports the order as pre-existing, so the handler must answer 200, not 201.
fn configure_create(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_insert_order().returning(|order| {
        assert_eq!(order.customer_id, "cust-1", "claims must override the body");
        Ok((sample_order(42, "cust-1"), false))
    });
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id, "cust-1"))));
    backend.expect_fetch_order_items().returning(|order_id| Ok(sample_items(order_id)));
    backend.expect_fetch_product().returning(|_| Ok(None));
    let mut query_backend = MockBackend::new();
    query_backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id, "cust-1"))));
    query_backend.expect_fetch_order_items().returning(|order_id| Ok(sample_items(order_id)));
    query_backend.expect_fetch_product().returning(|_| Ok(None));
    let flow = OrderFlowApi::new(backend, EventProducers::default());
    let queries = OrderQueryApi::new(query_backend);
    crate::routes::configure_orders::<MockBackend>(cfg);
    cfg.app_data(web::Data::new(flow)).app_data(web::Data::new(queries));
}

// Backend mock for the read-only query endpoints. Order #42 belongs to cust-1.
fn configure_queries(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_orders_for_customer()
        .returning(|customer_id| Ok(vec![sample_order(42, customer_id)]));
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id, "cust-1"))));
    backend.expect_fetch_order_items().returning(|order_id| Ok(sample_items(order_id)));
    backend.expect_fetch_product().returning(|_| Ok(None));
    backend.expect_search_orders().returning(|_| Ok(vec![sample_order(42, "cust-1")]));
    let queries = OrderQueryApi::new(backend);
    crate::routes::configure_orders::<MockBackend>(cfg);
    cfg.app_data(web::Data::new(queries));
}

// Backend mock for the mutating endpoints. Order #42 is Pending and belongs to cust-1;
// order #43 has already been delivered.
fn configure_flow(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_order().returning(|id| Ok(Some(sample_order(id, "cust-1"))));
    backend.expect_set_order_status().returning(|order_id, new_status| {
        if order_id == 43 {
            return Err(OrderFlowError::InvalidTransition {
                id: order_id,
                from: OrderStatus::Delivered,
                to: new_status,
            });
        }
        let mut order = sample_order(order_id, "cust-1");
        order.status = new_status;
        Ok(StatusChange { old_status: OrderStatus::Pending, order })
    });
    let flow = OrderFlowApi::new(backend, EventProducers::default());
    crate::routes::configure_orders::<MockBackend>(cfg);
    cfg.app_data(web::Data::new(flow));
}
