use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use storefront_engine::db_types::{
    Address,
    CustomerInfo,
    Order,
    OrderItem,
    OrderStatus,
    PaymentInfo,
    PaymentStatus,
    Size,
};
use ts_common::{Rupees, Secret};

use crate::{
    auth::{TokenIssuer, TokenVerifier, UserClaims},
    config::AuthConfig,
};

// A fixed signing secret for issuing test tokens. DO NOT re-use this key anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { secret: Secret::new("test-secret-for-endpoint-tests-only".to_string()) }
}

pub fn issue_token(claims: UserClaims) -> String {
    TokenIssuer::new(get_auth_config()).issue(claims, Utc::now() + Duration::days(1)).expect("Failed to sign token")
}

pub fn customer_token(customer_id: &str) -> String {
    issue_token(claims_for(customer_id, false))
}

pub fn admin_token() -> String {
    issue_token(claims_for("admin-1", true))
}

pub fn claims_for(customer_id: &str, is_admin: bool) -> UserClaims {
    UserClaims {
        customer_id: customer_id.to_string(),
        name: "Priya Sharma".to_string(),
        email: "priya@example.com".to_string(),
        is_admin,
        exp: 0,
    }
}

pub async fn send_request(
    mut req: TestRequest,
    auth_header: &str,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    let req = req.to_request();
    let verifier = TokenVerifier::new(get_auth_config());
    let app = App::new().app_data(web::Data::new(verifier)).configure(configure);
    let service = test::init_service(app).await;
    // Requests rejected by middleware come back as `Err`; fold them into a response so tests can
    // assert on the rejection status and body.
    let (status, body) = match test::try_call_service(&service, req).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            (res.status(), res.into_body().try_into_bytes().unwrap())
        },
        Err(e) => {
            let res = HttpResponse::from_error(e);
            (res.status(), res.into_body().try_into_bytes().unwrap())
        },
    };
    let body = String::from_utf8_lossy(&body).into_owned();
    (status, body)
}

pub async fn get_request(path: &str, auth_header: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    send_request(TestRequest::get().uri(path), auth_header, configure).await
}

//-----------------------------------------------   Fixtures   -------------------------------------------------------

pub fn test_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

pub fn sample_order(id: i64, customer_id: &str) -> Order {
    Order {
        id,
        customer_id: customer_id.to_string(),
        customer_info: CustomerInfo {
            name: "Priya Sharma".to_string(),
            phone: "9876543210".to_string(),
            address: Address {
                street: "12 MG Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560001".to_string(),
            },
        },
        total_price: Rupees::from_rupees(1998),
        status: OrderStatus::Pending,
        payment: PaymentInfo {
            gateway_order_id: format!("order_1700000000000_fixture{id:02}"),
            payment_id: Some(format!("pay_{id}")),
            payment_status: PaymentStatus::Success,
            payment_method: Some("upi".to_string()),
            paid_at: Some(test_timestamp()),
        },
        created_at: test_timestamp(),
        updated_at: test_timestamp(),
    }
}

pub fn sample_items(order_id: i64) -> Vec<OrderItem> {
    vec![OrderItem {
        id: 1,
        order_id,
        product_id: 11,
        name: "Midnight Oversized Tee".to_string(),
        price: Rupees::from_rupees(999),
        image: String::new(),
        quantity: 2,
        size: Size::L,
    }]
}
