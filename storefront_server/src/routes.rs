//! Route handlers.
//!
//! Handlers are generic over the backend database type, so endpoint tests can swap the SQLite backend out for
//! mocks. Each group of endpoints has a `configure_*` function that registers its routes on a
//! [`ServiceConfig`]; the webhook route is built separately because it carries the signature-checking
//! middleware.

use actix_web::{
    dev::HttpServiceFactory,
    get,
    web,
    web::ServiceConfig,
    HttpResponse,
    Responder,
};
use cashfree_tools::{new_gateway_order_id, CashfreeApi, CreateOrderRequest, CustomerDetails, OrderMeta, WebhookEvent};
use chrono::{DateTime, Utc};
use log::*;
use serde::Deserialize;
use storefront_engine::{
    db_types::{NewOrder, NewPaymentConfirmation, NewReview, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::{CatalogManagement, OrderFlowDatabase, OrderManagement},
    CatalogApi,
    OrderFlowApi,
    OrderQueryApi,
};
use tokio::sync::broadcast::error::RecvError;
use ts_common::{Rupees, Secret};

use crate::{
    auth::UserClaims,
    broadcaster::OrderBroadcaster,
    config::ServerConfig,
    data_objects::{
        CreatePaymentRequest,
        CreatePaymentResponse,
        JsonResponse,
        ReviewRequest,
        UpdateStatusRequest,
        VerifyPaymentRequest,
    },
    errors::ServerError,
    middleware::WebhookAuthFactory,
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders   ----------------------------------------------------------

pub fn configure_orders<B>(cfg: &mut ServiceConfig)
where B: OrderFlowDatabase + CatalogManagement + 'static {
    cfg.service(
        web::resource("/orders/my-orders").route(web::get().to(my_orders::<B>)),
    )
    .service(web::resource("/orders/live").route(web::get().to(live_orders)))
    .service(
        web::resource("/orders")
            .route(web::post().to(create_order::<B>))
            .route(web::get().to(orders_search::<B>)),
    )
    .service(web::resource("/orders/{id}").route(web::get().to(order_by_id::<B>)))
    .service(web::resource("/orders/{id}/cancel").route(web::put().to(cancel_order::<B>)))
    .service(web::resource("/orders/{id}/status").route(web::put().to(update_order_status::<B>)));
}

/// Submit a new order.
///
/// The customer id and email always come from the caller's claims, never from the body. Submission is
/// idempotent on the gateway order id: resubmitting an already-placed order returns the existing order with a
/// 200 rather than a 201, and has no side effects.
pub async fn create_order<B>(
    claims: UserClaims,
    body: web::Json<NewOrder>,
    api: web::Data<OrderFlowApi<B>>,
    queries: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderFlowDatabase + CatalogManagement,
{
    let mut order = body.into_inner();
    order.customer_id = claims.customer_id.clone();
    order.customer_email = Some(claims.email.clone());
    debug!("💻️ POST order for customer {} on gateway order {}", claims.customer_id, order.payment.gateway_order_id);
    let placed = api.place_order(order).await?;
    let detail = queries.order_with_detail(placed.order.id).await?;
    let (status, message) = if placed.created {
        (actix_web::http::StatusCode::CREATED, "Order placed")
    } else {
        (actix_web::http::StatusCode::OK, "Order already exists")
    };
    Ok(HttpResponse::build(status)
        .json(serde_json::json!({ "success": true, "message": message, "order": detail })))
}

/// Cancel one of your own orders. Only Pending orders can be cancelled; stock is returned as part of the
/// transition.
pub async fn cancel_order<B: OrderFlowDatabase>(
    claims: UserClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ PUT cancel order #{order_id} for customer {}", claims.customer_id);
    let change = api.cancel_order(order_id, &claims.customer_id).await?;
    Ok(HttpResponse::Ok().json(change))
}

/// Move an order to a new status. Admin only. The transition must be allowed by the order state machine;
/// moving to Cancelled returns stock like a customer cancellation does.
pub async fn update_order_status<B: OrderFlowDatabase>(
    claims: UserClaims,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let order_id = path.into_inner();
    let new_status = body.into_inner().status;
    debug!("💻️ PUT order #{order_id} status to {new_status}");
    let change = api.update_order_status(order_id, new_status).await?;
    Ok(HttpResponse::Ok().json(change))
}

/// Fetch your own orders, newest first, with their line items.
pub async fn my_orders<B: OrderManagement + CatalogManagement>(
    claims: UserClaims,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for {}", claims.customer_id);
    let orders = api.my_orders(&claims.customer_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Fetch a single order with line items expanded with current product detail. Customers may only fetch their
/// own orders; admins may fetch any.
pub async fn order_by_id<B>(
    claims: UserClaims,
    path: web::Path<i64>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + CatalogManagement,
{
    let order_id = path.into_inner();
    debug!("💻️ GET order_by_id({order_id}) for {}", claims.customer_id);
    let detail = api.order_with_detail(order_id).await?;
    if detail.order.customer_id != claims.customer_id && !claims.is_admin {
        warn!("💻️ Customer {} tried to read order #{order_id}, which they do not own", claims.customer_id);
        return Err(ServerError::InsufficientPermissions("You may only view your own orders.".to_string()));
    }
    Ok(HttpResponse::Ok().json(detail))
}

/// Query parameters for the admin order search. `status`, `since` and `until` are all optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl From<OrdersQuery> for OrderQueryFilter {
    fn from(q: OrdersQuery) -> Self {
        OrderQueryFilter {
            customer_id: q.customer_id,
            gateway_order_id: None,
            status: q.status.map(|s| vec![s]),
            since: q.since,
            until: q.until,
        }
    }
}

/// Search all orders, newest first. Admin only.
pub async fn orders_search<B>(
    claims: UserClaims,
    query: web::Query<OrdersQuery>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + CatalogManagement,
{
    claims.require_admin()?;
    let filter = OrderQueryFilter::from(query.into_inner());
    debug!("💻️ GET orders search for [{filter}]");
    let orders = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Stream order events as newline-delimited JSON. Admin only.
///
/// The feed is fire-and-forget: if the client cannot keep up, the lagged events are dropped and the stream
/// carries on from the most recent ones.
pub async fn live_orders(
    claims: UserClaims,
    broadcaster: web::Data<OrderBroadcaster>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    info!("💻️ {} connected to the live order feed", claims.customer_id);
    let rx = broadcaster.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_vec(&event) {
                    Ok(mut line) => {
                        line.push(b'\n');
                        return Some((Ok::<_, ServerError>(web::Bytes::from(line)), rx));
                    },
                    Err(e) => {
                        warn!("📡️ Could not serialize order event. {e}");
                        continue;
                    },
                },
                Err(RecvError::Lagged(n)) => {
                    warn!("📡️ Live feed subscriber lagged and dropped {n} events");
                    continue;
                },
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Ok(HttpResponse::Ok().content_type("application/x-ndjson").streaming(stream))
}

//---------------------------------------------   Catalog   ----------------------------------------------------------

pub fn configure_catalog<B>(cfg: &mut ServiceConfig)
where B: CatalogManagement + 'static {
    cfg.service(web::resource("/products/{id}").route(web::get().to(product_detail::<B>)))
        .service(web::resource("/products/{id}/reviews").route(web::post().to(add_review::<B>)));
}

/// Fetch a product with its images, size stock levels and reviews.
pub async fn product_detail<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    trace!("💻️ GET product_detail({product_id})");
    let detail = api.product_detail(product_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Add a review to a product. The caller must have a non-cancelled, paid order containing the product, and
/// may review each product once.
pub async fn add_review<B: CatalogManagement>(
    claims: UserClaims,
    path: web::Path<i64>,
    body: web::Json<ReviewRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let body = body.into_inner();
    debug!("💻️ POST review on product {product_id} by {}", claims.customer_id);
    let review = NewReview {
        product_id,
        customer_id: claims.customer_id,
        customer_name: claims.name,
        rating: body.rating,
        comment: body.comment,
    };
    let review = api.add_review(review).await?;
    Ok(HttpResponse::Created().json(review))
}

//---------------------------------------------   Payments   ---------------------------------------------------------

pub fn configure_payments<B>(cfg: &mut ServiceConfig)
where B: OrderFlowDatabase + 'static {
    cfg.service(web::resource("/payments/create-order").route(web::post().to(create_payment::<B>)))
        .service(web::resource("/payments/verify").route(web::post().to(verify_payment::<B>)))
        .service(web::resource("/payments/{gateway_order_id}").route(web::get().to(payment_details)));
}

/// Builds the webhook route with its signature-checking middleware attached.
pub fn webhook_route<B>(key: Secret<String>, enabled: bool) -> impl HttpServiceFactory
where B: OrderFlowDatabase + 'static {
    web::resource("/payments/webhook").wrap(WebhookAuthFactory::new(key, enabled)).route(web::post().to(webhook::<B>))
}

/// Create a hosted payment session on the gateway. A fresh, locally-unique gateway order id is generated for
/// every session.
pub async fn create_payment<B: OrderFlowDatabase>(
    claims: UserClaims,
    body: web::Json<CreatePaymentRequest>,
    api: web::Data<CashfreeApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let body = body.into_inner();
    let gateway_order_id = new_gateway_order_id();
    debug!("💻️ POST create payment session {gateway_order_id} for customer {}", claims.customer_id);
    let request = CreateOrderRequest {
        order_id: gateway_order_id.clone(),
        order_amount: body.amount,
        order_currency: "INR".to_string(),
        customer_details: CustomerDetails {
            customer_id: claims.customer_id,
            customer_name: body.customer_name,
            customer_email: claims.email,
            customer_phone: body.customer_phone,
        },
        order_meta: OrderMeta {
            return_url: format!("{}/payment/callback?order_id={gateway_order_id}", config.client_url),
            notify_url: format!("{}/api/payments/webhook", config.backend_url),
        },
        order_note: body.order_note,
    };
    let response = api.create_order(request).await?;
    let result = CreatePaymentResponse {
        success: true,
        payment_session_id: response.payment_session_id,
        order_id: response.order_id,
        order_token: response.order_token,
    };
    Ok(HttpResponse::Ok().json(result))
}

/// Poll the gateway for an order's payment status. This is the UI-driven fallback path; a poll that comes
/// back `PAID` records the payment confirmation just as the webhook would. Any status other than `PAID`
/// yields `verified: false` without an error.
pub async fn verify_payment<B: OrderFlowDatabase>(
    claims: UserClaims,
    body: web::Json<VerifyPaymentRequest>,
    gateway: web::Data<CashfreeApi>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let gateway_order_id = body.into_inner().order_id;
    debug!("💻️ POST verify payment for gateway order {gateway_order_id} by {}", claims.customer_id);
    let order = gateway.fetch_order(&gateway_order_id).await?;
    if order.is_paid() {
        let confirmation = NewPaymentConfirmation {
            gateway_order_id: order.order_id.clone(),
            payment_id: None,
            amount: Some(rupees_from_gateway_amount(order.order_amount)),
            payment_method: None,
        };
        api.confirm_payment(confirmation).await?;
        Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "verified": true })))
    } else {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "verified": false,
            "status": order.order_status,
            "message": "Payment verification failed"
        })))
    }
}

/// Receive a webhook delivery from the gateway. Authenticity has already been established by the signature
/// middleware. Payment-success events record a payment confirmation, idempotently keyed on the gateway order
/// id; all other event types are acknowledged and ignored.
pub async fn webhook<B: OrderFlowDatabase>(
    body: web::Json<WebhookEvent>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event = body.into_inner();
    if !event.is_payment_success() {
        debug!("💻️ Ignoring gateway webhook event of type {}", event.event_type);
        return Ok(HttpResponse::Ok().json(JsonResponse::success("ok")));
    }
    let Some(order) = event.data.order else {
        warn!("💻️ Payment success webhook arrived without an order payload");
        return Err(ServerError::InvalidRequestBody("Missing order data".to_string()));
    };
    info!("💻️ Payment successful for gateway order {}", order.order_id);
    let payment = event.data.payment;
    let confirmation = NewPaymentConfirmation {
        gateway_order_id: order.order_id,
        payment_id: payment.as_ref().and_then(|p| p.cf_payment_id.as_ref()).map(json_value_to_string),
        amount: Some(rupees_from_gateway_amount(order.order_amount)),
        payment_method: payment.as_ref().and_then(|p| p.payment_group.clone()),
    };
    api.confirm_payment(confirmation).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("ok")))
}

/// List the payment attempts the gateway holds for an order. Admin diagnostics.
pub async fn payment_details(
    claims: UserClaims,
    path: web::Path<String>,
    api: web::Data<CashfreeApi>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let gateway_order_id = path.into_inner();
    debug!("💻️ GET payment details for gateway order {gateway_order_id}");
    let payments = api.payments_for_order(&gateway_order_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "payments": payments })))
}

/// The gateway reports amounts as decimal rupees.
fn rupees_from_gateway_amount(amount: f64) -> Rupees {
    Rupees::from_paise((amount * 100.0).round() as i64)
}

fn json_value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
