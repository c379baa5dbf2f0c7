use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The gateway's order status value that signals a completed payment.
pub const GATEWAY_ORDER_PAID: &str = "PAID";

/// Webhook event type emitted by the gateway when a payment is captured.
pub const PAYMENT_SUCCESS_EVENT: &str = "PAYMENT_SUCCESS_WEBHOOK";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMeta {
    pub return_url: String,
    pub notify_url: String,
}

/// Request body for the gateway's order-create endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub order_id: String,
    pub order_amount: f64,
    pub order_currency: String,
    pub customer_details: CustomerDetails,
    pub order_meta: OrderMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_session_id: String,
    #[serde(default)]
    pub order_token: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
}

/// The gateway's view of an order, as returned by the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub order_id: String,
    pub order_amount: f64,
    pub order_currency: String,
    pub order_status: String,
}

impl GatewayOrder {
    /// True iff the gateway reports the order as fully paid. Any other status (ACTIVE, EXPIRED, TERMINATED, ...)
    /// means "not verified", never an error.
    pub fn is_paid(&self) -> bool {
        self.order_status == GATEWAY_ORDER_PAID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    #[serde(default)]
    pub cf_payment_id: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_time: Option<DateTime<Utc>>,
}

//--------------------------------------   Webhook envelope   --------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub order: Option<WebhookOrder>,
    #[serde(default)]
    pub payment: Option<WebhookPayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookOrder {
    pub order_id: String,
    pub order_amount: f64,
    #[serde(default)]
    pub order_currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayment {
    #[serde(default)]
    pub cf_payment_id: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_group: Option<String>,
    #[serde(default)]
    pub payment_time: Option<DateTime<Utc>>,
}

impl WebhookEvent {
    pub fn is_payment_success(&self) -> bool {
        self.event_type == PAYMENT_SUCCESS_EVENT
    }
}
