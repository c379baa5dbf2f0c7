use std::fmt::Display;

use serde::{Deserialize, Serialize};
use storefront_engine::db_types::OrderStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Body for the admin status-change endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Body for `POST /api/payments/create-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// The order total, in decimal rupees, as the gateway expects it.
    pub amount: f64,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub order_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub payment_session_id: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_token: Option<String>,
}

/// Body for `POST /api/payments/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
}

/// Body for `POST /api/products/{id}/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    pub comment: String,
}
