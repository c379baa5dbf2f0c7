//! A thin client for the Cashfree hosted payment gateway.
//!
//! The storefront never handles card details itself. Checkout creates a payment *session* on the gateway, the
//! customer completes payment on the hosted page, and the gateway reports the outcome twice: via a signed webhook
//! (server-to-server) and via a status endpoint the client-driven verify flow polls after redirect.

mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::CashfreeApi;
pub use config::{CashfreeConfig, GatewayEnvironment};
pub use data_objects::{
    CreateOrderRequest,
    CreateOrderResponse,
    CustomerDetails,
    GatewayOrder,
    OrderMeta,
    PaymentDetail,
    WebhookEvent,
    WebhookOrder,
    WebhookPayment,
    GATEWAY_ORDER_PAID,
    PAYMENT_SUCCESS_EVENT,
};
pub use error::CashfreeApiError;
pub use helpers::new_gateway_order_id;
