use thiserror::Error;

use crate::{
    db_types::{
        NewOrder,
        NewPaymentConfirmation,
        Order,
        OrderStatus,
        PaymentConfirmation,
        Size,
        ValidationError,
    },
    order_objects::StatusChange,
    traits::OrderManagement,
};

/// This trait defines the highest level of behaviour for backends supporting the storefront's
/// order flow.
///
/// This behaviour includes:
/// * Atomically reserving stock and persisting new orders.
/// * Driving the order status state machine, including restocking on cancellation.
/// * Recording payment confirmations received from the gateway.
#[allow(async_fn_in_trait)]
pub trait OrderFlowDatabase: Clone + OrderManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Takes a new order and, in a single atomic transaction, reserves stock for every line item
    /// and stores the order with its item snapshots.
    ///
    /// The call is idempotent on the payment gateway order id. If an order with the same gateway
    /// order id already exists, it is returned unchanged and the second element is `false`.
    ///
    /// A payment confirmation for the gateway order id must already be on record, otherwise
    /// [`OrderFlowError::PaymentNotVerified`] is returned and nothing is written.
    ///
    /// Stock is taken with conditional decrements. If any line item cannot be satisfied, the
    /// entire transaction rolls back, including decrements that already succeeded.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderFlowError>;

    /// Moves the order to `new_status`, enforcing the status state machine
    /// ([`OrderStatus::can_transition_to`]).
    ///
    /// Moving to `Cancelled` returns each line item's quantity to stock in the same transaction.
    /// Stock rows that have disappeared since purchase (product deleted) are skipped.
    async fn set_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusChange, OrderFlowError>;

    /// Records a payment-success event from the gateway. Idempotent on the gateway order id:
    /// redelivery returns the existing record with `false` in the second element.
    ///
    /// If an order for the gateway order id already exists, its payment fields are stamped in the
    /// same transaction.
    async fn record_payment_confirmation(
        &self,
        confirmation: NewPaymentConfirmation,
    ) -> Result<(PaymentConfirmation, bool), OrderFlowError>;

    /// Fetches the payment confirmation for the given gateway order id, if any.
    async fn fetch_payment_confirmation(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentConfirmation>, OrderFlowError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderFlowError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    InvalidOrder(#[from] ValidationError),
    #[error("Payment for gateway order {0} has not been verified")]
    PaymentNotVerified(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("Insufficient stock for {product} ({size}): {available} available, {requested} requested")]
    InsufficientStock { product: String, size: Size, available: i64, requested: i64 },
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition { id: i64, from: OrderStatus, to: OrderStatus },
    #[error("You do not have permission to modify this order")]
    Forbidden,
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

impl From<crate::traits::OrderQueryError> for OrderFlowError {
    fn from(e: crate::traits::OrderQueryError) -> Self {
        use crate::traits::OrderQueryError::*;
        match e {
            DatabaseError(e) => OrderFlowError::DatabaseError(e),
            OrderNotFound(id) => OrderFlowError::OrderNotFound(id),
        }
    }
}
