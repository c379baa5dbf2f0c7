use thiserror::Error;

use crate::{
    db_types::{Order, OrderItem},
    order_objects::OrderQueryFilter,
};

/// Read-only access to orders and their line items.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given internal id.
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderQueryError>;

    /// Fetches the order carrying the given payment gateway order id.
    async fn fetch_order_by_gateway_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, OrderQueryError>;

    /// Fetches the snapshot line items for an order.
    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderQueryError>;

    /// All orders for the given customer, newest first.
    async fn fetch_orders_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Order>, OrderQueryError>;

    /// Fetches orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderQueryError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
}

impl From<sqlx::Error> for OrderQueryError {
    fn from(e: sqlx::Error) -> Self {
        OrderQueryError::DatabaseError(e.to_string())
    }
}
