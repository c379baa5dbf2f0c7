use serde::Serialize;

use crate::db_types::{Order, OrderItem, OrderStatus};

/// Emitted once when a new order is committed. Duplicate submissions do not re-emit.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Taken from the caller's auth claims; used for the confirmation email.
    pub customer_email: Option<String>,
}

/// Emitted on every successful status transition, including cancellations.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusChangedEvent {
    pub old_status: OrderStatus,
    pub order: Order,
}
