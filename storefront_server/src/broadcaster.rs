//! Realtime order feed.
//!
//! A thin wrapper over a [`tokio::sync::broadcast`] channel. Order events are published fire-and-forget after
//! they have been committed; subscribers that fall behind lose events rather than slowing the publisher down.

use log::*;
use serde::Serialize;
use storefront_engine::db_types::{Order, OrderItem, OrderStatus};
use tokio::sync::broadcast::{channel, Receiver, Sender};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderCreated { order: Order, items: Vec<OrderItem> },
    OrderStatusChanged { old_status: OrderStatus, order: Order },
}

#[derive(Clone)]
pub struct OrderBroadcaster {
    sender: Sender<OrderEvent>,
}

impl Default for OrderBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> Receiver<OrderEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers. Returns the number of subscribers that received it.
    pub fn publish(&self, event: OrderEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => {
                trace!("📡️ Order event delivered to {n} subscribers");
                n
            },
            Err(_) => {
                trace!("📡️ No live-feed subscribers. Dropping order event.");
                0
            },
        }
    }
}
