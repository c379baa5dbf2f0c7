use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, NewPaymentConfirmation, OrderStatus, PaymentConfirmation, PaymentStatus},
    events::{EventProducers, OrderCreatedEvent, OrderStatusChangedEvent},
    sfe_api::order_objects::{PlacedOrder, StatusChange},
    traits::{OrderFlowDatabase, OrderFlowError},
};

/// `OrderFlowApi` is the primary API for handling order and payment flows in response to
/// storefront checkout events and gateway payment events.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderFlowDatabase
{
    /// Submit a new order.
    ///
    /// The order is validated first; nothing is written if validation fails. The payment attached
    /// to the order must claim success, and a matching payment confirmation must be on record
    /// with the backend, otherwise `PaymentNotVerified` is returned.
    ///
    /// Submission is idempotent on the gateway order id. A duplicate submission returns the
    /// existing order with `created: false` and emits no events.
    pub async fn place_order(&self, order: NewOrder) -> Result<PlacedOrder, OrderFlowError> {
        order.validate()?;
        if order.payment.payment_status != PaymentStatus::Success {
            return Err(OrderFlowError::PaymentNotVerified(order.payment.gateway_order_id.clone()));
        }
        let customer_email = order.customer_email.clone();
        let (order, created) = self.db.insert_order(order).await?;
        let items = self.db.fetch_order_items(order.id).await?;
        if created {
            debug!("🛒️ Order #{} created for customer {}", order.id, order.customer_id);
            let event = OrderCreatedEvent { order: order.clone(), items: items.clone(), customer_email };
            for producer in &self.producers.order_created_producer {
                producer.publish_event(event.clone()).await;
            }
        } else {
            debug!(
                "🛒️ Duplicate submission for gateway order {}. Returning existing order #{}",
                order.payment.gateway_order_id, order.id
            );
        }
        Ok(PlacedOrder { order, items, created })
    }

    /// Cancel an order on behalf of the customer that owns it.
    ///
    /// The caller's customer id must match the order's. The state machine restricts cancellation
    /// to `Pending` orders; stock is returned as part of the transition.
    pub async fn cancel_order(
        &self,
        order_id: i64,
        customer_id: &str,
    ) -> Result<StatusChange, OrderFlowError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if order.customer_id != customer_id {
            warn!("🛒️ Customer {customer_id} tried to cancel order #{order_id}, which they do not own");
            return Err(OrderFlowError::Forbidden);
        }
        self.set_status(order_id, OrderStatus::Cancelled).await
    }

    /// Move an order to a new status. Admin-only at the HTTP layer.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusChange, OrderFlowError> {
        self.set_status(order_id, new_status).await
    }

    async fn set_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusChange, OrderFlowError> {
        let change = self.db.set_order_status(order_id, new_status).await?;
        debug!("🛒️ Order #{order_id} moved from {} to {}", change.old_status, change.order.status);
        let event =
            OrderStatusChangedEvent { old_status: change.old_status, order: change.order.clone() };
        for producer in &self.producers.order_status_changed_producer {
            producer.publish_event(event.clone()).await;
        }
        Ok(change)
    }

    /// Record a payment-success event from the gateway. Idempotent; redelivery returns the
    /// existing confirmation.
    pub async fn confirm_payment(
        &self,
        confirmation: NewPaymentConfirmation,
    ) -> Result<(PaymentConfirmation, bool), OrderFlowError> {
        let gateway_order_id = confirmation.gateway_order_id.clone();
        let (confirmation, created) = self.db.record_payment_confirmation(confirmation).await?;
        if created {
            debug!("🛒️ Payment confirmed for gateway order {gateway_order_id}");
        } else {
            debug!("🛒️ Payment confirmation for gateway order {gateway_order_id} was already on record");
        }
        Ok((confirmation, created))
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
