use log::*;

use crate::{
    sfe_api::order_objects::{CustomerOrder, ItemDetail, OrderQueryFilter, OrderWithDetail},
    traits::{CatalogManagement, OrderManagement, OrderQueryError},
};

/// Read-only order queries for customers and admins.
pub struct OrderQueryApi<B> {
    db: B,
}

impl<B> OrderQueryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderQueryApi<B>
where B: OrderManagement + CatalogManagement
{
    /// All orders for the given customer, newest first, with line items attached.
    pub async fn my_orders(&self, customer_id: &str) -> Result<Vec<CustomerOrder>, OrderQueryError> {
        let orders = self.db.fetch_orders_for_customer(customer_id).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.fetch_order_items(order.id).await?;
            result.push(CustomerOrder { order, items });
        }
        trace!("🔍️ Fetched {} orders for customer {customer_id}", result.len());
        Ok(result)
    }

    /// A single order with each line item expanded with current product detail.
    pub async fn order_with_detail(&self, order_id: i64) -> Result<OrderWithDetail, OrderQueryError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or(OrderQueryError::OrderNotFound(order_id))?;
        let items = self.db.fetch_order_items(order_id).await?;
        let mut detailed = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .db
                .fetch_product(item.product_id)
                .await
                .map_err(|e| OrderQueryError::DatabaseError(e.to_string()))?;
            detailed.push(ItemDetail { item, product });
        }
        Ok(OrderWithDetail { order, items: detailed })
    }

    /// Orders matching the filter, newest first, with line items attached. Admin surface.
    pub async fn search_orders(
        &self,
        filter: OrderQueryFilter,
    ) -> Result<Vec<CustomerOrder>, OrderQueryError> {
        trace!("🔍️ Searching orders. {filter}");
        let orders = self.db.search_orders(filter).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.fetch_order_items(order.id).await?;
            result.push(CustomerOrder { order, items });
        }
        Ok(result)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
