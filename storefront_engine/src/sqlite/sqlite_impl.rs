//! `SqliteDatabase` is a concrete implementation of a storefront engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders, payments, products, reviews};
use crate::{
    db_types::{
        NewOrder,
        NewPaymentConfirmation,
        NewProduct,
        NewReview,
        Order,
        OrderItem,
        OrderStatus,
        PaymentConfirmation,
        Product,
        Review,
    },
    order_objects::{OrderQueryFilter, StatusChange},
    sfe_api::catalog_objects::ProductDetail,
    traits::{
        CatalogApiError,
        CatalogManagement,
        OrderFlowDatabase,
        OrderFlowError,
        OrderManagement,
        OrderQueryError,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderFlowDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        if let Some(existing) =
            orders::fetch_order_by_gateway_id(&order.payment.gateway_order_id, &mut tx).await?
        {
            debug!(
                "🗃️ Order for gateway order {} already exists with id {}",
                order.payment.gateway_order_id, existing.id
            );
            return Ok((existing, false));
        }
        let confirmation = payments::fetch_confirmation(&order.payment.gateway_order_id, &mut tx)
            .await?
            .ok_or_else(|| {
                OrderFlowError::PaymentNotVerified(order.payment.gateway_order_id.clone())
            })?;
        if let Some(amount) = confirmation.amount {
            if amount != order.total_price {
                warn!(
                    "🗃️ Order total {} does not match the confirmed payment amount {} for gateway order {}",
                    order.total_price, amount, confirmation.gateway_order_id
                );
            }
        }
        for item in &order.items {
            let product = products::fetch_product(item.product_id, &mut tx)
                .await?
                .ok_or(OrderFlowError::ProductNotFound(item.product_id))?;
            let taken = products::take_stock(item.product_id, item.size, item.quantity, &mut tx).await?;
            if !taken {
                let available =
                    products::available_stock(item.product_id, item.size, &mut tx).await?.unwrap_or(0);
                // Dropping the transaction rolls back any decrements made for earlier items.
                return Err(OrderFlowError::InsufficientStock {
                    product: product.name,
                    size: item.size,
                    available,
                    requested: item.quantity,
                });
            }
        }
        let saved = orders::insert_order(&order, &confirmation, &mut tx).await?;
        orders::insert_order_items(saved.id, &order, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} has been saved in the DB", saved.id);
        Ok((saved, true))
    }

    async fn set_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusChange, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order(order_id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        let old_status = order.status;
        if !old_status.can_transition_to(new_status) {
            return Err(OrderFlowError::InvalidTransition {
                id: order_id,
                from: old_status,
                to: new_status,
            });
        }
        let order = orders::update_order_status(order_id, new_status, &mut tx).await?;
        if new_status == OrderStatus::Cancelled {
            let items = orders::fetch_order_items(order_id, &mut tx).await?;
            for item in &items {
                products::return_stock(item.product_id, item.size, item.quantity, &mut tx).await?;
            }
            debug!("🗃️ Stock returned for {} line items of cancelled order #{order_id}", items.len());
        }
        tx.commit().await?;
        Ok(StatusChange { old_status, order })
    }

    async fn record_payment_confirmation(
        &self,
        confirmation: NewPaymentConfirmation,
    ) -> Result<(PaymentConfirmation, bool), OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let (confirmation, created) = payments::idempotent_insert(confirmation, &mut tx).await?;
        if created {
            // The order usually does not exist yet at this point, but the verify poll and the
            // webhook can race with order placement.
            if let Some(order) = orders::apply_confirmation_to_order(&confirmation, &mut tx).await? {
                debug!(
                    "🗃️ Payment fields stamped onto existing order #{} for gateway order {}",
                    order.id, confirmation.gateway_order_id
                );
            }
        }
        tx.commit().await?;
        Ok((confirmation, created))
    }

    async fn fetch_payment_confirmation(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentConfirmation>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let confirmation = payments::fetch_confirmation(gateway_order_id, &mut conn).await?;
        Ok(confirmation)
    }

    async fn close(&mut self) -> Result<(), OrderFlowError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_gateway_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_gateway_id(gateway_order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_order_items(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_orders_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_customer(customer_id, &mut conn).await?;
        Ok(orders)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let product = products::insert_product(&product, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_product_detail(&self, id: i64) -> Result<Option<ProductDetail>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let Some(product) = products::fetch_product(id, &mut conn).await? else {
            return Ok(None);
        };
        let images = products::product_images(id, &mut conn).await?;
        let sizes = products::size_stock(id, &mut conn).await?;
        let reviews = reviews::reviews_for_product(id, &mut conn).await?;
        Ok(Some(ProductDetail { product, images, sizes, reviews }))
    }

    async fn add_review(&self, review: NewReview) -> Result<Review, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        products::fetch_product(review.product_id, &mut tx)
            .await?
            .ok_or(CatalogApiError::ProductNotFound(review.product_id))?;
        let review = reviews::insert_review(&review, &mut tx).await?;
        reviews::recompute_rating(review.product_id, &mut tx).await?;
        tx.commit().await?;
        Ok(review)
    }

    async fn has_purchased(&self, customer_id: &str, product_id: i64) -> Result<bool, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let purchased = reviews::has_purchased(customer_id, product_id, &mut conn).await?;
        Ok(purchased)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
