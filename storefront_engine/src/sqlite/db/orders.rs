use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderItem, OrderStatus, PaymentConfirmation},
    order_objects::OrderQueryFilter,
    traits::OrderFlowError,
};

/// Inserts a new order row using the given connection. This is not atomic on its own. Embed this
/// call inside a transaction and pass `&mut *tx` as the connection argument, together with the
/// stock decrements and item inserts that belong to the same order.
///
/// The payment columns are stamped from the recorded confirmation, not the client's claim.
pub async fn insert_order(
    order: &NewOrder,
    confirmation: &PaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                customer_id,
                name,
                phone,
                street,
                city,
                state,
                pincode,
                total_price,
                gateway_order_id,
                payment_id,
                payment_status,
                payment_method,
                paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'Success', $11, $12)
            RETURNING *;
        "#,
    )
    .bind(&order.customer_id)
    .bind(&order.customer_info.name)
    .bind(&order.customer_info.phone)
    .bind(&order.customer_info.address.street)
    .bind(&order.customer_info.address.city)
    .bind(&order.customer_info.address.state)
    .bind(&order.customer_info.address.pincode)
    .bind(order.total_price)
    .bind(&confirmation.gateway_order_id)
    .bind(&confirmation.payment_id)
    .bind(&confirmation.payment_method)
    .bind(confirmation.confirmed_at)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Copies the line item snapshots for a freshly inserted order.
pub async fn insert_order_items(
    order_id: i64,
    order: &NewOrder,
    conn: &mut SqliteConnection,
) -> Result<(), OrderFlowError> {
    for item in &order.items {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, name, price, image, quantity, size)
            VALUES ($1, $2, $3, $4, $5, $6, $7);
        "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.image)
        .bind(item.quantity)
        .bind(item.size)
        .execute(&mut *conn)
        .await?;
    }
    debug!("📝️ {} line items recorded for order #{order_id}", order.items.len());
    Ok(())
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_gateway_id(
    gateway_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_order_id = $1")
        .bind(gateway_order_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_items(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// All orders for a customer, newest first.
pub async fn fetch_orders_for_customer(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`.
///
/// Resulting orders are ordered by `created_at`, newest first.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM orders
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(cid) = query.customer_id {
        where_clause.push("customer_id=");
        where_clause.push_bind_unseparated(cid);
    }
    if let Some(gateway_order_id) = query.gateway_order_id {
        where_clause.push("gateway_order_id=");
        where_clause.push_bind_unseparated(gateway_order_id);
    }
    if query.status.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let mut statuses = vec![];
        query.status.as_ref().unwrap().iter().for_each(|s| {
            statuses.push(format!("'{s}'"));
        });
        let status_clause = statuses.join(",");
        where_clause.push(format!("status IN ({status_clause})"));
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");

    trace!("📝️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Order>();
    let orders = query.fetch_all(conn).await?;
    trace!("Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

pub(crate) async fn update_order_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    result.ok_or(OrderFlowError::OrderNotFound(id))
}

/// Stamps the payment columns from a confirmation onto an existing order, if one exists for the
/// gateway order id. Returns the updated order, or `None` when no order matches.
pub(crate) async fn apply_confirmation_to_order(
    confirmation: &PaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders SET
            payment_status = 'Success',
            payment_id = COALESCE($2, payment_id),
            payment_method = COALESCE($3, payment_method),
            paid_at = $4,
            updated_at = CURRENT_TIMESTAMP
        WHERE gateway_order_id = $1
        RETURNING *;
    "#,
    )
    .bind(&confirmation.gateway_order_id)
    .bind(&confirmation.payment_id)
    .bind(&confirmation.payment_method)
    .bind(confirmation.confirmed_at)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
