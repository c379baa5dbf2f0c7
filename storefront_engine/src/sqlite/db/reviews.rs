use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewReview, Review},
    traits::CatalogApiError,
};

/// Inserts a review. The UNIQUE(product_id, customer_id) constraint turns a second review by the
/// same customer into [`CatalogApiError::AlreadyReviewed`]. Call [`recompute_rating`] on the same
/// connection afterwards so the aggregates move in the same transaction.
pub async fn insert_review(
    review: &NewReview,
    conn: &mut SqliteConnection,
) -> Result<Review, CatalogApiError> {
    let result = sqlx::query_as(
        r#"
            INSERT INTO reviews (product_id, customer_id, customer_name, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(review.product_id)
    .bind(&review.customer_id)
    .bind(&review.customer_name)
    .bind(review.rating)
    .bind(&review.comment)
    .fetch_one(conn)
    .await;
    match result {
        Ok(review) => Ok(review),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(CatalogApiError::AlreadyReviewed),
        Err(e) => Err(e.into()),
    }
}

/// Recomputes the product's rating as the unweighted mean of its reviews, and the review count.
pub async fn recompute_rating(product_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE products SET
            rating = (SELECT COALESCE(AVG(rating), 0) FROM reviews WHERE product_id = $1),
            num_reviews = (SELECT COUNT(*) FROM reviews WHERE product_id = $1),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1;
    "#,
    )
    .bind(product_id)
    .execute(conn)
    .await?;
    trace!("📝️ Rating aggregates recomputed for product {product_id}");
    Ok(())
}

pub async fn reviews_for_product(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Review>, sqlx::Error> {
    let reviews = sqlx::query_as("SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(product_id)
        .fetch_all(conn)
        .await?;
    Ok(reviews)
}

/// Whether the customer has any non-cancelled, payment-successful order containing this product.
pub async fn has_purchased(
    customer_id: &str,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM orders
            JOIN order_items ON order_items.order_id = orders.id
            WHERE orders.customer_id = $1
              AND order_items.product_id = $2
              AND orders.payment_status = 'Success'
              AND orders.status != 'Cancelled'
        );
    "#,
    )
    .bind(customer_id)
    .bind(product_id)
    .fetch_one(conn)
    .await?;
    Ok(count != 0)
}
