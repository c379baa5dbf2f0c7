use log::{debug, warn};
use sqlx::SqliteConnection;

use crate::db_types::{NewProduct, Product, Size, SizeStock};

pub async fn insert_product(
    product: &NewProduct,
    conn: &mut SqliteConnection,
) -> Result<Product, sqlx::Error> {
    let row: Product = sqlx::query_as(
        r#"
            INSERT INTO products (name, description, price, category, featured, trending, new_arrival, best_seller)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.category)
    .bind(product.featured)
    .bind(product.trending)
    .bind(product.new_arrival)
    .bind(product.best_seller)
    .fetch_one(&mut *conn)
    .await?;
    for (position, url) in product.images.iter().enumerate() {
        sqlx::query("INSERT INTO product_images (product_id, position, url) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *conn)
            .await?;
    }
    for entry in &product.sizes {
        sqlx::query("INSERT INTO product_sizes (product_id, size, stock) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(entry.size)
            .bind(entry.stock)
            .execute(&mut *conn)
            .await?;
    }
    debug!("📝️ Product \"{}\" inserted with id {}", row.name, row.id);
    Ok(row)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn product_images(id: i64, conn: &mut SqliteConnection) -> Result<Vec<String>, sqlx::Error> {
    let urls = sqlx::query_scalar("SELECT url FROM product_images WHERE product_id = $1 ORDER BY position")
        .bind(id)
        .fetch_all(conn)
        .await?;
    Ok(urls)
}

pub async fn size_stock(id: i64, conn: &mut SqliteConnection) -> Result<Vec<SizeStock>, sqlx::Error> {
    let sizes = sqlx::query_as("SELECT size, stock FROM product_sizes WHERE product_id = $1 ORDER BY id")
        .bind(id)
        .fetch_all(conn)
        .await?;
    Ok(sizes)
}

pub async fn available_stock(
    product_id: i64,
    size: Size,
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, sqlx::Error> {
    let stock = sqlx::query_scalar("SELECT stock FROM product_sizes WHERE product_id = $1 AND size = $2")
        .bind(product_id)
        .bind(size)
        .fetch_optional(conn)
        .await?;
    Ok(stock)
}

/// Atomically takes `quantity` units of stock for the given product and size. The decrement only
/// happens when enough stock is available; the return value is `false` otherwise (including when
/// the stock row does not exist). Run inside a transaction so a later failure rolls it back.
pub async fn take_stock(
    product_id: i64,
    size: Size,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE product_sizes SET stock = stock - $3 WHERE product_id = $1 AND size = $2 AND stock >= $3",
    )
    .bind(product_id)
    .bind(size)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Returns `quantity` units of stock, the inverse of [`take_stock`]. A missing stock row (the
/// product was deleted after purchase) is logged and skipped.
pub async fn return_stock(
    product_id: i64,
    size: Size,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    let result =
        sqlx::query("UPDATE product_sizes SET stock = stock + $3 WHERE product_id = $1 AND size = $2")
            .bind(product_id)
            .bind(size)
            .bind(quantity)
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        warn!("📝️ No stock row for product {product_id} size {size}. Restock of {quantity} skipped.");
    }
    Ok(())
}
