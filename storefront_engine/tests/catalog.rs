mod common;

use common::*;
use storefront_engine::{
    db_types::{NewReview, Size},
    events::EventProducers,
    traits::CatalogApiError,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};

fn review(product_id: i64, customer_id: &str, rating: i64) -> NewReview {
    NewReview {
        product_id,
        customer_id: customer_id.to_string(),
        customer_name: format!("Customer {customer_id}"),
        rating,
        comment: "Great fit".to_string(),
    }
}

async fn buy(db: &SqliteDatabase, customer_id: &str, gateway_order_id: &str, product: &storefront_engine::db_types::Product) {
    confirm_payment(db, gateway_order_id, 999).await;
    let order = new_order(customer_id, gateway_order_id, vec![order_item(product, Size::L, 1)]);
    OrderFlowApi::new(db.clone(), EventProducers::default())
        .place_order(order)
        .await
        .expect("Error placing order");
}

#[tokio::test]
async fn reviews_require_a_purchase() {
    let (db, _dir) = prepare_test_db().await;
    let tee = seed_product(&db, "Midnight Oversized Tee", 999, &[(Size::L, 5)]).await;
    let api = CatalogApi::new(db.clone());

    let err = api.add_review(review(tee.id, "cust-1", 5)).await.unwrap_err();
    assert!(matches!(err, CatalogApiError::NotEligible), "got {err}");
}

#[tokio::test]
async fn a_purchase_unlocks_reviewing_and_aggregates_update() {
    let (db, _dir) = prepare_test_db().await;
    let tee = seed_product(&db, "Midnight Oversized Tee", 999, &[(Size::L, 5)]).await;
    let api = CatalogApi::new(db.clone());

    buy(&db, "cust-1", "order_r1", &tee).await;
    api.add_review(review(tee.id, "cust-1", 4)).await.expect("Error adding review");
    let detail = api.product_detail(tee.id).await.expect("Error fetching product");
    assert_eq!(detail.product.num_reviews, 1);
    assert!((detail.product.rating - 4.0).abs() < f64::EPSILON);

    buy(&db, "cust-2", "order_r2", &tee).await;
    api.add_review(review(tee.id, "cust-2", 2)).await.expect("Error adding review");
    let detail = api.product_detail(tee.id).await.expect("Error fetching product");
    assert_eq!(detail.product.num_reviews, 2);
    assert!((detail.product.rating - 3.0).abs() < f64::EPSILON);
    assert_eq!(detail.reviews.len(), 2);
}

#[tokio::test]
async fn one_review_per_customer_per_product() {
    let (db, _dir) = prepare_test_db().await;
    let tee = seed_product(&db, "Midnight Oversized Tee", 999, &[(Size::L, 5)]).await;
    let api = CatalogApi::new(db.clone());

    buy(&db, "cust-1", "order_r3", &tee).await;
    api.add_review(review(tee.id, "cust-1", 5)).await.expect("Error adding review");
    let err = api.add_review(review(tee.id, "cust-1", 1)).await.unwrap_err();
    assert!(matches!(err, CatalogApiError::AlreadyReviewed), "got {err}");

    // The rejected review must not move the aggregates.
    let detail = api.product_detail(tee.id).await.expect("Error fetching product");
    assert_eq!(detail.product.num_reviews, 1);
    assert!((detail.product.rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn cancelled_orders_do_not_grant_review_eligibility() {
    let (db, _dir) = prepare_test_db().await;
    let tee = seed_product(&db, "Midnight Oversized Tee", 999, &[(Size::L, 5)]).await;
    confirm_payment(&db, "order_r4", 999).await;
    let order = new_order("cust-1", "order_r4", vec![order_item(&tee, Size::L, 1)]);
    let flow = OrderFlowApi::new(db.clone(), EventProducers::default());
    let placed = flow.place_order(order).await.expect("Error placing order");
    flow.cancel_order(placed.order.id, "cust-1").await.expect("Error cancelling order");

    let api = CatalogApi::new(db.clone());
    let err = api.add_review(review(tee.id, "cust-1", 5)).await.unwrap_err();
    assert!(matches!(err, CatalogApiError::NotEligible), "got {err}");
}

#[tokio::test]
async fn product_detail_includes_images_sizes_and_reviews() {
    let (db, _dir) = prepare_test_db().await;
    let tee = seed_product(&db, "Midnight Oversized Tee", 999, &[(Size::M, 2), (Size::L, 5)]).await;
    let api = CatalogApi::new(db.clone());

    let detail = api.product_detail(tee.id).await.expect("Error fetching product");
    assert_eq!(detail.images.len(), 1);
    assert_eq!(detail.sizes.len(), 2);
    assert!(detail.reviews.is_empty());

    let err = api.product_detail(9999).await.unwrap_err();
    assert!(matches!(err, CatalogApiError::ProductNotFound(9999)), "got {err}");
}
