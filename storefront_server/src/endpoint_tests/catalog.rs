use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use storefront_engine::{
    catalog_objects::ProductDetail,
    db_types::{Category, Product, Review, Size, SizeStock},
    CatalogApi,
};
use ts_common::Rupees;

use crate::endpoint_tests::{
    helpers::{customer_token, get_request, send_request, test_timestamp},
    mocks::MockBackend,
};

fn sample_product(id: i64) -> Product {
    Product {
        id,
        name: "Midnight Oversized Tee".to_string(),
        description: "Heavyweight cotton, dropped shoulders.".to_string(),
        price: Rupees::from_rupees(999),
        category: Category::TShirt,
        rating: 4.0,
        num_reviews: 1,
        featured: true,
        trending: false,
        new_arrival: false,
        best_seller: false,
        created_at: test_timestamp(),
        updated_at: test_timestamp(),
    }
}

fn sample_detail(id: i64) -> ProductDetail {
    ProductDetail {
        product: sample_product(id),
        images: vec!["https://cdn.example.com/tee-front.jpg".to_string()],
        sizes: vec![SizeStock { size: Size::M, stock: 3 }, SizeStock { size: Size::L, stock: 0 }],
        reviews: vec![Review {
            id: 1,
            product_id: id,
            customer_id: "cust-2".to_string(),
            customer_name: "Arjun".to_string(),
            rating: 4,
            comment: "Great fit".to_string(),
            created_at: test_timestamp(),
        }],
    }
}

#[actix_web::test]
async fn product_detail_needs_no_token() {
    let _ = env_logger::try_init();
    let (status, body) = get_request("/products/11", "", configure).await;
    assert_eq!(status, StatusCode::OK);
    let detail: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(detail["name"], "Midnight Oversized Tee");
    assert_eq!(detail["category"], "T-Shirt");
    assert_eq!(detail["sizes"][0]["stock"], 3);
    assert_eq!(detail["reviews"][0]["rating"], 4);
}

#[actix_web::test]
async fn unknown_products_are_a_404() {
    let _ = env_logger::try_init();
    let (status, body) = get_request("/products/9999", "", configure_empty).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("does not exist"), "{body}");
}

#[actix_web::test]
async fn reviews_require_a_token() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/products/11/reviews").set_json(serde_json::json!({
        "rating": 5, "comment": "Love it"
    }));
    let (status, _) = send_request(req, "", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn purchasers_can_review() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/products/11/reviews").set_json(serde_json::json!({
        "rating": 5, "comment": "Love it"
    }));
    let (status, body) = send_request(req, &customer_token("cust-1"), configure).await;
    assert_eq!(status, StatusCode::CREATED);
    let review: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(review["customerId"], "cust-1");
    assert_eq!(review["rating"], 5);
}

#[actix_web::test]
async fn non_purchasers_cannot_review() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/products/11/reviews").set_json(serde_json::json!({
        "rating": 5, "comment": "Love it"
    }));
    let (status, body) = send_request(req, &customer_token("cust-3"), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("purchased"), "{body}");
}

#[actix_web::test]
async fn out_of_range_ratings_are_rejected() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/products/11/reviews").set_json(serde_json::json!({
        "rating": 6, "comment": "Too good"
    }));
    let (status, body) = send_request(req, &customer_token("cust-1"), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("between 1 and 5"), "{body}");
}

// cust-1 has purchased product 11; everyone else has not.
fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_product_detail().returning(|id| Ok(Some(sample_detail(id))));
    backend.expect_has_purchased().returning(|customer_id, _| Ok(customer_id == "cust-1"));
    backend.expect_add_review().returning(|review| {
        Ok(Review {
            id: 2,
            product_id: review.product_id,
            customer_id: review.customer_id,
            customer_name: review.customer_name,
            rating: review.rating,
            comment: review.comment,
            created_at: test_timestamp(),
        })
    });
    register(cfg, backend);
}

fn configure_empty(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_product_detail().returning(|_| Ok(None));
    register(cfg, backend);
}

fn register(cfg: &mut ServiceConfig, backend: MockBackend) {
    let api = CatalogApi::new(backend);
    crate::routes::configure_catalog::<MockBackend>(cfg);
    cfg.app_data(web::Data::new(api));
}
