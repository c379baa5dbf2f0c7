#![allow(dead_code)]

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    db_types::{
        Address,
        CustomerInfo,
        NewOrder,
        NewOrderItem,
        NewPaymentConfirmation,
        NewProduct,
        PaymentInfo,
        PaymentStatus,
        Product,
        Size,
        SizeStock,
    },
    traits::{CatalogManagement, OrderFlowDatabase},
    SqliteDatabase,
};
use tempfile::TempDir;
use ts_common::Rupees;

/// Creates a fresh file-backed database in a temp directory and migrates it. Keep the returned
/// `TempDir` alive for the duration of the test.
pub async fn prepare_test_db() -> (SqliteDatabase, TempDir) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().expect("Error creating temp dir");
    let url = format!("sqlite://{}/test_store.db", dir.path().display());
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database pool");
    info!("🚀️ Test database ready at {url}");
    (db, dir)
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price: i64, sizes: &[(Size, i64)]) -> Product {
    let product = NewProduct {
        name: name.to_string(),
        description: format!("{name} description"),
        price: Rupees::from_rupees(price),
        category: storefront_engine::db_types::Category::TShirt,
        images: vec![format!("https://img.example.com/{name}.jpg")],
        sizes: sizes.iter().map(|(size, stock)| SizeStock { size: *size, stock: *stock }).collect(),
        featured: false,
        trending: false,
        new_arrival: true,
        best_seller: false,
    };
    db.insert_product(product).await.expect("Error seeding product")
}

/// Records a payment confirmation so that a subsequent order for `gateway_order_id` passes the
/// verification gate.
pub async fn confirm_payment(db: &SqliteDatabase, gateway_order_id: &str, amount: i64) {
    let confirmation = NewPaymentConfirmation {
        gateway_order_id: gateway_order_id.to_string(),
        payment_id: Some(format!("pay_{gateway_order_id}")),
        amount: Some(Rupees::from_rupees(amount)),
        payment_method: Some("upi".to_string()),
    };
    db.record_payment_confirmation(confirmation).await.expect("Error recording confirmation");
}

pub fn customer_info() -> CustomerInfo {
    CustomerInfo {
        name: "Priya Sharma".to_string(),
        phone: "9876543210".to_string(),
        address: Address {
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        },
    }
}

pub fn order_item(product: &Product, size: Size, quantity: i64) -> NewOrderItem {
    NewOrderItem {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        image: String::new(),
        quantity,
        size,
    }
}

pub fn new_order(customer_id: &str, gateway_order_id: &str, items: Vec<NewOrderItem>) -> NewOrder {
    let total_price = items.iter().map(|i| i.price * i.quantity).sum();
    NewOrder {
        customer_id: customer_id.to_string(),
        customer_email: Some(format!("{customer_id}@example.com")),
        customer_info: customer_info(),
        items,
        total_price,
        payment: PaymentInfo {
            gateway_order_id: gateway_order_id.to_string(),
            payment_id: None,
            payment_status: PaymentStatus::Success,
            payment_method: Some("upi".to_string()),
            paid_at: None,
        },
    }
}

pub async fn stock_for(db: &SqliteDatabase, product_id: i64, size: Size) -> i64 {
    db.fetch_product_detail(product_id)
        .await
        .expect("Error fetching product")
        .expect("Product missing")
        .sizes
        .iter()
        .find(|s| s.size == size)
        .map(|s| s.stock)
        .unwrap_or(0)
}
