use thiserror::Error;

use crate::{
    db_types::{NewProduct, NewReview, Product, Review, ValidationError},
    sfe_api::catalog_objects::ProductDetail,
};

/// Product and review access. The storefront only needs enough of the catalog to support
/// checkout and reviews; full catalog administration lives elsewhere.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Inserts a product together with its images and per-size stock counters.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    /// Fetches the bare product row.
    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;

    /// Fetches a product with its images, per-size stock and reviews attached.
    async fn fetch_product_detail(&self, id: i64) -> Result<Option<ProductDetail>, CatalogApiError>;

    /// Inserts a review and recomputes the product's rating aggregates in the same transaction.
    ///
    /// A second review by the same customer for the same product returns
    /// [`CatalogApiError::AlreadyReviewed`].
    async fn add_review(&self, review: NewReview) -> Result<Review, CatalogApiError>;

    /// Whether the customer has at least one non-cancelled, payment-successful order containing
    /// the product. Recomputed on every call.
    async fn has_purchased(&self, customer_id: &str, product_id: i64) -> Result<bool, CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("You have already reviewed this product")]
    AlreadyReviewed,
    #[error("Only customers who purchased this product can review it")]
    NotEligible,
    #[error("{0}")]
    InvalidReview(#[from] ValidationError),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
