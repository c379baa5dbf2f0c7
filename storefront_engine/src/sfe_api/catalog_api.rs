use log::*;

use crate::{
    db_types::{NewReview, Review},
    sfe_api::catalog_objects::ProductDetail,
    traits::{CatalogApiError, CatalogManagement},
};

/// Product and review operations.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn product_detail(&self, product_id: i64) -> Result<ProductDetail, CatalogApiError> {
        self.db
            .fetch_product_detail(product_id)
            .await?
            .ok_or(CatalogApiError::ProductNotFound(product_id))
    }

    /// Add a review for a product.
    ///
    /// The reviewer must have purchased the product (at least one non-cancelled,
    /// payment-successful order containing it). Eligibility is checked against the live order
    /// history on every call.
    pub async fn add_review(&self, review: NewReview) -> Result<Review, CatalogApiError> {
        review.validate()?;
        let eligible = self.db.has_purchased(&review.customer_id, review.product_id).await?;
        if !eligible {
            info!(
                "⭐️ Customer {} tried to review product {} without purchasing it",
                review.customer_id, review.product_id
            );
            return Err(CatalogApiError::NotEligible);
        }
        let review = self.db.add_review(review).await?;
        debug!("⭐️ Review #{} added for product {}", review.id, review.product_id);
        Ok(review)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
