use serde::Serialize;

use crate::db_types::{Product, Review, SizeStock};

/// A product with everything the storefront needs to render it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<String>,
    pub sizes: Vec<SizeStock>,
    pub reviews: Vec<Review>,
}
