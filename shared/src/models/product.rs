//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// `slug` is derived from `name` at create/update time and unique across
/// the catalog. `featured` is a sort weight consumed by the catalog's
/// `featured` ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub count_in_stock: i64,
    pub rating: f64,
    pub num_reviews: i64,
    pub featured: i64,
    pub created_at: i64,
}

/// Create/update product payload
///
/// Both create and update replace the full mutable field set; partial
/// updates are not supported. The slug is recomputed from `name` by the
/// store and never accepted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub count_in_stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub featured: i64,
}
