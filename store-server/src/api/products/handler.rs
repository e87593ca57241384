//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::catalog::SearchParams;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductInput};

/// Search response: one page plus the total match count
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    #[serde(rename = "countProducts")]
    pub count_products: i64,
    pub page: i64,
    pub pages: i64,
}

/// GET /api/products - full catalog listing
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/search - filtered, sorted, paginated query
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.into_query()?;
    let (products, total) = product::search(&state.pool, &query).await?;

    Ok(Json(SearchResponse {
        products,
        count_products: total,
        page: query.page.page,
        pages: query.page.total_pages(total),
    }))
}

/// GET /api/products/categories - distinct category tags for filter UIs
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let categories = product::distinct_categories(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(Json(product))
}

/// GET /api/products/slug/:slug
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product '{slug}'")))?;
    Ok(Json(product))
}

/// GET /api/products/by-category/:category
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_by_category(&state.pool, &category).await?;
    Ok(Json(products))
}

/// POST /api/products - create with the full field set
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let product = product::create(&state.pool, payload).await?;
    tracing::info!(id = product.id, slug = %product.slug, "product created");
    Ok(Json(product))
}

/// PUT /api/products/:id - full-replacement update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let product = product::update(&state.pool, id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id
///
/// Best-effort idempotent: deleting an id that no longer exists answers
/// `false` instead of 404.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = product::delete(&state.pool, id).await?;
    Ok(Json(removed))
}
