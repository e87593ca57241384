//! Dashboard API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::order::{self, OrderBucket};
use crate::db::repository::{product, user};
use crate::utils::AppResult;

/// Administrative aggregate counts.
///
/// Recomputed from the stores on every call - no cached counters to
/// drift out of sync with the underlying data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub admin_users: i64,
    pub regular_users: i64,
    pub categories: i64,
    pub products: i64,
    pub unpaid_orders: i64,
    pub awaiting_delivery_orders: i64,
    pub completed_orders: i64,
}

/// GET /api/dashboard - the seven administrative counts
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<DashboardSummary>> {
    let pool = &state.pool;
    Ok(Json(DashboardSummary {
        admin_users: user::count_by_role(pool, true).await?,
        regular_users: user::count_by_role(pool, false).await?,
        categories: product::count_categories(pool).await?,
        products: product::count_all(pool).await?,
        unpaid_orders: order::count_by_bucket(pool, OrderBucket::Unpaid).await?,
        awaiting_delivery_orders: order::count_by_bucket(pool, OrderBucket::AwaitingDelivery)
            .await?,
        completed_orders: order::count_by_bucket(pool, OrderBucket::Completed).await?,
    }))
}
