//! Order API Handlers
//!
//! Creation and reads go straight to the order repository; the pay and
//! deliver transitions go through the fulfillment engine.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::order::{self, OrderBucket};
use crate::fulfillment;
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderCreate, PaymentResult};

/// Bulk purge acknowledgement
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub deleted: u64,
}

/// POST /api/orders - create from a client-submitted cart
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = order::create(&state.pool, payload).await?;
    tracing::info!(id = order.id, user_id = order.user_id, "order created");
    Ok(Json(order))
}

/// GET /api/orders - all orders, insertion order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    Ok(Json(order))
}

/// GET /api/orders/by-user/:user_id
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_by_user(&state.pool, user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/unpaid
pub async fn list_unpaid(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_by_bucket(&state.pool, OrderBucket::Unpaid).await?;
    Ok(Json(orders))
}

/// GET /api/orders/awaiting-delivery
pub async fn list_awaiting_delivery(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_by_bucket(&state.pool, OrderBucket::AwaitingDelivery).await?;
    Ok(Json(orders))
}

/// GET /api/orders/completed
pub async fn list_completed(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_by_bucket(&state.pool, OrderBucket::Completed).await?;
    Ok(Json(orders))
}

/// PUT /api/orders/:id/pay - pay transition
///
/// The body is the gateway confirmation, stored verbatim.
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(confirmation): Json<PaymentResult>,
) -> AppResult<Json<Order>> {
    let order = fulfillment::pay_order(&state.pool, id, confirmation).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/deliver - deliver transition
pub async fn deliver(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = fulfillment::deliver_order(&state.pool, id).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let removed = order::delete(&state.pool, id).await?;
    Ok(Json(removed))
}

/// DELETE /api/orders/by-user/:user_id - remove all of one user's orders
pub async fn delete_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<PurgeResponse>> {
    let deleted = order::delete_by_user(&state.pool, user_id).await?;
    Ok(Json(PurgeResponse { deleted }))
}

/// DELETE /api/orders/purge-unpaid - bulk delete every unpaid order
pub async fn purge_unpaid(State(state): State<ServerState>) -> AppResult<Json<PurgeResponse>> {
    let deleted = order::purge_unpaid(&state.pool).await?;
    tracing::info!(deleted, "purged unpaid orders");
    Ok(Json(PurgeResponse { deleted }))
}

/// DELETE /api/orders/purge-completed - bulk delete every delivered order
pub async fn purge_completed(State(state): State<ServerState>) -> AppResult<Json<PurgeResponse>> {
    let deleted = order::purge_completed(&state.pool).await?;
    tracing::info!(deleted, "purged completed orders");
    Ok(Json(PurgeResponse { deleted }))
}
