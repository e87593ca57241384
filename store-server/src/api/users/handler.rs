//! User API Handlers
//!
//! Administration only - sign-in, tokens and profile editing belong to
//! the external auth service.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult};
use shared::models::{User, UserCreate};

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    let user = user::create(&state.pool, payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
///
/// Cascades: the user's orders are removed in the same transaction.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let removed = user::delete(&state.pool, id).await?;
    if removed {
        tracing::info!(user_id = id, "user deleted with order cascade");
    }
    Ok(Json(removed))
}
