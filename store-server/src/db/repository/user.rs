//! User Repository
//!
//! Minimal account store backing the dashboard aggregate and the
//! delete-user cascade. Credentials live in the external auth service.

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, name, email, is_admin, created_at FROM user";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if data.name.trim().is_empty() || data.email.trim().is_empty() {
        return Err(RepoError::Validation("name and email are required".into()));
    }
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query("INSERT INTO user (id, name, email, is_admin, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.is_admin)
        .bind(now)
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Delete a user and cascade to all of their orders, in one transaction.
/// Returns whether the user row existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM orders WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

/// Count users by role (dashboard aggregate).
pub async fn count_by_role(pool: &SqlitePool, is_admin: bool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE is_admin = ?")
        .bind(is_admin)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
